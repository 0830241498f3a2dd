#![forbid(unsafe_code)]
//! nosqlcost-core: pure data shared by every estimation layer.
//!
//! - `schema`: the recursive `SchemaNode` tree parsed from JSON-Schema-like input.
//! - `stats`: open `DomainStatistics` mapping of named numeric facts.
//! - `collection`: validated `Collection` (name + schema + stats + count).
//! - `config`: overridable `CostConfig` constants.
//! - `hash`/`manifest`: stable digests for deterministic estimate manifests.
//!
//! No I/O lives here; loaders hand already-parsed values to these types.

pub mod collection;
pub mod config;
pub mod error;
pub mod hash;
pub mod manifest;
pub mod prelude;
pub mod schema;
pub mod stats;

/// Engine version string recorded in manifests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
