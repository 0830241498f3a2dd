#![forbid(unsafe_code)]
//! nosqlcost: estimate document/collection/database sizes and query costs
//! for NoSQL denormalization variants, without running a database.
//!
//! This facade re-exports the workspace crates so integration tests, benches,
//! and embedding applications can depend on a single package.

pub use nosqlcost_core as core;
pub use nosqlcost_exec as exec;
pub use nosqlcost_model as model;
pub use nosqlcost_operators as operators;
