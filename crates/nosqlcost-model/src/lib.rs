#![forbid(unsafe_code)]
//! nosqlcost-model: closed-form estimators (math → code).
//!
//! Responsibilities:
//! - `sizes`: recursive schema → byte size, plus collection/database totals.
//! - `sharding`: expected per-server documents and distinct key values.
//! - `cost`: time/carbon/price of scanning N documents with one of four
//!   access algorithms.
//! - `selectivity`: best-effort filter selectivity from domain statistics.
//!
//! Every function is deterministic given its inputs; nothing here holds state.

pub mod cost;
pub mod selectivity;
pub mod sharding;
pub mod sizes;

pub use cost::{compare_algorithms, Algorithm, CostReport, QueryCostModel};
pub use selectivity::{SelectivityEstimate, SelectivitySource};
pub use sharding::{compute_sharding_distribution, ShardingCandidate, ShardingDistribution};
pub use sizes::{
    bytes_to_gb, compute_collection_size_bytes, compute_database_size_bytes,
    compute_database_size_gb, estimate_document_size, gb_to_bytes,
};
