#![forbid(unsafe_code)]
//! nosqlcost-exec: the Q1–Q5 scenario harness, YAML workloads, deterministic
//! manifests, and metrics hooks.
//!
//! The executor ranks database variants (role → schema mappings) on five
//! representative queries. Workloads run arbitrary operator invocations
//! against caller-supplied collections.

pub mod executor;
pub mod metrics;
pub mod quality;
pub mod replay;
pub mod stats;
pub mod workload;

pub use executor::{ExecError, QueryExecutor, QueryId, QueryReport, QuerySummary, VariantSize};
pub use quality::Quality;
pub use stats::GlobalStats;
pub use workload::{Step, Workload};
