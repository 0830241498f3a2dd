#![forbid(unsafe_code)]
//! nosqlcost-operators: end-to-end cost of filter and join query shapes.
//!
//! The four operators are two strategies (filter, nested-loop join) under two
//! routing assumptions (sharded on the filter key, or not). Each variant only
//! decides how many documents are scanned and returned; selectivity, cluster
//! size, the cost model and output sizing are shared in `registry`.
//!
//! All operators are pure functions of their inputs and the statistics map.

pub mod error;
pub mod filter;
pub mod join;
pub mod plan;
pub mod registry;
pub mod result;

pub use error::OpError;
pub use filter::{filter_with_sharding, filter_without_sharding};
pub use join::{nested_loop_with_sharding, nested_loop_without_sharding};
pub use plan::{OperatorRequest, ScanEstimate};
pub use registry::OperatorKind;
pub use result::OperatorResult;
