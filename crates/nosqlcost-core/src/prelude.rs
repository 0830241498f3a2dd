//! Convenient re-exports for downstream crates.

pub use crate::collection::Collection;
pub use crate::config::{ClusterConfig, CostConfig, SelectivityConfig, SizeConfig};
pub use crate::error::{Error, Result};
pub use crate::hash::Hash256;
pub use crate::manifest::EstimateManifest;
pub use crate::schema::{LogicalType, SchemaKind, SchemaNode};
pub use crate::stats::DomainStatistics;
