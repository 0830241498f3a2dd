//! YAML workloads: a list of operator invocations over named collections.
//!
//! Example:
//! ```yaml
//! stats: { nb_servers: 1000, nb_warehouses: 200 }
//! steps:
//!   - op: filter_with_sharding
//!     collection: product
//!     filter_key: brand
//!     output_keys: [name, price]
//!   - op: nested_loop_without_sharding
//!     collection: stock
//!     right: product
//!     filter_key: IDW
//!     selectivity: 0.005
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use nosqlcost_core::collection::Collection;
use nosqlcost_core::config::CostConfig;
use nosqlcost_core::stats::DomainStatistics;
use nosqlcost_operators::{OperatorKind, OperatorRequest, OperatorResult};

use crate::executor::ExecError;
use crate::metrics::emit_span;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workload {
    /// Overrides each collection's own statistics when non-empty.
    #[serde(default)]
    pub stats: Option<DomainStatistics>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "op")]
pub enum Step {
    FilterWithSharding(FilterStep),
    FilterWithoutSharding(FilterStep),
    NestedLoopWithSharding(JoinStep),
    NestedLoopWithoutSharding(JoinStep),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterStep {
    pub collection: String,
    pub filter_key: String,
    #[serde(default)]
    pub output_keys: Vec<String>,
    #[serde(default)]
    pub selectivity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinStep {
    pub collection: String,
    pub right: String,
    pub filter_key: String,
    #[serde(default)]
    pub output_keys: Vec<String>,
    #[serde(default)]
    pub selectivity: Option<f64>,
}

impl Step {
    pub fn kind(&self) -> OperatorKind {
        match self {
            Step::FilterWithSharding(_) => OperatorKind::FilterWithSharding,
            Step::FilterWithoutSharding(_) => OperatorKind::FilterWithoutSharding,
            Step::NestedLoopWithSharding(_) => OperatorKind::NestedLoopWithSharding,
            Step::NestedLoopWithoutSharding(_) => OperatorKind::NestedLoopWithoutSharding,
        }
    }

    fn parts(&self) -> (&str, Option<&str>, &str, &[String], Option<f64>) {
        match self {
            Step::FilterWithSharding(f) | Step::FilterWithoutSharding(f) => {
                (
                    f.collection.as_str(),
                    None,
                    f.filter_key.as_str(),
                    f.output_keys.as_slice(),
                    f.selectivity,
                )
            }
            Step::NestedLoopWithSharding(j) | Step::NestedLoopWithoutSharding(j) => (
                j.collection.as_str(),
                Some(j.right.as_str()),
                j.filter_key.as_str(),
                j.output_keys.as_slice(),
                j.selectivity,
            ),
        }
    }
}

impl Workload {
    pub fn from_yaml_str(src: &str) -> Result<Self, ExecError> {
        serde_yaml::from_str(src).map_err(|e| ExecError::Workload(e.to_string()))
    }

    /// Evaluate every step in order; stops at the first failing step.
    pub fn run(
        &self,
        collections: &BTreeMap<String, Collection>,
        cfg: &CostConfig,
    ) -> Result<Vec<OperatorResult>, ExecError> {
        emit_span("workload", &[("steps", self.steps.len().to_string())]);
        self.steps
            .iter()
            .map(|step| self.run_step(step, collections, cfg))
            .collect()
    }

    fn run_step(
        &self,
        step: &Step,
        collections: &BTreeMap<String, Collection>,
        cfg: &CostConfig,
    ) -> Result<OperatorResult, ExecError> {
        let lookup = |name: &str| {
            collections
                .get(name)
                .ok_or_else(|| ExecError::UnknownCollection(name.to_string()))
        };
        let (left, right, filter_key, output_keys, selectivity) = step.parts();

        let mut req = OperatorRequest::new(lookup(left)?, filter_key)
            .with_output_keys(output_keys)
            .with_selectivity(selectivity)
            .with_stats(self.stats.as_ref());
        if let Some(right) = right {
            req = req.with_right(lookup(right)?);
        }
        Ok(step.kind().evaluate(&req, cfg)?)
    }
}
