use std::fmt;

use nosqlcost_model::cost::CostReport;
use serde::{Deserialize, Serialize};

use crate::registry::OperatorKind;

/// Cardinality, size and cost of one operator invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorResult {
    pub operator: OperatorKind,
    pub collection: String,
    /// Inner collection, joins only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_collection: Option<String>,
    pub filter_key: String,
    pub output_keys: Vec<String>,
    pub selectivity: f64,
    pub docs_scanned: u64,
    pub output_docs: u64,
    pub output_bytes: u64,
    pub cost: CostReport,
}

impl fmt::Display for OperatorResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.operator, self.collection)?;
        if let Some(right) = &self.right_collection {
            write!(f, " x {}", right)?;
        }
        write!(
            f,
            " [{}]: sel={:.6} scanned={} out={} ({} bytes), {} servers, {:.6} ms, {:.3e} kg CO2, ${:.6}",
            self.filter_key,
            self.selectivity,
            self.docs_scanned,
            self.output_docs,
            self.output_bytes,
            self.cost.servers_accessed,
            self.cost.time_ms,
            self.cost.carbon_kg,
            self.cost.price_usd
        )
    }
}
