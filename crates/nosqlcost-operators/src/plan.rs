//! Operator inputs and the per-variant scan estimate.

use nosqlcost_core::collection::Collection;
use nosqlcost_core::stats::DomainStatistics;
use serde::{Deserialize, Serialize};

/// Documents read and returned by one operator invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEstimate {
    pub documents_scanned: u64,
    pub output_docs: u64,
}

/// Arguments shared by all operators. `right` is only read by joins.
#[derive(Debug, Clone, Copy)]
pub struct OperatorRequest<'a> {
    pub left: &'a Collection,
    pub right: Option<&'a Collection>,
    /// Carried through to the result for reporting; not used in estimates.
    pub output_keys: &'a [String],
    pub filter_key: &'a str,
    pub selectivity: Option<f64>,
    /// Overrides `left.stats()` when present and non-empty.
    pub stats: Option<&'a DomainStatistics>,
}

impl<'a> OperatorRequest<'a> {
    pub fn new(left: &'a Collection, filter_key: &'a str) -> Self {
        Self {
            left,
            right: None,
            output_keys: &[],
            filter_key,
            selectivity: None,
            stats: None,
        }
    }

    pub fn with_right(mut self, right: &'a Collection) -> Self {
        self.right = Some(right);
        self
    }

    pub fn with_output_keys(mut self, keys: &'a [String]) -> Self {
        self.output_keys = keys;
        self
    }

    pub fn with_selectivity(mut self, selectivity: Option<f64>) -> Self {
        self.selectivity = selectivity;
        self
    }

    pub fn with_stats(mut self, stats: Option<&'a DomainStatistics>) -> Self {
        self.stats = stats;
        self
    }

    /// Statistics used for selectivity, cluster size and join fan-out.
    pub fn stats(&self) -> &'a DomainStatistics {
        match self.stats {
            Some(s) if !s.is_empty() => s,
            _ => self.left.stats(),
        }
    }
}

/// `ceil(document_count × selectivity)`.
pub(crate) fn matching_docs(document_count: u64, selectivity: f64) -> u64 {
    (document_count as f64 * selectivity).ceil() as u64
}
