//! Operator variants and the shared evaluation path.

use std::fmt;
use std::str::FromStr;

use nosqlcost_core::config::CostConfig;
use nosqlcost_core::stats::DomainStatistics;
use nosqlcost_model::cost::{Algorithm, QueryCostModel};
use nosqlcost_model::selectivity;
use nosqlcost_model::sizes::estimate_document_size_with;
use serde::{Deserialize, Serialize};

use crate::error::OpError;
use crate::plan::{OperatorRequest, ScanEstimate};
use crate::result::OperatorResult;
use crate::{filter, join};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorKind {
    /// Filter key is the shard key: only matching documents are read.
    FilterWithSharding,
    /// No routing: the whole collection is scanned.
    FilterWithoutSharding,
    /// Each outer row meets roughly one warehouse-sized group of the inner collection.
    NestedLoopWithSharding,
    /// Each outer row scans the entire inner collection.
    NestedLoopWithoutSharding,
}

impl OperatorKind {
    pub const ALL: [OperatorKind; 4] = [
        OperatorKind::FilterWithSharding,
        OperatorKind::FilterWithoutSharding,
        OperatorKind::NestedLoopWithSharding,
        OperatorKind::NestedLoopWithoutSharding,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OperatorKind::FilterWithSharding => "filter_with_sharding",
            OperatorKind::FilterWithoutSharding => "filter_without_sharding",
            OperatorKind::NestedLoopWithSharding => "nested_loop_with_sharding",
            OperatorKind::NestedLoopWithoutSharding => "nested_loop_without_sharding",
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        match self {
            OperatorKind::FilterWithSharding => Algorithm::Shard,
            OperatorKind::FilterWithoutSharding => Algorithm::FullScan,
            OperatorKind::NestedLoopWithSharding | OperatorKind::NestedLoopWithoutSharding => {
                Algorithm::NestedLoop
            }
        }
    }

    pub fn is_join(&self) -> bool {
        matches!(
            self,
            OperatorKind::NestedLoopWithSharding | OperatorKind::NestedLoopWithoutSharding
        )
    }

    fn scan(&self, req: &OperatorRequest<'_>, selectivity: f64, cfg: &CostConfig) -> Result<ScanEstimate, OpError> {
        let right = || {
            req.right.ok_or(OpError::MissingRight {
                operator: self.name(),
            })
        };
        Ok(match self {
            OperatorKind::FilterWithSharding => filter::sharded_scan(req.left, selectivity),
            OperatorKind::FilterWithoutSharding => filter::full_scan(req.left, selectivity),
            OperatorKind::NestedLoopWithSharding => join::sharded_nested_loop(
                req.left,
                right()?,
                selectivity,
                nb_warehouses(req.stats(), cfg),
            ),
            OperatorKind::NestedLoopWithoutSharding => join::unsharded_nested_loop(
                req.left,
                right()?,
                selectivity,
                nb_warehouses(req.stats(), cfg),
            ),
        })
    }

    /// Estimate output cardinality, output bytes and cost for one invocation.
    pub fn evaluate(&self, req: &OperatorRequest<'_>, cfg: &CostConfig) -> Result<OperatorResult, OpError> {
        let stats = req.stats();
        let sel = selectivity::estimate_with(&cfg.selectivity, req.filter_key, req.selectivity, stats);
        let scan = self.scan(req, sel.value, cfg)?;

        let cost = QueryCostModel::with_config(
            cfg.cluster.clone(),
            scan.documents_scanned,
            inverse_selectivity(sel.value),
            nb_servers(stats, cfg),
            self.algorithm(),
        )?
        .summary();

        // Sized with the primary collection's schema, joins included.
        let doc_size = estimate_document_size_with(&cfg.size, req.left.schema());

        #[cfg(feature = "tracing")]
        tracing::debug!(
            operator = self.name(),
            collection = req.left.name(),
            selectivity = sel.value,
            docs_scanned = scan.documents_scanned,
            output_docs = scan.output_docs,
            servers = cost.servers_accessed,
            "operator estimate"
        );

        Ok(OperatorResult {
            operator: *self,
            collection: req.left.name().to_string(),
            right_collection: req.right.filter(|_| self.is_join()).map(|r| r.name().to_string()),
            filter_key: req.filter_key.to_string(),
            output_keys: req.output_keys.to_vec(),
            selectivity: sel.value,
            docs_scanned: scan.documents_scanned,
            output_docs: scan.output_docs,
            output_bytes: doc_size.saturating_mul(scan.output_docs),
            cost,
        })
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OperatorKind {
    type Err = OpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        OperatorKind::ALL
            .into_iter()
            .find(|k| k.name() == key)
            .ok_or_else(|| OpError::UnknownOperator(s.to_string()))
    }
}

/// Distinct key values implied by a selectivity: `max(1, round(1 / s))`.
pub fn inverse_selectivity(selectivity: f64) -> u64 {
    ((1.0 / selectivity).round() as u64).max(1)
}

fn nb_servers(stats: &DomainStatistics, cfg: &CostConfig) -> u64 {
    stats
        .count(&["nb_servers", "nbServers"])
        .filter(|n| *n > 0)
        .unwrap_or(cfg.cluster.default_nb_servers)
}

fn nb_warehouses(stats: &DomainStatistics, cfg: &CostConfig) -> u64 {
    stats
        .count(&["nb_warehouses", "num_warehouses"])
        .filter(|n| *n > 0)
        .unwrap_or(cfg.selectivity.default_nb_warehouses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nosqlcost_core::collection::Collection;
    use nosqlcost_core::schema::SchemaNode;

    fn collection(name: &str, count: i64, stats: DomainStatistics) -> Collection {
        let schema = SchemaNode::document([
            SchemaNode::scalar("IDP", "integer"),
            SchemaNode::scalar("brand", "string"),
        ]);
        Collection::new(name, schema, stats, count).unwrap()
    }

    #[test]
    fn names_round_trip() {
        for kind in OperatorKind::ALL {
            assert_eq!(kind.name().parse::<OperatorKind>().unwrap(), kind);
        }
        assert!(matches!(
            "hash_join".parse::<OperatorKind>(),
            Err(OpError::UnknownOperator(_))
        ));
    }

    #[test]
    fn inverse_selectivity_rounds_and_floors() {
        assert_eq!(inverse_selectivity(0.01), 100);
        assert_eq!(inverse_selectivity(0.3), 3);
        assert_eq!(inverse_selectivity(1.0), 1);
        assert_eq!(inverse_selectivity(0.0), u64::MAX);
    }

    #[test]
    fn join_without_right_collection_fails() {
        let left = collection("stock", 1000, DomainStatistics::new());
        let req = OperatorRequest::new(&left, "IDW");
        let err = OperatorKind::NestedLoopWithSharding
            .evaluate(&req, &CostConfig::default())
            .unwrap_err();
        assert!(matches!(err, OpError::MissingRight { .. }));
    }

    #[test]
    fn filters_ignore_the_right_collection() {
        let left = collection("product", 1000, DomainStatistics::new());
        let right = collection("stock", 1000, DomainStatistics::new());
        let req = OperatorRequest::new(&left, "brand").with_right(&right);
        let r = OperatorKind::FilterWithSharding
            .evaluate(&req, &CostConfig::default())
            .unwrap();
        assert_eq!(r.right_collection, None);
    }

    #[test]
    fn cluster_size_comes_from_statistics() {
        let stats = DomainStatistics::new().with("nb_servers", 8.0);
        let left = collection("product", 1000, stats);
        let req = OperatorRequest::new(&left, "brand").with_selectivity(Some(0.5));
        let r = OperatorKind::FilterWithoutSharding
            .evaluate(&req, &CostConfig::default())
            .unwrap();
        assert_eq!(r.cost.servers_accessed, 8);

        let fallback = collection("product", 1000, DomainStatistics::new());
        let req = OperatorRequest::new(&fallback, "brand");
        let r = OperatorKind::FilterWithoutSharding
            .evaluate(&req, &CostConfig::default())
            .unwrap();
        assert_eq!(r.cost.servers_accessed, 1000);
    }

    #[test]
    fn request_stats_override_collection_stats() {
        let left = collection("product", 1000, DomainStatistics::new().with("nb_servers", 8.0));
        let override_stats = DomainStatistics::new().with("nb_servers", 3.0);
        let req = OperatorRequest::new(&left, "brand").with_stats(Some(&override_stats));
        let r = OperatorKind::FilterWithoutSharding
            .evaluate(&req, &CostConfig::default())
            .unwrap();
        assert_eq!(r.cost.servers_accessed, 3);

        let empty = DomainStatistics::new();
        let req = OperatorRequest::new(&left, "brand").with_stats(Some(&empty));
        let r = OperatorKind::FilterWithoutSharding
            .evaluate(&req, &CostConfig::default())
            .unwrap();
        assert_eq!(r.cost.servers_accessed, 8);
    }
}
