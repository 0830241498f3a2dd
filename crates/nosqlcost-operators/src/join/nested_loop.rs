//! Nested-loop join estimates.
//!
//! The outer side is the left collection filtered by selectivity. With
//! sharding each outer row meets about one warehouse group of the inner
//! collection; without it every outer row scans the whole inner collection.

use nosqlcost_core::collection::Collection;
use nosqlcost_core::config::CostConfig;
use nosqlcost_core::stats::DomainStatistics;

use crate::error::OpError;
use crate::plan::{matching_docs, OperatorRequest, ScanEstimate};
use crate::registry::OperatorKind;
use crate::result::OperatorResult;

pub fn sharded_nested_loop(
    left: &Collection,
    right: &Collection,
    selectivity: f64,
    nb_warehouses: u64,
) -> ScanEstimate {
    let outer = matching_docs(left.document_count(), selectivity);
    let avg_matches = right.document_count().div_ceil(nb_warehouses.max(1)).max(1);
    let cap = cross_product(left, right).min(left.document_count().saturating_add(right.document_count()));
    let scanned = outer.saturating_mul(avg_matches).min(cap);
    ScanEstimate {
        documents_scanned: scanned,
        output_docs: scanned,
    }
}

/// Output uses floor division by `nb_warehouses`, so a right side smaller
/// than the warehouse count yields zero output documents.
pub fn unsharded_nested_loop(
    left: &Collection,
    right: &Collection,
    selectivity: f64,
    nb_warehouses: u64,
) -> ScanEstimate {
    let outer = matching_docs(left.document_count(), selectivity);
    let per_group = right.document_count() / nb_warehouses.max(1);
    ScanEstimate {
        documents_scanned: outer
            .saturating_mul(right.document_count())
            .min(cross_product(left, right)),
        output_docs: outer.saturating_mul(per_group),
    }
}

fn cross_product(left: &Collection, right: &Collection) -> u64 {
    left.document_count().saturating_mul(right.document_count())
}

fn join(
    kind: OperatorKind,
    left: &Collection,
    right: &Collection,
    output_keys: &[String],
    filter_key: &str,
    selectivity: Option<f64>,
    stats: Option<&DomainStatistics>,
) -> Result<OperatorResult, OpError> {
    let req = OperatorRequest::new(left, filter_key)
        .with_right(right)
        .with_output_keys(output_keys)
        .with_selectivity(selectivity)
        .with_stats(stats);
    kind.evaluate(&req, &CostConfig::default())
}

/// Join `left` to `right` assuming both are sharded on the join key.
///
/// `stats` overrides `left.stats()` for selectivity, cluster size and
/// warehouse count.
pub fn nested_loop_with_sharding(
    left: &Collection,
    right: &Collection,
    output_keys: &[String],
    filter_key: &str,
    selectivity: Option<f64>,
    stats: Option<&DomainStatistics>,
) -> Result<OperatorResult, OpError> {
    join(
        OperatorKind::NestedLoopWithSharding,
        left,
        right,
        output_keys,
        filter_key,
        selectivity,
        stats,
    )
}

pub fn nested_loop_without_sharding(
    left: &Collection,
    right: &Collection,
    output_keys: &[String],
    filter_key: &str,
    selectivity: Option<f64>,
    stats: Option<&DomainStatistics>,
) -> Result<OperatorResult, OpError> {
    join(
        OperatorKind::NestedLoopWithoutSharding,
        left,
        right,
        output_keys,
        filter_key,
        selectivity,
        stats,
    )
}
