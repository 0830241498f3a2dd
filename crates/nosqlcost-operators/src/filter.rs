//! Filter operators: `ceil(document_count × selectivity)` matching documents.
//!
//! With sharding on the filter key only the matching documents are read
//! (shard scan). Without it the engine reads the whole collection (full scan);
//! the output is the same, only the scan cost changes.

use nosqlcost_core::collection::Collection;
use nosqlcost_core::config::CostConfig;

use crate::error::OpError;
use crate::plan::{matching_docs, OperatorRequest, ScanEstimate};
use crate::registry::OperatorKind;
use crate::result::OperatorResult;

pub fn sharded_scan(collection: &Collection, selectivity: f64) -> ScanEstimate {
    let output_docs = matching_docs(collection.document_count(), selectivity);
    ScanEstimate {
        documents_scanned: output_docs,
        output_docs,
    }
}

pub fn full_scan(collection: &Collection, selectivity: f64) -> ScanEstimate {
    ScanEstimate {
        documents_scanned: collection.document_count(),
        output_docs: matching_docs(collection.document_count(), selectivity),
    }
}

/// Filter assuming the collection is sharded on `filter_key`.
pub fn filter_with_sharding(
    collection: &Collection,
    output_keys: &[String],
    filter_key: &str,
    selectivity: Option<f64>,
) -> Result<OperatorResult, OpError> {
    let req = OperatorRequest::new(collection, filter_key)
        .with_output_keys(output_keys)
        .with_selectivity(selectivity);
    OperatorKind::FilterWithSharding.evaluate(&req, &CostConfig::default())
}

/// Filter with neither index nor shard routing (full scan).
pub fn filter_without_sharding(
    collection: &Collection,
    output_keys: &[String],
    filter_key: &str,
    selectivity: Option<f64>,
) -> Result<OperatorResult, OpError> {
    let req = OperatorRequest::new(collection, filter_key)
        .with_output_keys(output_keys)
        .with_selectivity(selectivity);
    OperatorKind::FilterWithoutSharding.evaluate(&req, &CostConfig::default())
}
