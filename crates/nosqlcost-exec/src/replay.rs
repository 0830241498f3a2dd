//! Deterministic provenance for estimate runs.
//!
//! Inputs are digested in a fixed order (config, statistics, schemas) and
//! chained; outputs are digested from their serialized form. All maps are
//! `BTreeMap`s, so identical inputs always give identical digests.

use std::collections::BTreeMap;

use nosqlcost_core::collection::Collection;
use nosqlcost_core::config::CostConfig;
use nosqlcost_core::hash::{hash_serde, Hash256};
use nosqlcost_core::manifest::EstimateManifest;
use nosqlcost_operators::OperatorResult;

use crate::executor::{ExecError, QueryExecutor};
use crate::workload::Workload;

pub fn hash_executor_inputs(executor: &QueryExecutor) -> Result<Hash256, ExecError> {
    let cfg = hash_serde(executor.config())?;
    let stats = hash_serde(executor.stats())?;
    let schemas = hash_serde(executor.databases())?;
    Ok(cfg.chain(&stats).chain(&schemas))
}

/// Manifest over the full Q1–Q5 battery.
pub fn executor_manifest(executor: &QueryExecutor) -> Result<EstimateManifest, ExecError> {
    let inputs = hash_executor_inputs(executor)?;
    let outputs = hash_serde(&executor.execute_all_queries())?;
    Ok(EstimateManifest::new(inputs, outputs))
}

pub fn hash_workload_inputs(
    workload: &Workload,
    collections: &BTreeMap<String, Collection>,
    cfg: &CostConfig,
) -> Result<Hash256, ExecError> {
    let cfg = hash_serde(cfg)?;
    let steps = hash_serde(workload)?;
    let collections = hash_serde(collections)?;
    Ok(cfg.chain(&steps).chain(&collections))
}

pub fn workload_manifest(
    workload: &Workload,
    collections: &BTreeMap<String, Collection>,
    cfg: &CostConfig,
    results: &[OperatorResult],
) -> Result<EstimateManifest, ExecError> {
    let inputs = hash_workload_inputs(workload, collections, cfg)?;
    Ok(EstimateManifest::new(inputs, hash_serde(&results)?))
}
