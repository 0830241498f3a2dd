//! Deterministic estimate manifest for audit/replay.
//!
//! Estimates are pure functions of (config, statistics, schemas). A manifest
//! pins both sides so two runs can be compared without diffing the reports.

use serde::{Deserialize, Serialize};

use crate::hash::Hash256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateManifest {
    /// Digest of config + statistics + schemas.
    pub inputs_digest: Hash256,

    /// Digest of the serialized reports.
    pub outputs_digest: Hash256,

    /// Engine version string for provenance.
    pub engine_version: String,
}

impl EstimateManifest {
    pub fn new(inputs_digest: Hash256, outputs_digest: Hash256) -> Self {
        Self {
            inputs_digest,
            outputs_digest,
            engine_version: crate::VERSION.to_string(),
        }
    }

    /// Same inputs led to the same outputs under the same engine.
    pub fn matches(&self, other: &EstimateManifest) -> bool {
        self == other
    }
}
