//! Query cost model: time (ms), carbon footprint (kg CO2) and price (USD) of
//! scanning a number of documents on a sharded cluster.
//!
//! Only `servers_accessed` and `time_ms` depend on the access algorithm; the
//! energy and price derivation is shared:
//!
//! ```text
//! power   = servers × active_watts + network_watts
//! energy  = power / 1000 × hours            (kWh)
//! carbon  = energy × co2_kg_per_kwh
//! price   = servers × price_per_server_hour × hours
//! ```

use std::fmt;
use std::str::FromStr;

use nosqlcost_core::config::ClusterConfig;
use nosqlcost_core::error::{Error, Result};
use serde::{Deserialize, Serialize};

const MS_PER_HOUR: f64 = 3_600_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Direct index access on a single server.
    Index,
    /// Scan routed to the shards holding the key values.
    Shard,
    /// Nested-loop join, distributed over the servers holding the scanned docs.
    NestedLoop,
    /// Scan every server.
    FullScan,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Index,
        Algorithm::Shard,
        Algorithm::NestedLoop,
        Algorithm::FullScan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Index => "index",
            Algorithm::Shard => "shard",
            Algorithm::NestedLoop => "nested_loop",
            Algorithm::FullScan => "full_scan",
        }
    }

    fn servers_accessed(&self, input: &ScanInput, cluster: &ClusterConfig) -> u64 {
        match self {
            Algorithm::Index => 1,
            Algorithm::Shard => {
                let per_server = (cluster.docs_per_server / 100).max(1);
                (input.distinct_values / per_server).max(1).min(input.nb_servers)
            }
            Algorithm::NestedLoop => {
                let per_server = cluster.docs_per_server.max(1);
                (input.documents_scanned / per_server).max(1).min(input.nb_servers)
            }
            Algorithm::FullScan => input.nb_servers,
        }
    }

    fn time_ms(&self, input: &ScanInput, servers: u64, cluster: &ClusterConfig) -> f64 {
        let docs = input.documents_scanned as f64;
        match self {
            Algorithm::Index => docs * cluster.index_lookup_ms_per_doc,
            Algorithm::Shard => docs / servers.max(1) as f64 * cluster.shard_scan_ms_per_doc,
            // The inner loop revisits documents.
            Algorithm::NestedLoop => docs * cluster.shard_scan_ms_per_doc * 2.0,
            Algorithm::FullScan => docs * cluster.full_scan_ms_per_doc,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "index" => Ok(Algorithm::Index),
            "shard" => Ok(Algorithm::Shard),
            "nested_loop" => Ok(Algorithm::NestedLoop),
            "full_scan" => Ok(Algorithm::FullScan),
            _ => Err(Error::InvalidValue(format!("Unknown algorithm: {}", s))),
        }
    }
}

/// Cost of one query execution. Produced fresh by every computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostReport {
    pub algorithm: Algorithm,
    pub servers_accessed: u64,
    pub time_ms: f64,
    pub carbon_kg: f64,
    pub price_usd: f64,
}

impl CostReport {
    /// Derive carbon and price from servers and time.
    pub fn from_parts(algorithm: Algorithm, servers_accessed: u64, time_ms: f64, cluster: &ClusterConfig) -> Self {
        Self {
            algorithm,
            servers_accessed,
            time_ms,
            carbon_kg: carbon_kg(servers_accessed, time_ms, cluster),
            price_usd: price_usd(servers_accessed, time_ms, cluster),
        }
    }

    pub fn time_seconds(&self) -> f64 {
        self.time_ms / 1000.0
    }
}

pub fn carbon_kg(servers_accessed: u64, time_ms: f64, cluster: &ClusterConfig) -> f64 {
    let power_w = servers_accessed as f64 * cluster.server_active_watts + cluster.network_watts;
    let energy_kwh = power_w / 1000.0 * (time_ms / MS_PER_HOUR);
    energy_kwh * cluster.co2_kg_per_kwh
}

pub fn price_usd(servers_accessed: u64, time_ms: f64, cluster: &ClusterConfig) -> f64 {
    servers_accessed as f64 * cluster.price_per_server_hour_usd * (time_ms / MS_PER_HOUR)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScanInput {
    documents_scanned: u64,
    distinct_values: u64,
    nb_servers: u64,
}

/// Cost analyzer for one (documents, distinct values, cluster, algorithm) input.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryCostModel {
    input: ScanInput,
    algorithm: Algorithm,
    cluster: ClusterConfig,
}

impl QueryCostModel {
    pub fn new(documents_scanned: u64, distinct_values: u64, nb_servers: u64, algorithm: Algorithm) -> Result<Self> {
        Self::with_config(ClusterConfig::default(), documents_scanned, distinct_values, nb_servers, algorithm)
    }

    /// Fails with `InvalidValue` when `nb_servers` is zero.
    pub fn with_config(
        cluster: ClusterConfig,
        documents_scanned: u64,
        distinct_values: u64,
        nb_servers: u64,
        algorithm: Algorithm,
    ) -> Result<Self> {
        if nb_servers == 0 {
            return Err(Error::InvalidValue("nb_servers must be positive".into()));
        }
        Ok(Self {
            input: ScanInput {
                documents_scanned,
                distinct_values,
                nb_servers,
            },
            algorithm,
            cluster,
        })
    }

    /// Same as `new` but with a textual algorithm tag (`"index"`, `"shard"`,
    /// `"nested_loop"`, `"full_scan"`, case-insensitive).
    pub fn from_tag(documents_scanned: u64, distinct_values: u64, nb_servers: u64, algorithm: &str) -> Result<Self> {
        Self::new(documents_scanned, distinct_values, nb_servers, algorithm.parse()?)
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn servers_accessed(&self) -> u64 {
        self.algorithm.servers_accessed(&self.input, &self.cluster)
    }

    pub fn time_ms(&self) -> f64 {
        self.algorithm
            .time_ms(&self.input, self.servers_accessed(), &self.cluster)
    }

    pub fn carbon_kg(&self) -> f64 {
        carbon_kg(self.servers_accessed(), self.time_ms(), &self.cluster)
    }

    pub fn price_usd(&self) -> f64 {
        price_usd(self.servers_accessed(), self.time_ms(), &self.cluster)
    }

    pub fn summary(&self) -> CostReport {
        let report =
            CostReport::from_parts(self.algorithm, self.servers_accessed(), self.time_ms(), &self.cluster);
        #[cfg(feature = "tracing")]
        tracing::trace!(
            algorithm = %report.algorithm,
            docs = self.input.documents_scanned,
            servers = report.servers_accessed,
            time_ms = report.time_ms,
            "query cost"
        );
        report
    }
}

/// Cost of the same scan under every algorithm, in `Algorithm::ALL` order.
pub fn compare_algorithms(documents_scanned: u64, distinct_values: u64, nb_servers: u64) -> Result<Vec<CostReport>> {
    compare_algorithms_with(&ClusterConfig::default(), documents_scanned, distinct_values, nb_servers)
}

pub fn compare_algorithms_with(
    cluster: &ClusterConfig,
    documents_scanned: u64,
    distinct_values: u64,
    nb_servers: u64,
) -> Result<Vec<CostReport>> {
    Algorithm::ALL
        .iter()
        .map(|algo| {
            QueryCostModel::with_config(cluster.clone(), documents_scanned, distinct_values, nb_servers, *algo)
                .map(|m| m.summary())
        })
        .collect()
}
