//! Estimation constants that downstream crates can serialize/deserialize.
//!
//! These are process-wide assumptions, not behavior: byte costs per logical
//! type, per-document scan times, power/carbon/price rates and the capacity
//! of one server. Tests and callers may substitute any of them.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostConfig {
    pub size: SizeConfig,
    pub cluster: ClusterConfig,
    pub selectivity: SelectivityConfig,
}

/// Byte costs used by the document size model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeConfig {
    pub integer_bytes: u64,
    pub number_bytes: u64,
    /// Average string length.
    pub string_bytes: u64,
    pub date_bytes: u64,
    pub long_string_bytes: u64,
    /// Key name + type tag stored alongside every field.
    pub key_overhead_bytes: u64,
    /// Assumed element count of every array.
    pub avg_array_len: u64,
    /// Field names (exact match) stored as long text.
    pub long_text_fields: Vec<String>,
    /// Case-insensitive name suffix that marks a date field.
    pub date_suffix: String,
}

impl Default for SizeConfig {
    fn default() -> Self {
        Self {
            integer_bytes: 8,
            number_bytes: 8,
            string_bytes: 80,
            date_bytes: 20,
            long_string_bytes: 200,
            key_overhead_bytes: 12,
            avg_array_len: 2,
            long_text_fields: vec!["description".to_string(), "comment".to_string()],
            date_suffix: "date".to_string(),
        }
    }
}

/// Cluster capacity, timing, power and pricing assumptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    pub docs_per_server: u64,
    pub index_lookup_ms_per_doc: f64,
    pub shard_scan_ms_per_doc: f64,
    /// Full cluster scan, including network overhead.
    pub full_scan_ms_per_doc: f64,
    pub server_active_watts: f64,
    pub network_watts: f64,
    pub price_per_server_hour_usd: f64,
    pub co2_kg_per_kwh: f64,
    /// Cluster size used when statistics do not provide `nb_servers`.
    pub default_nb_servers: u64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            docs_per_server: 4_000_000,
            index_lookup_ms_per_doc: 0.001,
            shard_scan_ms_per_doc: 0.000_01,
            full_scan_ms_per_doc: 0.000_02,
            server_active_watts: 400.0,
            network_watts: 50.0,
            price_per_server_hour_usd: 0.50,
            co2_kg_per_kwh: 0.233,
            default_nb_servers: 1000,
        }
    }
}

/// Fallbacks for the selectivity heuristics and join fan-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectivityConfig {
    pub default_selectivity: f64,
    /// Lower bound for derived (non-explicit) selectivities.
    pub floor: f64,
    pub default_nb_warehouses: u64,
}

impl Default for SelectivityConfig {
    fn default() -> Self {
        Self {
            default_selectivity: 0.01,
            floor: 1e-6,
            default_nb_warehouses: 200,
        }
    }
}

impl CostConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `NOSQLCOST_KEY_OVERHEAD_BYTES`: per-field overhead
    /// - `NOSQLCOST_AVG_ARRAY_LEN`: assumed array length
    /// - `NOSQLCOST_DOCS_PER_SERVER`: server capacity in documents
    /// - `NOSQLCOST_DEFAULT_NB_SERVERS`: cluster size fallback
    /// - `NOSQLCOST_PRICE_PER_SERVER_HOUR`: USD per server-hour
    /// - `NOSQLCOST_CO2_KG_PER_KWH`: grid carbon intensity
    /// - `NOSQLCOST_DEFAULT_SELECTIVITY`: selectivity fallback
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Some(v) = env_parse("NOSQLCOST_KEY_OVERHEAD_BYTES") {
            cfg.size.key_overhead_bytes = v;
        }
        if let Some(v) = env_parse("NOSQLCOST_AVG_ARRAY_LEN") {
            cfg.size.avg_array_len = v;
        }
        if let Some(v) = env_parse("NOSQLCOST_DOCS_PER_SERVER") {
            cfg.cluster.docs_per_server = v;
        }
        if let Some(v) = env_parse("NOSQLCOST_DEFAULT_NB_SERVERS") {
            cfg.cluster.default_nb_servers = v;
        }
        if let Some(v) = env_parse("NOSQLCOST_PRICE_PER_SERVER_HOUR") {
            cfg.cluster.price_per_server_hour_usd = v;
        }
        if let Some(v) = env_parse("NOSQLCOST_CO2_KG_PER_KWH") {
            cfg.cluster.co2_kg_per_kwh = v;
        }
        if let Some(v) = env_parse("NOSQLCOST_DEFAULT_SELECTIVITY") {
            cfg.selectivity.default_selectivity = v;
        }

        cfg
    }

    /// Parse a (possibly partial) YAML override document. Missing sections
    /// and fields keep their defaults.
    pub fn from_yaml_str(src: &str) -> Result<Self> {
        let cfg: CostConfig =
            serde_yaml::from_str(src).map_err(|e| Error::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cluster.docs_per_server < 100 {
            return Err(Error::Config(format!(
                "docs_per_server must be at least 100, got {}",
                self.cluster.docs_per_server
            )));
        }
        if self.cluster.default_nb_servers == 0 {
            return Err(Error::Config("default_nb_servers must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.selectivity.default_selectivity) {
            return Err(Error::Config(format!(
                "default_selectivity must be within [0, 1], got {}",
                self.selectivity.default_selectivity
            )));
        }
        let rates = [
            self.cluster.index_lookup_ms_per_doc,
            self.cluster.shard_scan_ms_per_doc,
            self.cluster.full_scan_ms_per_doc,
            self.cluster.server_active_watts,
            self.cluster.network_watts,
            self.cluster.price_per_server_hour_usd,
            self.cluster.co2_kg_per_kwh,
        ];
        if rates.iter().any(|r| !r.is_finite() || *r < 0.0) {
            return Err(Error::Config(
                "cluster rates must be finite and non-negative".into(),
            ));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}
