//! Domain statistics: an open, read-only mapping of named numeric facts
//! (`nb_products`, `nb_servers`, `distinct_brands`, ...).
//!
//! Lookups treat zero, negative and non-finite values as absent so callers
//! fall back to their defaults.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainStatistics {
    values: BTreeMap<String, f64>,
}

impl DomainStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a flat JSON object. Non-numeric entries are ignored.
    pub fn from_json(value: &Value) -> Result<Self> {
        let obj = value.as_object().ok_or_else(|| {
            Error::InvalidShape("statistics must be a flat JSON object".to_string())
        })?;
        Ok(obj
            .iter()
            .filter_map(|(k, v)| v.as_f64().map(|n| (k.clone(), n)))
            .collect())
    }

    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// Value for `key` only if it is a usable positive number.
    pub fn positive(&self, key: &str) -> Option<f64> {
        self.get(key).filter(|v| v.is_finite() && *v > 0.0)
    }

    /// First usable positive value among aliases (`nb_products`, `num_products`).
    pub fn first_positive(&self, keys: &[&str]) -> Option<f64> {
        keys.iter().find_map(|k| self.positive(k))
    }

    /// Like `first_positive`, truncated to a whole count.
    pub fn count(&self, keys: &[&str]) -> Option<u64> {
        self.first_positive(keys).map(|v| v as u64)
    }

    /// A count that must be present; used by reports that cannot fall back.
    pub fn require_count(&self, keys: &[&str]) -> Result<u64> {
        self.count(keys).ok_or_else(|| {
            Error::InvalidValue(format!("missing statistic: expected one of {:?}", keys))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for DomainStatistics {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
