//! Global cardinalities used by the query scenarios.

use nosqlcost_core::error::Result;
use nosqlcost_core::stats::DomainStatistics;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalStats {
    pub num_products: u64,
    pub num_brands: u64,
    pub num_orderlines: u64,
    pub num_warehouses: u64,
    pub num_clients: u64,
    pub num_servers: u64,
}

impl Default for GlobalStats {
    fn default() -> Self {
        Self {
            num_products: 100_000,
            num_brands: 5_000,
            num_orderlines: 4_000_000_000,
            num_warehouses: 200,
            num_clients: 1_000_000,
            num_servers: 1_000,
        }
    }
}

impl GlobalStats {
    /// Read counts from a statistics map, accepting both `num_*` and `nb_*`
    /// keys. Missing or non-positive entries keep their defaults.
    pub fn from_statistics(stats: &DomainStatistics) -> Self {
        let d = Self::default();
        Self {
            num_products: stats.count(&["num_products", "nb_products"]).unwrap_or(d.num_products),
            num_brands: stats
                .count(&["num_brands", "nb_brands", "distinct_brands"])
                .unwrap_or(d.num_brands),
            num_orderlines: stats
                .count(&["num_orderlines", "nb_orderlines"])
                .unwrap_or(d.num_orderlines),
            num_warehouses: stats
                .count(&["num_warehouses", "nb_warehouses"])
                .unwrap_or(d.num_warehouses),
            num_clients: stats.count(&["num_clients", "nb_clients"]).unwrap_or(d.num_clients),
            num_servers: stats
                .count(&["num_servers", "nb_servers", "nbServers"])
                .unwrap_or(d.num_servers),
        }
    }

    pub fn from_json(value: &Value) -> Result<Self> {
        Ok(Self::from_statistics(&DomainStatistics::from_json(value)?))
    }

    /// Popular-brand product count: five times the per-brand average
    /// (integer division).
    pub fn apple_products(&self) -> u64 {
        (self.num_products / self.num_brands.max(1)).saturating_mul(5)
    }

    /// One stock entry per (product, warehouse).
    pub fn num_stocks(&self) -> u64 {
        self.num_products.saturating_mul(self.num_warehouses)
    }

    /// Document count for a collection role, if the role is known.
    pub fn document_count(&self, role: &str) -> Option<u64> {
        match role {
            "product" => Some(self.num_products),
            "stock" => Some(self.num_stocks()),
            "orderline" => Some(self.num_orderlines),
            "client" => Some(self.num_clients),
            "warehouse" => Some(self.num_warehouses),
            _ => None,
        }
    }
}
