//! Sharding distribution analysis.
//!
//! A sharding key partitions documents across servers. Good keys have many
//! distinct values relative to the number of servers; with fewer distinct
//! values than servers some servers stay empty while others become hotspots.

use nosqlcost_core::error::{Error, Result};
use nosqlcost_core::stats::DomainStatistics;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShardingDistribution {
    pub avg_docs_per_server: f64,
    pub avg_distinct_values_per_server: f64,
}

impl ShardingDistribution {
    /// At least one distinct key value per server on average.
    pub fn is_well_distributed(&self) -> bool {
        self.avg_distinct_values_per_server >= 1.0
    }
}

/// Fails with `InvalidValue` when `nb_servers` is zero.
pub fn compute_sharding_distribution(
    document_count: u64,
    distinct_key_values: u64,
    nb_servers: u64,
) -> Result<ShardingDistribution> {
    if nb_servers == 0 {
        return Err(Error::InvalidValue(
            "nb_servers must be positive to compute a sharding distribution".into(),
        ));
    }
    let servers = nb_servers as f64;
    Ok(ShardingDistribution {
        avg_docs_per_server: document_count as f64 / servers,
        avg_distinct_values_per_server: distinct_key_values as f64 / servers,
    })
}

/// One (collection, shard key) pairing evaluated against the cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShardingCandidate {
    /// Short label, e.g. `St - #IDP`.
    pub label: String,
    pub collection: String,
    pub key: String,
    pub document_count: u64,
    pub distinct_key_values: u64,
    pub distribution: ShardingDistribution,
}

/// The standard shard-key candidates for the product/stock/order-line domain.
///
/// Requires `nb_products`, `nb_warehouses`, `nb_orderlines`, `nb_clients`,
/// `nb_servers` and `distinct_brands` (or their `num_*` aliases). The stock
/// collection holds one entry per (product, warehouse).
pub fn sharding_candidates(stats: &DomainStatistics) -> Result<Vec<ShardingCandidate>> {
    let nb_products = stats.require_count(&["nb_products", "num_products"])?;
    let nb_warehouses = stats.require_count(&["nb_warehouses", "num_warehouses"])?;
    let nb_orderlines = stats.require_count(&["nb_orderlines", "num_orderlines"])?;
    let nb_clients = stats.require_count(&["nb_clients", "num_clients"])?;
    let nb_servers = stats.require_count(&["nb_servers", "num_servers"])?;
    let distinct_brands = stats.require_count(&["distinct_brands", "num_brands", "nb_brands"])?;
    let nb_stocks = nb_products.saturating_mul(nb_warehouses);

    let cases = [
        ("St - #IDP", "stock", "IDP", nb_stocks, nb_products),
        ("St - #IDW", "stock", "IDW", nb_stocks, nb_warehouses),
        ("OL - #IDC", "orderline", "IDC", nb_orderlines, nb_clients),
        ("OL - #IDP", "orderline", "IDP", nb_orderlines, nb_products),
        ("Prod - #IDP", "product", "IDP", nb_products, nb_products),
        ("Prod - #brand", "product", "brand", nb_products, distinct_brands),
    ];

    cases
        .into_iter()
        .map(|(label, collection, key, docs, distinct)| {
            Ok(ShardingCandidate {
                label: label.to_string(),
                collection: collection.to_string(),
                key: key.to_string(),
                document_count: docs,
                distinct_key_values: distinct,
                distribution: compute_sharding_distribution(docs, distinct, nb_servers)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_distribution() {
        let d = compute_sharding_distribution(20_000_000, 100_000, 1000).unwrap();
        assert_eq!(d.avg_docs_per_server, 20_000.0);
        assert_eq!(d.avg_distinct_values_per_server, 100.0);
        assert!(d.is_well_distributed());
    }

    #[test]
    fn few_distinct_values_flag_hotspots() {
        let d = compute_sharding_distribution(20_000_000, 200, 1000).unwrap();
        assert_eq!(d.avg_distinct_values_per_server, 0.2);
        assert!(!d.is_well_distributed());
    }

    #[test]
    fn zero_servers_is_rejected() {
        assert!(matches!(
            compute_sharding_distribution(10, 10, 0),
            Err(Error::InvalidValue(_))
        ));
    }

    #[test]
    fn candidates_cover_six_keys() {
        let stats = DomainStatistics::new()
            .with("nb_products", 100_000.0)
            .with("nb_warehouses", 200.0)
            .with("nb_orderlines", 4_000_000_000.0)
            .with("nb_clients", 10_000_000.0)
            .with("nb_servers", 1000.0)
            .with("distinct_brands", 5_000.0);
        let candidates = sharding_candidates(&stats).unwrap();
        assert_eq!(candidates.len(), 6);

        let by_idw = candidates.iter().find(|c| c.label == "St - #IDW").unwrap();
        assert_eq!(by_idw.document_count, 20_000_000);
        assert!(!by_idw.distribution.is_well_distributed());

        let by_idp = candidates.iter().find(|c| c.label == "St - #IDP").unwrap();
        assert!(by_idp.distribution.is_well_distributed());
    }

    #[test]
    fn candidates_need_statistics() {
        assert!(sharding_candidates(&DomainStatistics::new()).is_err());
    }
}
