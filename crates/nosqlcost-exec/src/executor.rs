//! Scenario harness: five fixed queries evaluated per database variant.
//!
//! A variant maps collection roles (`product`, `stock`, `orderline`,
//! `client`, `warehouse`) to document schemas. The scenarios read only the
//! roles they need; a missing or empty schema falls back to a fixed document
//! size. Variants live in a `BTreeMap`, so iteration, and therefore
//! `get_summary` tie-breaking, is lexicographic by variant name.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use nosqlcost_core::config::CostConfig;
use nosqlcost_core::error::Error as CoreError;
use nosqlcost_core::schema::SchemaNode;
use nosqlcost_model::cost::{Algorithm, CostReport};
use nosqlcost_model::sizes::{bytes_to_gb, estimate_document_size_with};
use nosqlcost_operators::OpError;

use crate::metrics::emit_span;
use crate::quality::Quality;
use crate::stats::GlobalStats;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Operator(#[from] OpError),
    #[error("unknown database variant: {0}")]
    UnknownDatabase(String),
    #[error("unknown collection: {0}")]
    UnknownCollection(String),
    #[error("workload: {0}")]
    Workload(String),
}

/// Collection role → document schema.
pub type DatabaseVariant = BTreeMap<String, SchemaNode>;

// Per-document times of each scenario, in ms.
const LOOKUP_MS: f64 = 0.001;
const BRAND_INDEX_MS_PER_DOC: f64 = 0.001;
const DATE_INDEX_MS_PER_DOC: f64 = 0.000_001;
const EMBEDDED_STOCK_MS_PER_DOC: f64 = 0.000_005;
const EMBEDDED_BRAND_MS_PER_DOC: f64 = 0.000_01;
const LOOKUP_JOIN_MS_PER_DOC: f64 = 0.001;
const DAYS_OF_DATA: u64 = 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QueryId {
    Q1,
    Q2,
    Q3,
    Q4,
    Q5,
}

impl QueryId {
    pub const ALL: [QueryId; 5] = [QueryId::Q1, QueryId::Q2, QueryId::Q3, QueryId::Q4, QueryId::Q5];

    pub fn title(&self) -> &'static str {
        match self {
            QueryId::Q1 => "Stock of a given product in a given warehouse",
            QueryId::Q2 => "Names and prices of products from a brand",
            QueryId::Q3 => "Product id and quantity of order lines at a given date",
            QueryId::Q4 => "Stock of a given warehouse, with product names",
            QueryId::Q5 => "Distribution of one brand's products across warehouses",
        }
    }

    pub fn sql(&self) -> &'static str {
        match self {
            QueryId::Q1 => "SELECT S.quantity, S.location FROM Stock S WHERE S.IDP = $IDP AND S.IDW = $IDW;",
            QueryId::Q2 => "SELECT P.name, P.price FROM Product P WHERE P.brand = $brand;",
            QueryId::Q3 => "SELECT O.IDP, O.quantity FROM OrderLine O WHERE O.date = $date;",
            QueryId::Q4 => {
                "SELECT P.name, S.quantity FROM Stock S JOIN Product P ON S.IDP = P.IDP WHERE S.IDW = $IDW;"
            }
            QueryId::Q5 => {
                "SELECT P.name, P.price, S.IDW, S.quantity FROM Product P JOIN Stock S ON P.IDP = S.IDP WHERE P.brand = $brand;"
            }
        }
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Result of one scenario on one variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryReport {
    pub query_id: QueryId,
    pub db_name: String,
    pub docs_scanned: u64,
    /// Size of one document of the collection the query reads.
    pub doc_size_bytes: u64,
    pub cost: CostReport,
    /// Embedded document or index avoids the join.
    pub optimization: bool,
    pub quality: Quality,
}

impl QueryReport {
    pub fn time_seconds(&self) -> f64 {
        self.cost.time_seconds()
    }
}

/// Cheapest variant for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySummary {
    pub query_id: QueryId,
    pub best_db: String,
    pub price_usd: f64,
    pub time_ms: f64,
    pub quality: Quality,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSize {
    pub role: String,
    pub document_count: u64,
    pub doc_size_bytes: u64,
    pub size_bytes: u64,
}

/// Storage footprint of one variant; roles without a known count are skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantSize {
    pub db_name: String,
    pub collections: Vec<CollectionSize>,
    pub total_bytes: u64,
    pub total_gb: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryExecutor {
    databases: BTreeMap<String, DatabaseVariant>,
    stats: GlobalStats,
    cfg: CostConfig,
}

impl QueryExecutor {
    pub fn new(databases: BTreeMap<String, DatabaseVariant>, stats: GlobalStats) -> Self {
        Self {
            databases,
            stats,
            cfg: CostConfig::default(),
        }
    }

    pub fn with_config(mut self, cfg: CostConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Parse `{"<variant>": {"<role>": <schema>, ...}, ...}`.
    pub fn from_json(databases: &Value, stats: GlobalStats) -> Result<Self, ExecError> {
        let variants = databases.as_object().ok_or_else(|| {
            CoreError::InvalidShape("database variants must be a JSON object".into())
        })?;
        let mut out = BTreeMap::new();
        for (db_name, roles) in variants {
            let roles = roles.as_object().ok_or_else(|| {
                CoreError::InvalidShape(format!("variant '{}' must map roles to schemas", db_name))
            })?;
            let mut variant = DatabaseVariant::new();
            for (role, schema) in roles {
                variant.insert(role.clone(), SchemaNode::from_json(schema)?);
            }
            out.insert(db_name.clone(), variant);
        }
        Ok(Self::new(out, stats))
    }

    pub fn database_names(&self) -> impl Iterator<Item = &str> {
        self.databases.keys().map(String::as_str)
    }

    pub fn stats(&self) -> &GlobalStats {
        &self.stats
    }

    pub fn config(&self) -> &CostConfig {
        &self.cfg
    }

    pub fn databases(&self) -> &BTreeMap<String, DatabaseVariant> {
        &self.databases
    }

    pub fn execute(&self, query: QueryId, db_name: &str) -> Result<QueryReport, ExecError> {
        let variant = self
            .databases
            .get(db_name)
            .ok_or_else(|| ExecError::UnknownDatabase(db_name.to_string()))?;
        Ok(self.run(query, db_name, variant))
    }

    fn run(&self, query: QueryId, db_name: &str, variant: &DatabaseVariant) -> QueryReport {
        let s = &self.stats;
        let stock = populated(variant, "stock");
        let embedded = stock.is_some_and(|schema| schema.has_field("product"));

        let (algorithm, docs, servers, time_ms, doc_size, optimization) = match query {
            QueryId::Q1 => (
                Algorithm::Index,
                1,
                1,
                LOOKUP_MS,
                self.doc_size(stock, 500),
                false,
            ),
            QueryId::Q2 => {
                let docs = s.apple_products();
                (
                    Algorithm::Index,
                    docs,
                    1,
                    docs as f64 * BRAND_INDEX_MS_PER_DOC,
                    self.doc_size(populated(variant, "product"), 1000),
                    false,
                )
            }
            QueryId::Q3 => {
                let docs = s.num_orderlines / DAYS_OF_DATA;
                let servers = (docs / self.cfg.cluster.docs_per_server.max(1)).max(1);
                (
                    Algorithm::Index,
                    docs,
                    servers,
                    docs as f64 * DATE_INDEX_MS_PER_DOC,
                    self.doc_size(populated(variant, "orderline"), 300),
                    false,
                )
            }
            QueryId::Q4 => {
                // Every product has a stock entry in the warehouse.
                let docs = s.num_products;
                let (algorithm, servers, per_doc) = if embedded {
                    (Algorithm::Index, 1, EMBEDDED_STOCK_MS_PER_DOC)
                } else {
                    (Algorithm::NestedLoop, 2, LOOKUP_JOIN_MS_PER_DOC)
                };
                (
                    algorithm,
                    docs,
                    servers,
                    docs as f64 * per_doc,
                    self.doc_size(stock, 1000),
                    embedded,
                )
            }
            QueryId::Q5 => {
                let docs = s.apple_products().saturating_mul(s.num_warehouses);
                let (algorithm, servers, per_doc) = if embedded {
                    (Algorithm::Index, 1, EMBEDDED_BRAND_MS_PER_DOC)
                } else {
                    (Algorithm::NestedLoop, 2, LOOKUP_JOIN_MS_PER_DOC)
                };
                (
                    algorithm,
                    docs,
                    servers,
                    docs as f64 * per_doc,
                    self.doc_size(stock, 1000),
                    embedded,
                )
            }
        };

        // No scenario touches more servers than the cluster has.
        let servers = servers.min(s.num_servers.max(1));
        let cost = CostReport::from_parts(algorithm, servers, time_ms, &self.cfg.cluster);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            query = %query,
            db = db_name,
            docs,
            servers,
            time_ms,
            "scenario"
        );

        QueryReport {
            query_id: query,
            db_name: db_name.to_string(),
            docs_scanned: docs,
            doc_size_bytes: doc_size,
            quality: Quality::assess(cost.time_ms, cost.servers_accessed),
            cost,
            optimization,
        }
    }

    fn doc_size(&self, schema: Option<&SchemaNode>, fallback: u64) -> u64 {
        schema
            .map(|s| estimate_document_size_with(&self.cfg.size, s))
            .unwrap_or(fallback)
    }

    /// Every query on every variant.
    pub fn execute_all_queries(&self) -> BTreeMap<String, BTreeMap<QueryId, QueryReport>> {
        emit_span(
            "execute_all_queries",
            &[("variants", self.databases.len().to_string())],
        );
        self.databases
            .iter()
            .map(|(db_name, variant)| {
                let reports = QueryId::ALL
                    .iter()
                    .map(|q| (*q, self.run(*q, db_name, variant)))
                    .collect();
                (db_name.clone(), reports)
            })
            .collect()
    }

    /// Cheapest variant per query. Equal prices resolve to the variant whose
    /// name sorts first.
    pub fn get_summary(&self) -> BTreeMap<QueryId, QuerySummary> {
        let results = self.execute_all_queries();
        let mut summary = BTreeMap::new();
        for query in QueryId::ALL {
            let mut best: Option<&QueryReport> = None;
            for reports in results.values() {
                let Some(report) = reports.get(&query) else {
                    continue;
                };
                if best.map_or(true, |b| report.cost.price_usd < b.cost.price_usd) {
                    best = Some(report);
                }
            }
            if let Some(best) = best {
                summary.insert(
                    query,
                    QuerySummary {
                        query_id: query,
                        best_db: best.db_name.clone(),
                        price_usd: best.cost.price_usd,
                        time_ms: best.cost.time_ms,
                        quality: best.quality,
                    },
                );
            }
        }
        summary
    }

    pub fn database_sizes(&self) -> Vec<VariantSize> {
        self.databases
            .iter()
            .map(|(db_name, variant)| {
                let collections: Vec<CollectionSize> = variant
                    .iter()
                    .filter_map(|(role, schema)| {
                        let document_count = self.stats.document_count(role)?;
                        let doc_size_bytes = estimate_document_size_with(&self.cfg.size, schema);
                        Some(CollectionSize {
                            role: role.clone(),
                            document_count,
                            doc_size_bytes,
                            size_bytes: doc_size_bytes.saturating_mul(document_count),
                        })
                    })
                    .collect();
                let total_bytes = collections
                    .iter()
                    .map(|c| c.size_bytes)
                    .fold(0u64, u64::saturating_add);
                VariantSize {
                    db_name: db_name.clone(),
                    collections,
                    total_bytes,
                    total_gb: bytes_to_gb(total_bytes),
                }
            })
            .collect()
    }
}

fn populated<'a>(variant: &'a DatabaseVariant, role: &str) -> Option<&'a SchemaNode> {
    variant.get(role).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stock_schema(embedded: bool) -> SchemaNode {
        let base = SchemaNode::document([
            SchemaNode::scalar("IDP", "integer"),
            SchemaNode::scalar("IDW", "integer"),
            SchemaNode::scalar("quantity", "integer"),
        ]);
        if embedded {
            base.with_field(SchemaNode::object(
                "product",
                [
                    SchemaNode::scalar("name", "string"),
                    SchemaNode::scalar("brand", "string"),
                ],
            ))
        } else {
            base
        }
    }

    fn executor() -> QueryExecutor {
        let mut dbs = BTreeMap::new();
        dbs.insert(
            "DB1".to_string(),
            DatabaseVariant::from([("stock".to_string(), stock_schema(false))]),
        );
        dbs.insert(
            "DB3".to_string(),
            DatabaseVariant::from([("stock".to_string(), stock_schema(true))]),
        );
        QueryExecutor::new(dbs, GlobalStats::default())
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn servers_never_exceed_cluster_size() {
        let variants = BTreeMap::from([
            (
                "DB1".to_string(),
                DatabaseVariant::from([("stock".to_string(), stock_schema(false))]),
            ),
        ]);
        let large = GlobalStats {
            num_orderlines: 4_000_000_000_000_000,
            num_servers: 1000,
            ..GlobalStats::default()
        };
        let exec = QueryExecutor::new(variants.clone(), large);
        let q3 = exec.execute(QueryId::Q3, "DB1").unwrap();
        assert_eq!(q3.cost.servers_accessed, 1000);

        let single = GlobalStats {
            num_servers: 1,
            ..GlobalStats::default()
        };
        let exec = QueryExecutor::new(variants, single);
        for query in QueryId::ALL {
            let r = exec.execute(query, "DB1").unwrap();
            assert_eq!(r.cost.servers_accessed, 1, "{query}");
        }
    }

    #[test]
    fn point_lookup() {
        let r = executor().execute(QueryId::Q1, "DB1").unwrap();
        assert_eq!(r.docs_scanned, 1);
        assert_eq!(r.cost.servers_accessed, 1);
        assert_eq!(r.cost.time_ms, 0.001);
        assert_eq!(r.quality, Quality::Excellent);
        assert_eq!(r.doc_size_bytes, 3 * 20);
    }

    #[test]
    fn brand_and_date_filters() {
        let e = executor();
        let q2 = e.execute(QueryId::Q2, "DB1").unwrap();
        assert_eq!(q2.docs_scanned, 100);
        assert!(close(q2.cost.time_ms, 0.1));
        // No product schema: fixed fallback size.
        assert_eq!(q2.doc_size_bytes, 1000);

        let q3 = e.execute(QueryId::Q3, "DB1").unwrap();
        assert_eq!(q3.docs_scanned, 4_000_000_000 / 365);
        assert_eq!(q3.cost.servers_accessed, 2);
        assert_eq!(q3.quality, Quality::Ok);
        assert_eq!(q3.doc_size_bytes, 300);
    }

    #[test]
    fn embedded_product_avoids_the_join() {
        let e = executor();
        let joined = e.execute(QueryId::Q4, "DB1").unwrap();
        let embedded = e.execute(QueryId::Q4, "DB3").unwrap();
        assert!(!joined.optimization);
        assert!(embedded.optimization);
        assert_eq!(joined.cost.servers_accessed, 2);
        assert_eq!(embedded.cost.servers_accessed, 1);
        assert!(close(joined.cost.time_ms, 100.0));
        assert!(close(embedded.cost.time_ms, 0.5));
        assert_eq!(joined.quality, Quality::Slow);
        assert_eq!(embedded.quality, Quality::Excellent);

        let q5 = e.execute(QueryId::Q5, "DB3").unwrap();
        assert_eq!(q5.docs_scanned, 100 * 200);
        assert!(close(q5.cost.time_ms, 0.2));
    }

    #[test]
    fn carbon_and_price_use_the_shared_formula() {
        let e = executor();
        let r = e.execute(QueryId::Q4, "DB1").unwrap();
        let expected = CostReport::from_parts(Algorithm::NestedLoop, 2, 100.0, &e.cfg.cluster);
        assert!(close(r.cost.price_usd, expected.price_usd));
        assert!(close(r.cost.carbon_kg, expected.carbon_kg));
        assert!(close(r.time_seconds(), 0.1));
    }

    #[test]
    fn unknown_variant_is_an_error() {
        assert!(matches!(
            executor().execute(QueryId::Q1, "DB9"),
            Err(ExecError::UnknownDatabase(_))
        ));
    }

    #[test]
    fn summary_picks_cheapest_and_breaks_ties_by_name() {
        let summary = executor().get_summary();
        assert_eq!(summary.len(), 5);
        assert_eq!(summary[&QueryId::Q4].best_db, "DB3");
        assert_eq!(summary[&QueryId::Q5].best_db, "DB3");
        // Q1–Q3 cost the same everywhere.
        assert_eq!(summary[&QueryId::Q1].best_db, "DB1");
        assert_eq!(summary[&QueryId::Q3].best_db, "DB1");
    }

    #[test]
    fn empty_executor_has_empty_summary() {
        let e = QueryExecutor::new(BTreeMap::new(), GlobalStats::default());
        assert!(e.execute_all_queries().is_empty());
        assert!(e.get_summary().is_empty());
    }

    #[test]
    fn from_json_and_sizes() {
        let e = QueryExecutor::from_json(
            &json!({
                "DB2": {
                    "product": { "properties": { "IDP": { "type": "integer" } } },
                    "notes": { "properties": { "text": { "type": "string" } } }
                }
            }),
            GlobalStats::default(),
        )
        .unwrap();
        let sizes = e.database_sizes();
        assert_eq!(sizes.len(), 1);
        assert_eq!(sizes[0].collections.len(), 1);
        assert_eq!(sizes[0].total_bytes, 20 * 100_000);

        assert!(QueryExecutor::from_json(&json!([1, 2]), GlobalStats::default()).is_err());
        assert!(QueryExecutor::from_json(&json!({ "DB1": { "stock": 3 } }), GlobalStats::default()).is_err());
    }
}
