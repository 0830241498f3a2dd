//! Q1–Q5 battery over five denormalization variants.

use nosqlcost_exec::replay::executor_manifest;
use nosqlcost_exec::{GlobalStats, Quality, QueryExecutor, QueryId};
use serde_json::{json, Value};

fn product_schema() -> Value {
    json!({ "properties": {
        "IDP": { "type": "integer" },
        "name": { "type": "string" },
        "brand": { "type": "string" },
        "price": { "type": "number" },
        "description": { "type": "string" }
    }})
}

fn stock_schema() -> Value {
    json!({ "properties": {
        "IDP": { "type": "integer" },
        "IDW": { "type": "integer" },
        "quantity": { "type": "integer" },
        "location": { "type": "string" }
    }})
}

fn embedded_stock_schema() -> Value {
    json!({ "properties": {
        "IDW": { "type": "integer" },
        "quantity": { "type": "integer" },
        "product": { "type": "object", "properties": {
            "IDP": { "type": "integer" },
            "name": { "type": "string" },
            "brand": { "type": "string" }
        }}
    }})
}

fn orderline_schema() -> Value {
    json!({ "properties": {
        "IDP": { "type": "integer" },
        "IDC": { "type": "integer" },
        "quantity": { "type": "integer" },
        "deliveryDate": { "type": "string" }
    }})
}

fn executor() -> QueryExecutor {
    QueryExecutor::from_json(
        &json!({
            "DB1": { "product": product_schema(), "stock": stock_schema(), "orderline": orderline_schema() },
            "DB2": { "product": product_schema(), "stock": stock_schema(), "orderline": orderline_schema() },
            "DB3": { "stock": embedded_stock_schema(), "orderline": orderline_schema() },
            "DB4": { "product": product_schema(), "orderline": orderline_schema() },
            "DB5": { "product": product_schema(), "stock": stock_schema() }
        }),
        GlobalStats::default(),
    )
    .unwrap()
}

#[test]
fn test_all_queries_on_all_variants() {
    let results = executor().execute_all_queries();
    assert_eq!(results.len(), 5);
    for reports in results.values() {
        assert_eq!(reports.len(), 5);
        for r in reports.values() {
            assert!(r.cost.servers_accessed >= 1);
            assert!(r.cost.time_ms > 0.0);
            assert!(r.cost.price_usd > 0.0);
        }
    }
    // DB4 has no stock collection: Q1 falls back to a fixed size.
    assert_eq!(results["DB4"][&QueryId::Q1].doc_size_bytes, 500);
    assert_eq!(results["DB4"][&QueryId::Q4].doc_size_bytes, 1000);
    // DB5 has no orderline collection.
    assert_eq!(results["DB5"][&QueryId::Q3].doc_size_bytes, 300);
}

#[test]
fn test_embedding_wins_the_joins() {
    let summary = executor().get_summary();
    assert_eq!(summary[&QueryId::Q4].best_db, "DB3");
    assert_eq!(summary[&QueryId::Q5].best_db, "DB3");
    assert_eq!(summary[&QueryId::Q4].quality, Quality::Excellent);
    // Ties go to the first variant name.
    assert_eq!(summary[&QueryId::Q2].best_db, "DB1");
}

#[test]
fn test_variant_sizes() {
    let e = executor();
    let sizes = e.database_sizes();
    let db3 = sizes.iter().find(|v| v.db_name == "DB3").unwrap();
    let stock = db3.collections.iter().find(|c| c.role == "stock").unwrap();
    assert_eq!(stock.document_count, 20_000_000);
    assert_eq!(
        db3.total_bytes,
        db3.collections.iter().map(|c| c.size_bytes).sum::<u64>()
    );
    assert!(db3.total_gb > 0.0);
}

#[test]
fn test_manifest_is_reproducible() {
    let a = executor_manifest(&executor()).unwrap();
    let b = executor_manifest(&executor()).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.inputs_digest.to_hex().len(), 64);
}
