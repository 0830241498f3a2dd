//! Operator layer against collections built from JSON schemas.

use nosqlcost_core::collection::Collection;
use nosqlcost_core::error::Error;
use nosqlcost_core::stats::DomainStatistics;
use nosqlcost_model::cost::Algorithm;
use nosqlcost_model::sizes::{compute_collection_size_bytes, estimate_document_size};
use nosqlcost_operators::{
    filter_with_sharding, filter_without_sharding, nested_loop_with_sharding,
    nested_loop_without_sharding, OperatorKind,
};
use serde_json::json;

fn stats() -> DomainStatistics {
    DomainStatistics::new()
        .with("nb_products", 100_000.0)
        .with("nb_apple_products", 50.0)
        .with("nb_warehouses", 200.0)
        .with("nb_servers", 1000.0)
}

fn product() -> Collection {
    Collection::from_json(
        "product",
        &json!({ "properties": {
            "IDP": { "type": "integer" },
            "name": { "type": "string" },
            "brand": { "type": "string" },
            "price": { "type": "number" },
            "description": { "type": "string" },
            "categories": { "type": "array", "items": { "properties": {
                "title": { "type": "string" }
            }}},
            "supplier": { "type": "object", "properties": {
                "IDS": { "type": "integer" },
                "since_date": { "type": "string" }
            }}
        }}),
        stats(),
        100_000,
    )
    .unwrap()
}

fn stock() -> Collection {
    Collection::from_json(
        "stock",
        &json!({ "properties": {
            "IDP": { "type": "integer" },
            "IDW": { "type": "integer" },
            "quantity": { "type": "integer" },
            "location": { "type": "string" }
        }}),
        stats(),
        20_000_000,
    )
    .unwrap()
}

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_product_document_size() {
    // 12+8, 12+80, 12+80, 12+8, 12+200, 12+2*(12+80), 12+(12+8)+(12+20)
    let expected = 20 + 92 + 92 + 20 + 212 + (12 + 2 * 92) + (12 + 20 + 32);
    assert_eq!(estimate_document_size(product().schema()), expected);
    assert_eq!(
        compute_collection_size_bytes(&product()),
        expected * 100_000
    );
}

#[test]
fn test_brand_filter_both_ways() {
    let p = product();
    let out = keys(&["name", "price"]);
    let with = filter_with_sharding(&p, &out, "brand", None).unwrap();
    let without = filter_without_sharding(&p, &out, "brand", None).unwrap();

    assert_eq!(with.operator.name(), "filter_with_sharding");
    assert_eq!(with.output_docs, without.output_docs);
    assert_eq!(with.output_bytes, without.output_bytes);
    assert_eq!(with.cost.algorithm, Algorithm::Shard);
    assert_eq!(without.cost.algorithm, Algorithm::FullScan);
    assert!(with.cost.time_ms < without.cost.time_ms);
    assert!(with.cost.price_usd < without.cost.price_usd);
    assert!(with.cost.carbon_kg < without.cost.carbon_kg);
}

#[test]
fn test_warehouse_join_both_ways() {
    let (s, p) = (stock(), product());
    let out = keys(&["name", "quantity"]);
    let with = nested_loop_with_sharding(&s, &p, &out, "IDW", Some(0.005), None).unwrap();
    let without = nested_loop_without_sharding(&s, &p, &out, "IDW", Some(0.005), None).unwrap();

    assert_eq!(with.collection, "stock");
    assert_eq!(with.right_collection.as_deref(), Some("product"));
    assert!(with.docs_scanned <= without.docs_scanned);
    assert_eq!(with.cost.algorithm, Algorithm::NestedLoop);
    // Output sized with the stock schema.
    let stock_doc = estimate_document_size(s.schema());
    assert_eq!(with.output_bytes, stock_doc * with.output_docs);
}

#[test]
fn test_results_serialize_with_operator_names() {
    let r = filter_with_sharding(&product(), &[], "brand", Some(0.1)).unwrap();
    let v = serde_json::to_value(&r).unwrap();
    assert_eq!(v["operator"], "filter_with_sharding");
    assert_eq!(v["cost"]["algorithm"], "shard");
    assert!(v.get("right_collection").is_none());
}

#[test]
fn test_operator_names_round_trip() {
    for kind in OperatorKind::ALL {
        assert_eq!(kind.name().parse::<OperatorKind>().unwrap(), kind);
    }
}

#[test]
fn test_invalid_collections_are_rejected() {
    let err = Collection::from_json("bad", &json!("not a schema"), stats(), 10).unwrap_err();
    assert!(matches!(err, Error::InvalidShape(_)));
    let err = Collection::from_json("bad", &json!({ "properties": {} }), stats(), -5).unwrap_err();
    assert!(matches!(err, Error::InvalidValue(_)));
}
