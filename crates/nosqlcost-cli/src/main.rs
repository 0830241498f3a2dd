//! nosqlcost CLI: size, sharding and query-cost reports from JSON inputs.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use nosqlcost_core::collection::Collection;
use nosqlcost_core::config::CostConfig;
use nosqlcost_core::schema::SchemaNode;
use nosqlcost_core::stats::DomainStatistics;
use nosqlcost_exec::replay::{executor_manifest, workload_manifest};
use nosqlcost_exec::{GlobalStats, QueryExecutor, QueryId, Workload};
use nosqlcost_model::cost::{compare_algorithms_with, Algorithm, QueryCostModel};
use nosqlcost_model::sharding::sharding_candidates;
use nosqlcost_model::sizes::{bytes_to_gb, compute_collection_size_bytes_with, estimate_document_size_with};

#[derive(Parser)]
#[command(name = "nosqlcost")]
#[command(about = "Size and query-cost estimates for NoSQL denormalization designs", long_about = None)]
struct Cli {
    /// YAML file overriding cost constants (defaults + NOSQLCOST_* env otherwise)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log model decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print reports as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Document and collection size of one schema
    Sizes {
        /// JSON schema file
        #[arg(short, long)]
        schema: PathBuf,

        /// Number of documents in the collection
        #[arg(short, long, default_value_t = 1)]
        count: i64,
    },

    /// Per-server distribution of the standard shard-key candidates
    Sharding {
        /// JSON statistics file
        #[arg(short, long)]
        stats: PathBuf,
    },

    /// Cost of scanning documents under one or every access algorithm
    Costs {
        #[arg(long)]
        docs: u64,

        #[arg(long, default_value_t = 1)]
        distinct: u64,

        #[arg(long, default_value_t = 1000)]
        servers: u64,

        /// index, shard, nested_loop or full_scan (all when omitted)
        #[arg(short, long)]
        algorithm: Option<String>,
    },

    /// Run a YAML workload of operator invocations
    Operators {
        /// YAML workload file
        #[arg(short, long)]
        workload: PathBuf,

        /// JSON file: {"<name>": {"schema": {...}, "document_count": N, "stats": {...}}}
        #[arg(short, long)]
        collections: PathBuf,

        /// JSON statistics merged under each collection's own statistics
        #[arg(short, long)]
        stats: Option<PathBuf>,
    },

    /// Q1–Q5 across database variants
    Queries {
        /// JSON file: {"<variant>": {"<role>": <schema>, ...}}
        #[arg(short, long)]
        databases: PathBuf,

        #[arg(short, long)]
        stats: Option<PathBuf>,

        /// Also print the cheapest variant per query
        #[arg(long)]
        summary: bool,

        /// Also print each variant's storage footprint
        #[arg(long)]
        sizes: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .try_init()
            .ok();
    }

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = load_config(cli.config.as_deref())?;
    match &cli.command {
        Commands::Sizes { schema, count } => sizes(&cfg, schema, *count, cli.json),
        Commands::Sharding { stats } => sharding(stats, cli.json),
        Commands::Costs {
            docs,
            distinct,
            servers,
            algorithm,
        } => costs(&cfg, *docs, *distinct, *servers, algorithm.as_deref(), cli.json),
        Commands::Operators {
            workload,
            collections,
            stats,
        } => operators(&cfg, workload, collections, stats.as_deref(), cli.json),
        Commands::Queries {
            databases,
            stats,
            summary,
            sizes,
        } => queries(&cfg, databases, stats.as_deref(), *summary, *sizes, cli.json),
    }
}

/// Defaults with env overrides, then the YAML file if one is given.
fn load_config(path: Option<&Path>) -> Result<CostConfig, Box<dyn std::error::Error>> {
    match path {
        Some(p) => Ok(CostConfig::from_yaml_str(&fs::read_to_string(p)?)?),
        None => {
            let cfg = CostConfig::from_env();
            cfg.validate()?;
            Ok(cfg)
        }
    }
}

fn read_json(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|e| format!("{}: {}", path.display(), e).into())
}

fn read_stats(path: Option<&Path>) -> Result<DomainStatistics, Box<dyn std::error::Error>> {
    match path {
        Some(p) => Ok(DomainStatistics::from_json(&read_json(p)?)?),
        None => Ok(DomainStatistics::new()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
struct SizeReport<'a> {
    schema: &'a str,
    doc_size_bytes: u64,
    document_count: u64,
    collection_size_bytes: u64,
    collection_size_gb: f64,
}

fn size_report<'a>(cfg: &CostConfig, collection: &'a Collection) -> SizeReport<'a> {
    let total = compute_collection_size_bytes_with(&cfg.size, collection);
    SizeReport {
        schema: collection.name(),
        doc_size_bytes: estimate_document_size_with(&cfg.size, collection.schema()),
        document_count: collection.document_count(),
        collection_size_bytes: total,
        collection_size_gb: bytes_to_gb(total),
    }
}

fn sizes(cfg: &CostConfig, schema_path: &Path, count: i64, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let schema = SchemaNode::from_json(&read_json(schema_path)?)?;
    let name = schema_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("collection");
    let collection = Collection::new(name, schema, DomainStatistics::new(), count)?;
    let report = size_report(cfg, &collection);

    if json {
        return print_json(&report);
    }
    println!("{}", collection);
    println!("  Document size:   {} bytes", report.doc_size_bytes);
    println!(
        "  Collection size: {} bytes ({:.4} GB)",
        report.collection_size_bytes, report.collection_size_gb
    );
    Ok(())
}

fn sharding(stats_path: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let stats = read_stats(Some(stats_path))?;
    let candidates = sharding_candidates(&stats)?;
    if json {
        return print_json(&candidates);
    }
    println!(
        "{:<16} {:>16} {:>16} {:>14} {:>14}",
        "Candidate", "Documents", "Distinct keys", "Docs/server", "Keys/server"
    );
    for c in &candidates {
        let flag = if c.distribution.is_well_distributed() {
            ""
        } else {
            "  (hotspots)"
        };
        println!(
            "{:<16} {:>16} {:>16} {:>14.1} {:>14.2}{}",
            c.label,
            c.document_count,
            c.distinct_key_values,
            c.distribution.avg_docs_per_server,
            c.distribution.avg_distinct_values_per_server,
            flag
        );
    }
    Ok(())
}

fn costs(
    cfg: &CostConfig,
    docs: u64,
    distinct: u64,
    servers: u64,
    algorithm: Option<&str>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let reports = match algorithm {
        Some(tag) => {
            let algo: Algorithm = tag.parse()?;
            vec![QueryCostModel::with_config(cfg.cluster.clone(), docs, distinct, servers, algo)?.summary()]
        }
        None => compare_algorithms_with(&cfg.cluster, docs, distinct, servers)?,
    };
    if json {
        return print_json(&reports);
    }
    println!(
        "{:<12} {:>8} {:>14} {:>14} {:>12}",
        "Algorithm", "Servers", "Time (ms)", "Carbon (kg)", "Price (USD)"
    );
    for r in &reports {
        println!(
            "{:<12} {:>8} {:>14.3} {:>14.9} {:>12.6}",
            r.algorithm, r.servers_accessed, r.time_ms, r.carbon_kg, r.price_usd
        );
    }
    Ok(())
}

/// One entry of the collections file.
#[derive(Debug, Deserialize)]
struct CollectionEntry {
    schema: Value,
    document_count: i64,
    #[serde(default)]
    stats: DomainStatistics,
}

/// Build collections; per-collection statistics win over the shared ones.
fn parse_collections(
    doc: &Value,
    shared: &DomainStatistics,
) -> Result<BTreeMap<String, Collection>, Box<dyn std::error::Error>> {
    let entries: BTreeMap<String, CollectionEntry> = serde_json::from_value(doc.clone())?;
    let mut out = BTreeMap::new();
    for (name, entry) in entries {
        let mut stats = shared.clone();
        for (k, v) in entry.stats.iter() {
            stats.insert(k, v);
        }
        let collection = Collection::from_json(name.clone(), &entry.schema, stats, entry.document_count)?;
        out.insert(name, collection);
    }
    Ok(out)
}

fn operators(
    cfg: &CostConfig,
    workload_path: &Path,
    collections_path: &Path,
    stats_path: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let workload = Workload::from_yaml_str(&fs::read_to_string(workload_path)?)?;
    let shared = read_stats(stats_path)?;
    let collections = parse_collections(&read_json(collections_path)?, &shared)?;
    let results = workload.run(&collections, cfg)?;
    let manifest = workload_manifest(&workload, &collections, cfg, &results)?;

    if json {
        return print_json(&serde_json::json!({ "results": results, "manifest": manifest }));
    }
    for (i, r) in results.iter().enumerate() {
        println!("{}. {}", i + 1, r);
    }
    println!("✓ {} operator(s) evaluated", results.len());
    println!("  Inputs digest:  {}", manifest.inputs_digest);
    println!("  Outputs digest: {}", manifest.outputs_digest);
    Ok(())
}

fn queries(
    cfg: &CostConfig,
    databases_path: &Path,
    stats_path: Option<&Path>,
    summary: bool,
    sizes: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let stats = GlobalStats::from_statistics(&read_stats(stats_path)?);
    let executor = QueryExecutor::from_json(&read_json(databases_path)?, stats)?.with_config(cfg.clone());
    let results = executor.execute_all_queries();
    let manifest = executor_manifest(&executor)?;

    if json {
        let mut doc = serde_json::json!({ "results": results, "manifest": manifest });
        if summary {
            doc["summary"] = serde_json::to_value(executor.get_summary())?;
        }
        if sizes {
            doc["sizes"] = serde_json::to_value(executor.database_sizes())?;
        }
        return print_json(&doc);
    }

    for query in QueryId::ALL {
        println!("{}: {}", query, query.title());
        println!("  {}", query.sql());
        println!(
            "  {:<8} {:>14} {:>10} {:>14} {:>16} {:>12} {:>6}  {}",
            "DB", "Docs", "Servers", "Time (ms)", "Carbon (kg)", "Price (USD)", "Opt", "Quality"
        );
        for (db_name, reports) in &results {
            if let Some(r) = reports.get(&query) {
                println!(
                    "  {:<8} {:>14} {:>10} {:>14.3} {:>16.9} {:>12.6} {:>6}  {}",
                    db_name,
                    r.docs_scanned,
                    r.cost.servers_accessed,
                    r.cost.time_ms,
                    r.cost.carbon_kg,
                    r.cost.price_usd,
                    if r.optimization { "yes" } else { "no" },
                    r.quality
                );
            }
        }
        println!();
    }

    if summary {
        println!("Best variant per query");
        for s in executor.get_summary().values() {
            println!(
                "  {}: {} (${:.6}, {:.3} ms) {}",
                s.query_id, s.best_db, s.price_usd, s.time_ms, s.quality
            );
        }
        println!();
    }

    if sizes {
        println!("Storage per variant");
        for v in executor.database_sizes() {
            println!("  {}: {:.2} GB", v.db_name, v.total_gb);
            for c in &v.collections {
                println!(
                    "    {:<10} {:>14} docs x {:>6} bytes = {:.2} GB",
                    c.role,
                    c.document_count,
                    c.doc_size_bytes,
                    bytes_to_gb(c.size_bytes)
                );
            }
        }
        println!();
    }

    println!("✓ Inputs digest: {}", manifest.inputs_digest);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn collection_stats_override_shared_stats() {
        let shared = DomainStatistics::new()
            .with("nb_servers", 1000.0)
            .with("nb_warehouses", 200.0);
        let doc = json!({
            "stock": {
                "schema": { "properties": { "IDW": { "type": "integer" } } },
                "document_count": 20000000,
                "stats": { "nb_warehouses": 50 }
            },
            "product": {
                "schema": { "properties": { "IDP": { "type": "integer" } } },
                "document_count": 100000
            }
        });
        let collections = parse_collections(&doc, &shared).unwrap();
        let stock = &collections["stock"];
        assert_eq!(stock.document_count(), 20_000_000);
        assert_eq!(stock.stats().get("nb_warehouses"), Some(50.0));
        assert_eq!(stock.stats().get("nb_servers"), Some(1000.0));
        assert_eq!(collections["product"].stats().get("nb_warehouses"), Some(200.0));
    }

    #[test]
    fn bad_collections_are_rejected() {
        let shared = DomainStatistics::new();
        let negative = json!({ "p": { "schema": { "properties": {} }, "document_count": -1 } });
        assert!(parse_collections(&negative, &shared).is_err());
        let scalar_schema = json!({ "p": { "schema": 3, "document_count": 1 } });
        assert!(parse_collections(&scalar_schema, &shared).is_err());
    }

    #[test]
    fn size_report_uses_collection_totals() {
        let mut cfg = CostConfig::default();
        cfg.size.key_overhead_bytes = 4;
        let schema = SchemaNode::from_json(&json!({
            "properties": { "IDP": { "type": "integer" }, "name": { "type": "string" } }
        }))
        .unwrap();
        let collection = Collection::new("product", schema, DomainStatistics::new(), 100_000).unwrap();
        let report = size_report(&cfg, &collection);
        assert_eq!(report.schema, "product");
        assert_eq!(report.doc_size_bytes, (4 + 8) + (4 + 80));
        assert_eq!(
            report.collection_size_bytes,
            compute_collection_size_bytes_with(&cfg.size, &collection)
        );
        assert_eq!(report.collection_size_bytes, 96 * 100_000);
    }

    #[test]
    fn default_config_is_valid() {
        let cfg = load_config(None).unwrap();
        assert_eq!(cfg.cluster.docs_per_server, CostConfig::default().cluster.docs_per_server);
    }

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "nosqlcost",
            "costs",
            "--docs",
            "1000",
            "--algorithm",
            "shard",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Commands::Costs { docs: 1000, servers: 1000, .. }
        ));
    }
}
