use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use supplyroute_allocation::{AllocationConfig, Allocator, TieBreak};
use supplyroute_evaluators::{EvaluatorConfig, EvaluatorRegistry};
use supplyroute_graph::{NetworkBuilder, DEFAULT_MAX_HOPS};
use supplyroute_model::Chunk;

mod input;
mod report;

#[derive(Parser)]
#[command(name = "allocate")]
#[command(about = "Route inventory through a staged supply network", long_about = None)]
#[command(version)]
struct Cli {
    /// Products JSON file (array of product records)
    #[arg(long)]
    products: PathBuf,

    /// Nodes JSON file (array of node records)
    #[arg(long)]
    nodes: PathBuf,

    /// Node-to-node JSON file (array of edge records)
    #[arg(long)]
    edges: PathBuf,

    /// Evaluator config; built-in defaults when the file does not exist
    #[arg(long, default_value = "config/evaluators.json")]
    config: PathBuf,

    /// Where to write allocation results
    #[arg(long, default_value = "allocation_results.json")]
    output: PathBuf,

    /// Maximum edges per candidate path
    #[arg(long, default_value_t = DEFAULT_MAX_HOPS)]
    max_hops: usize,

    /// How equal-score paths are resolved
    #[arg(long, value_enum, default_value_t = TieBreakArg::Lexicographic)]
    tie_break: TieBreakArg,

    /// Allocate chunks in parallel
    #[arg(long)]
    parallel: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TieBreakArg {
    Lexicographic,
    FirstEncountered,
}

impl TieBreakArg {
    const fn as_domain(self) -> TieBreak {
        match self {
            Self::Lexicographic => TieBreak::Lexicographic,
            Self::FirstEncountered => TieBreak::FirstEncountered,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    println!("Loading data...");
    let products = input::load_products(&cli.products)?;
    let nodes = input::load_nodes(&cli.nodes)?;
    let edges = input::load_edges(&cli.edges)?;
    println!(
        "Loaded {} products, {} nodes, {} edges",
        products.len(),
        nodes.len(),
        edges.len()
    );

    println!("Building network graph...");
    let graph = NetworkBuilder::new()
        .require_connectivity(true)
        .build(&nodes, &edges)
        .context("Invalid network")?;
    println!("Network stats: {}", graph.stats());

    println!("Loading evaluator configuration...");
    let evaluator_config = EvaluatorConfig::load(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    let registry = EvaluatorRegistry::with_defaults();

    let config = AllocationConfig {
        max_hops: cli.max_hops,
        tie_break: cli.tie_break.as_domain(),
        parallel: cli.parallel,
    };
    let allocator =
        Allocator::from_registry(Arc::new(graph), &registry, &evaluator_config, config)
            .context("Failed to set up allocator")?;

    println!("Running allocation...");
    let chunks: Vec<Chunk> = products
        .iter()
        .map(|product| Chunk::from_product(Arc::clone(product)))
        .collect();
    let terminals = allocator.graph().terminals();
    let report = allocator.run(&chunks, &terminals, Utc::now());
    println!("Allocated {} products", report.allocated());

    let json = serde_json::to_string_pretty(&report.results)
        .context("Failed to serialize allocation results")?;
    std::fs::write(&cli.output, json)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;
    println!("Results saved to {}", cli.output.display());

    print!(
        "{}",
        report::render_summary(
            &report,
            &allocator.cache().stats(),
            allocator.evaluator().fallback_count()
        )
    );
    Ok(())
}
