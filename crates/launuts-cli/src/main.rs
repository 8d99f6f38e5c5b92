//! CLI binary for LauNuts: build the SKOS graph and inspect written files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use launuts_core::config::LauNutsConfig;
use launuts_core::sources::SourceBundle;
use launuts_core::vocab::PrefixTable;
use launuts_core::{builder, storage};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "launuts", about = "LAU and NUTS SKOS graph builder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the graph from a source bundle directory
    Build {
        /// Directory holding nuts.json, lau.json and the optional geometry files
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory (defaults to the input directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit `a skos:Concept` for every node
        #[arg(long)]
        emit_type_assertion: bool,

        /// Emit skos:narrower from parent to child
        #[arg(long)]
        emit_narrower: bool,
    },

    /// Print triple counts of a written Turtle file
    Inspect {
        /// Turtle file to read
        file: PathBuf,
    },
}

fn get_input_dir(input: Option<PathBuf>) -> Result<PathBuf> {
    match input {
        Some(p) => Ok(p),
        None => std::env::current_dir().context("failed to get current directory"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            input,
            output,
            emit_type_assertion,
            emit_narrower,
        } => {
            let input = get_input_dir(input)?;
            cmd_build(&input, output, emit_type_assertion, emit_narrower)
        }
        Commands::Inspect { file } => cmd_inspect(&file),
    }
}

fn cmd_build(
    input: &Path,
    output: Option<PathBuf>,
    emit_type_assertion: bool,
    emit_narrower: bool,
) -> Result<()> {
    let mut config = LauNutsConfig::load(input)?;
    // Flags only switch options on; config and env can do the same.
    config.graph.emit_type_assertion |= emit_type_assertion;
    config.graph.emit_inverse_hierarchy_edge |= emit_narrower;

    let sources = SourceBundle::load(input)?;
    let (graph, report) = builder::assemble(&sources, &config);

    let output_dir = output.unwrap_or_else(|| input.to_path_buf());
    let path = storage::write_graph(&output_dir, &config.output.file_name, &graph)?;

    let stats = graph.stats();
    println!("Wrote {}", path.display());
    println!();
    println!("NUTS regions: {}", report.nuts_nodes);
    println!("LAU regions: {}", report.lau_nodes);
    println!("Nodes: {}", stats.nodes);
    println!("Broader edges: {}", stats.broader_edges);
    if config.graph.emit_inverse_hierarchy_edge {
        println!("Narrower edges: {}", stats.narrower_edges);
    }
    println!("Geometries: {}", stats.geometries);
    println!("Triples: {}", stats.triples);

    if !report.unresolved_lau.is_empty() {
        println!();
        println!(
            "Unresolved LAU entries: {} (unknown NUTS3 code)",
            report.unresolved_lau.len()
        );
    }
    if !report.dangling_parents.is_empty() {
        println!(
            "NUTS regions with unknown parent: {}",
            report.dangling_parents.len()
        );
    }

    Ok(())
}

fn cmd_inspect(file: &Path) -> Result<()> {
    let triples = storage::read_triples(file)?;
    let prefixes = PrefixTable::launuts();

    let mut by_predicate: BTreeMap<String, usize> = BTreeMap::new();
    for triple in &triples {
        let name = prefixes
            .compact(&triple.predicate)
            .unwrap_or_else(|| format!("<{}>", triple.predicate));
        *by_predicate.entry(name).or_default() += 1;
    }
    let subjects = triples
        .iter()
        .map(|t| t.subject.as_str())
        .collect::<std::collections::BTreeSet<_>>()
        .len();

    println!("{}", file.display());
    println!("Triples: {}", triples.len());
    println!("Subjects: {subjects}");
    for (predicate, count) in &by_predicate {
        println!("  {predicate}: {count}");
    }

    Ok(())
}
