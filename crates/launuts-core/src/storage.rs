//! Write the graph document to disk and read it back.

use crate::graph::{ConceptGraph, Triple};
use crate::turtle;
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_FILE_NAME: &str = "launuts.ttl";

/// Provenance comment placed before the Turtle body.
pub const PROVENANCE_HEADER: &str = concat!(
    "# LAU and NUTS data for Germany\n",
    "# \n",
    "# Local Administrative Units (LAU)\n",
    "# Nomenclature of Territorial Units for Statistics (NUTS)\n",
    "# https://ec.europa.eu/eurostat/web/nuts/overview\n",
    "# \n",
    "# Generator software: \n",
    "# Data Science Group (DICE) at Paderborn University\n",
    "# Open Data Portal Germany (OPAL), Adrian Wilke\n",
    "# https://github.com/projekt-opal/LauNuts\n",
    "# \n",
    "# Data:\n",
    "# https://hobbitdata.informatik.uni-leipzig.de/OPAL/\n",
    "# \n",
);

/// Get the path of the graph file inside `output_dir`.
pub fn output_file(output_dir: &Path, file_name: &str) -> PathBuf {
    output_dir.join(file_name)
}

/// Render the full document: provenance header followed by the Turtle body.
pub fn render(graph: &ConceptGraph) -> Result<String> {
    let mut doc = String::from(PROVENANCE_HEADER);
    turtle::write_turtle(graph, &mut doc).context("failed to serialize graph as Turtle")?;
    Ok(doc)
}

/// Write the document into `output_dir`, creating the directory if needed.
/// An existing file is replaced. Returns the written path.
pub fn write_graph(output_dir: &Path, file_name: &str, graph: &ConceptGraph) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;

    let path = output_file(output_dir, file_name);
    let doc = render(graph)?;
    fs::write(&path, doc).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!("wrote {} nodes to {}", graph.len(), path.display());

    Ok(path)
}

/// Read a written document back as a set of triples.
pub fn read_triples(path: &Path) -> Result<BTreeSet<Triple>> {
    let doc = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    turtle::parse_triples(&doc).with_context(|| format!("failed to parse {}", path.display()))
}
