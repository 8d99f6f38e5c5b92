//! Integration tests for launuts-cli functionality.
//! Tests the underlying library functions that the CLI commands invoke.

use launuts_core::builder;
use launuts_core::config::LauNutsConfig;
use launuts_core::graph::Term;
use launuts_core::region::{lau_uri, nuts_uri};
use launuts_core::sources::SourceBundle;
use launuts_core::storage;
use launuts_core::vocab::{GEO_HAS_GEOMETRY, SKOS_BROADER, SKOS_NARROWER};
use serde_json::json;
use std::path::Path;

fn write_bundle(dir: &Path) {
    let nuts = json!([
        {"code": "DE", "labels": ["Deutschland"]},
        {"code": "DE1", "parent": "DE", "labels": ["Baden-Württemberg"]},
        {"code": "DE11", "parent": "DE1", "labels": ["Stuttgart"]},
        {"code": "DE111", "parent": "DE11", "labels": ["Stuttgart, Stadtkreis"]}
    ]);
    let lau = json!([
        {"code": "08111000", "nuts3": "DE111", "name": "Stuttgart", "name_latin": "Stuttgart"},
        {"code": "99999999", "nuts3": "DE999", "name": "Nirgendwo", "name_latin": "Nirgendwo"}
    ]);
    let places = json!({
        "place42": {"lat": 48.78, "lon": 9.18},
        "broken": {"lat": 123.0, "lon": 9.18}
    });
    let nuts_xref = json!({
        "http://data.europa.eu/nuts/code/DE111": "place42",
        "http://data.europa.eu/nuts/code/DE1": "broken"
    });
    let lau_xref = json!({ "http://projekt-opal.de/launuts/lau/DE/08111000": "place42" });

    for (name, value) in [
        ("nuts.json", nuts),
        ("lau.json", lau),
        ("places.json", places),
        ("nuts-xref.json", nuts_xref),
        ("lau-xref.json", lau_xref),
    ] {
        std::fs::write(dir.join(name), value.to_string()).unwrap();
    }
}

fn build(dir: &Path) -> std::path::PathBuf {
    let config = LauNutsConfig::load(dir).unwrap();
    let sources = SourceBundle::load(dir).unwrap();
    let (graph, _) = builder::assemble(&sources, &config);
    storage::write_graph(dir, &config.output.file_name, &graph).unwrap()
}

#[test]
fn test_bundle_load_drops_invalid_places() {
    let tmpdir = tempfile::tempdir().unwrap();
    write_bundle(tmpdir.path());

    let sources = SourceBundle::load(tmpdir.path()).unwrap();
    assert_eq!(sources.nuts.len(), 4);
    assert_eq!(sources.lau.len(), 2);
    assert!(sources.places.contains_key("place42"));
    assert!(!sources.places.contains_key("broken"));
}

#[test]
fn test_bundle_without_required_file_fails() {
    let tmpdir = tempfile::tempdir().unwrap();
    write_bundle(tmpdir.path());
    std::fs::remove_file(tmpdir.path().join("lau.json")).unwrap();

    assert!(SourceBundle::load(tmpdir.path()).is_err());
}

#[test]
fn test_bundle_without_optional_files() {
    let tmpdir = tempfile::tempdir().unwrap();
    write_bundle(tmpdir.path());
    for name in ["places.json", "nuts-xref.json", "lau-xref.json"] {
        std::fs::remove_file(tmpdir.path().join(name)).unwrap();
    }

    let sources = SourceBundle::load(tmpdir.path()).unwrap();
    let (graph, _) = builder::assemble(&sources, &LauNutsConfig::default());
    assert!(graph.nodes().all(|n| n.geometry.is_none()));
    assert!(graph.contains(&lau_uri("08111000")));
}

#[test]
fn test_build_end_to_end() {
    let tmpdir = tempfile::tempdir().unwrap();
    write_bundle(tmpdir.path());

    let path = build(tmpdir.path());
    assert_eq!(path, tmpdir.path().join("launuts.ttl"));

    let triples = storage::read_triples(&path).unwrap();
    assert!(triples.iter().any(|t| t.subject == lau_uri("08111000")
        && t.predicate == SKOS_BROADER
        && t.object == Term::Iri(nuts_uri("DE111"))));
    assert!(triples.iter().all(|t| t.subject != lau_uri("99999999")));
    assert!(triples.iter().all(|t| t.predicate != SKOS_NARROWER));

    // Default order attaches geometry before LAU nodes exist.
    let geometries: Vec<_> = triples
        .iter()
        .filter(|t| t.predicate == GEO_HAS_GEOMETRY)
        .collect();
    assert_eq!(geometries.len(), 1);
    assert_eq!(geometries[0].subject, nuts_uri("DE111"));
}

#[test]
fn test_unresolved_lau_reported() {
    let tmpdir = tempfile::tempdir().unwrap();
    write_bundle(tmpdir.path());

    let sources = SourceBundle::load(tmpdir.path()).unwrap();
    let (_, report) = builder::assemble(&sources, &LauNutsConfig::default());
    assert_eq!(report.lau_nodes, 1);
    assert_eq!(report.unresolved_lau.len(), 1);
    assert_eq!(report.unresolved_lau[0].lau_code, "99999999");
    assert_eq!(report.unresolved_lau[0].nuts3_code, "DE999");
}

#[test]
fn test_config_file_options() {
    let tmpdir = tempfile::tempdir().unwrap();
    write_bundle(tmpdir.path());
    std::fs::write(
        tmpdir.path().join("launuts.toml"),
        r#"
[graph]
emit_inverse_hierarchy_edge = true

[build]
geometry_after_lau = true

[output]
file_name = "graph.ttl"
"#,
    )
    .unwrap();

    let path = build(tmpdir.path());
    assert_eq!(path, tmpdir.path().join("graph.ttl"));

    let triples = storage::read_triples(&path).unwrap();
    assert!(triples.iter().any(|t| t.subject == nuts_uri("DE111")
        && t.predicate == SKOS_NARROWER
        && t.object == Term::Iri(lau_uri("08111000"))));
    assert!(
        triples
            .iter()
            .any(|t| t.subject == lau_uri("08111000") && t.predicate == GEO_HAS_GEOMETRY)
    );
}

#[test]
fn test_invalid_output_file_name_rejected() {
    let tmpdir = tempfile::tempdir().unwrap();
    std::fs::write(
        tmpdir.path().join("launuts.toml"),
        "[output]\nfile_name = \"../escape.ttl\"\n",
    )
    .unwrap();

    assert!(LauNutsConfig::load(tmpdir.path()).is_err());
}
