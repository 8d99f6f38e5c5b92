//! Graph assembly: NUTS hierarchy, point geometry, and LAU attachment.
//!
//! The builder owns the graph and the NUTS code lookup for the duration of a
//! run. Data-quality problems never abort a phase; they are logged and
//! collected in the [`BuildReport`] returned by [`GraphBuilder::finish`].

use crate::config::{DuplicateGeometry, GraphOptions, LauNutsConfig};
use crate::graph::ConceptGraph;
use crate::region::{CrossReference, LauRegion, NutsRegion, PlaceIndex};
use crate::sources::SourceBundle;
use crate::vocab::PrefixTable;
use std::collections::HashMap;

/// A LAU entry whose owning NUTS3 code has no node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedLau {
    pub lau_code: String,
    pub nuts3_code: String,
}

/// Outcome counters for geometry attachment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeometryStats {
    /// Geometry set on a node that had none.
    pub attached: usize,
    /// Existing geometry overwritten with a different point.
    pub replaced: usize,
    /// Different point ignored because the node already had one.
    pub kept_first: usize,
    /// Same point attached again.
    pub unchanged: usize,
    /// Cross-reference URI has no node.
    pub missing_node: usize,
    /// Place id not in the place index.
    pub missing_place: usize,
}

/// Everything worth reporting about a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub nuts_nodes: usize,
    pub lau_nodes: usize,
    pub unresolved_lau: Vec<UnresolvedLau>,
    /// NUTS codes whose parent code has no node.
    pub dangling_parents: Vec<String>,
    /// Codes whose broader edge was already set to a different parent.
    pub conflicting_parents: Vec<String>,
    pub geometry: GeometryStats,
}

/// Builds a [`ConceptGraph`] phase by phase.
#[derive(Debug)]
pub struct GraphBuilder {
    graph: ConceptGraph,
    options: GraphOptions,
    on_duplicate_geometry: DuplicateGeometry,
    /// Notation → node URI for every NUTS region, joined against LAU entries.
    nuts3: HashMap<String, String>,
    report: BuildReport,
}

impl GraphBuilder {
    pub fn new(prefixes: PrefixTable, options: GraphOptions) -> Self {
        Self {
            graph: ConceptGraph::new(prefixes),
            options,
            on_duplicate_geometry: DuplicateGeometry::default(),
            nuts3: HashMap::new(),
            report: BuildReport::default(),
        }
    }

    pub fn with_duplicate_geometry(mut self, policy: DuplicateGeometry) -> Self {
        self.on_duplicate_geometry = policy;
        self
    }

    /// Create one node per NUTS region and link each to its parent.
    ///
    /// Nodes are created in a first pass and linked in a second, so parents
    /// may appear after their children in `regions`.
    pub fn add_nuts(&mut self, regions: &[NutsRegion]) -> &mut Self {
        for region in regions {
            let uri = region.uri();
            let (node, created) = self.graph.ensure_node(&uri);
            if self.options.emit_type_assertion {
                node.is_concept = true;
            }
            set_notation(node, &region.code);
            node.pref_labels.extend(region.labels.iter().cloned());
            if created {
                self.report.nuts_nodes += 1;
            }
            self.nuts3.insert(region.code.clone(), uri);
        }

        for region in regions {
            let Some(parent_uri) = region.parent_uri() else {
                continue;
            };
            if !self.graph.contains(&parent_uri) {
                tracing::warn!(
                    "NUTS region {} references unknown parent {}",
                    region.code,
                    region.parent.as_deref().unwrap_or_default()
                );
                self.report.dangling_parents.push(region.code.clone());
            }
            self.link(&region.uri(), &parent_uri, &region.code);
        }

        tracing::info!(
            "NUTS hierarchy: {} nodes from {} regions",
            self.report.nuts_nodes,
            regions.len()
        );
        self
    }

    /// Attach point geometry to existing nodes, NUTS cross-reference first.
    ///
    /// Pairs whose URI has no node or whose place id is not indexed are
    /// skipped without a warning; sparse coverage is expected.
    pub fn add_geometry(
        &mut self,
        nuts_xref: &CrossReference,
        lau_xref: &CrossReference,
        places: &PlaceIndex,
    ) -> &mut Self {
        self.attach_geometry_pass("NUTS", nuts_xref, places);
        self.attach_geometry_pass("LAU", lau_xref, places);
        let stats = self.report.geometry;
        tracing::info!(
            "geometry: {} attached, {} replaced, {} kept, {} unchanged, {} without node, {} without place",
            stats.attached,
            stats.replaced,
            stats.kept_first,
            stats.unchanged,
            stats.missing_node,
            stats.missing_place
        );
        self
    }

    /// Create LAU nodes under their owning NUTS3 region.
    ///
    /// Entries whose NUTS3 code is unknown produce no statements; they are
    /// warned about and recorded in [`BuildReport::unresolved_lau`].
    pub fn add_lau(&mut self, regions: &[LauRegion]) -> &mut Self {
        for region in regions {
            let Some(nuts3_uri) = self.nuts3.get(&region.nuts3).cloned() else {
                tracing::warn!(
                    "Unknown NUTS3 code: {} for LAU {}",
                    region.nuts3,
                    region.code
                );
                self.report.unresolved_lau.push(UnresolvedLau {
                    lau_code: region.code.clone(),
                    nuts3_code: region.nuts3.clone(),
                });
                continue;
            };

            let uri = region.uri();
            let (node, created) = self.graph.ensure_node(&uri);
            if self.options.emit_type_assertion {
                node.is_concept = true;
            }
            set_notation(node, &region.code);
            node.pref_labels.push(region.name.clone());
            if let Some(alt) = region.alternate_name() {
                node.alt_labels.push(alt.to_string());
            }
            if created {
                self.report.lau_nodes += 1;
            }
            self.link(&uri, &nuts3_uri, &region.code);
        }

        if !self.report.unresolved_lau.is_empty() {
            tracing::warn!(
                "{} LAU entries skipped for unknown NUTS3 codes",
                self.report.unresolved_lau.len()
            );
        }
        tracing::info!(
            "LAU: {} nodes from {} entries",
            self.report.lau_nodes,
            regions.len()
        );
        self
    }

    /// Hand over the graph and the collected report.
    pub fn finish(self) -> (ConceptGraph, BuildReport) {
        (self.graph, self.report)
    }

    /// Assert `child broader parent`, plus the inverse edge when enabled.
    fn link(&mut self, child_uri: &str, parent_uri: &str, code: &str) {
        let Some(child) = self.graph.node_mut(child_uri) else {
            return;
        };
        match &child.broader {
            None => child.broader = Some(parent_uri.to_string()),
            Some(existing) if existing == parent_uri => {}
            Some(existing) => {
                tracing::warn!(
                    "{} already has broader {}, ignoring {}",
                    code,
                    existing,
                    parent_uri
                );
                self.report.conflicting_parents.push(code.to_string());
                return;
            }
        }

        if self.options.emit_inverse_hierarchy_edge
            && let Some(parent) = self.graph.node_mut(parent_uri)
            && !parent.narrower.iter().any(|c| c == child_uri)
        {
            parent.narrower.push(child_uri.to_string());
        }
    }

    fn attach_geometry_pass(&mut self, kind: &str, xref: &CrossReference, places: &PlaceIndex) {
        for (uri, place_id) in xref {
            let Some(node) = self.graph.node_mut(uri) else {
                tracing::debug!("{} cross-reference {} has no node", kind, uri);
                self.report.geometry.missing_node += 1;
                continue;
            };
            let Some(coordinate) = places.get(place_id) else {
                tracing::debug!("{} cross-reference {} → {} not indexed", kind, uri, place_id);
                self.report.geometry.missing_place += 1;
                continue;
            };

            let wkt = coordinate.to_wkt();
            let stats = &mut self.report.geometry;
            match node.geometry.as_deref() {
                None => {
                    node.geometry = Some(wkt);
                    stats.attached += 1;
                }
                Some(existing) if existing == wkt => stats.unchanged += 1,
                Some(existing) => match self.on_duplicate_geometry {
                    DuplicateGeometry::Replace => {
                        tracing::warn!("{} geometry {} replaced by {}", uri, existing, wkt);
                        node.geometry = Some(wkt);
                        stats.replaced += 1;
                    }
                    DuplicateGeometry::KeepFirst => {
                        tracing::warn!("{} keeps geometry {}, ignoring {}", uri, existing, wkt);
                        stats.kept_first += 1;
                    }
                },
            }
        }
    }
}

/// Notation is set once; a differing second value is ignored.
fn set_notation(node: &mut crate::graph::ConceptNode, code: &str) {
    match &node.notation {
        None => node.notation = Some(code.to_string()),
        Some(existing) if existing == code => {}
        Some(existing) => {
            tracing::warn!(
                "{} already has notation {}, ignoring {}",
                node.uri,
                existing,
                code
            );
        }
    }
}

/// Run all three phases over a loaded source bundle.
///
/// Geometry goes between the NUTS hierarchy and the LAU attachment unless
/// `build.geometry_after_lau` is set.
pub fn assemble(sources: &SourceBundle, config: &LauNutsConfig) -> (ConceptGraph, BuildReport) {
    let mut builder = GraphBuilder::new(PrefixTable::launuts(), config.graph)
        .with_duplicate_geometry(config.geometry.on_duplicate);

    builder.add_nuts(&sources.nuts);
    if config.build.geometry_after_lau {
        builder
            .add_lau(&sources.lau)
            .add_geometry(&sources.nuts_xref, &sources.lau_xref, &sources.places);
    } else {
        builder
            .add_geometry(&sources.nuts_xref, &sources.lau_xref, &sources.places)
            .add_lau(&sources.lau);
    }
    builder.finish()
}
