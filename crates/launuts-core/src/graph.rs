//! Graph data model for the LAU/NUTS concept hierarchy.
//!
//! Nodes are keyed by URI and carry typed facts (broader, notation, labels,
//! geometry) instead of free-form triples, so the per-node cardinalities are
//! enforced by the type. [`ConceptGraph::triples`] flattens the nodes into RDF
//! statements for serialization and comparison.

use crate::vocab::{
    GEO_HAS_GEOMETRY, GEO_WKT_LITERAL, PrefixTable, RDF_TYPE, SKOS_ALT_LABEL, SKOS_BROADER,
    SKOS_CONCEPT, SKOS_NARROWER, SKOS_NOTATION, SKOS_PREF_LABEL,
};
use std::collections::{BTreeMap, BTreeSet};

/// The assembled graph: one [`ConceptNode`] per NUTS region or LAU.
#[derive(Debug, Clone)]
pub struct ConceptGraph {
    prefixes: PrefixTable,
    nodes: BTreeMap<String, ConceptNode>,
}

/// A region or municipality in the concept hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConceptNode {
    pub uri: String,
    /// Asserted as `a skos:Concept` when set.
    pub is_concept: bool,
    /// Parent in the hierarchy. `None` only for the country root.
    pub broader: Option<String>,
    /// Inverse hierarchy edges, only populated when enabled.
    pub narrower: Vec<String>,
    pub notation: Option<String>,
    pub pref_labels: Vec<String>,
    pub alt_labels: Vec<String>,
    /// Well-known-text point.
    pub geometry: Option<String>,
}

impl ConceptNode {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Self::default()
        }
    }
}

/// An RDF term in object position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    Iri(String),
    Literal(Literal),
}

/// A literal. Plain strings carry neither datatype nor language.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    pub lexical: String,
    pub datatype: Option<String>,
    pub language: Option<String>,
}

impl Literal {
    pub fn plain(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: None,
            language: None,
        }
    }

    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: Some(datatype.into()),
            language: None,
        }
    }
}

/// A single `subject predicate object` statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: &str, predicate: &str, object: Term) -> Self {
        Self {
            subject: subject.to_string(),
            predicate: predicate.to_string(),
            object,
        }
    }
}

/// Aggregate counts over the graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphStats {
    pub nodes: usize,
    pub broader_edges: usize,
    pub narrower_edges: usize,
    pub pref_labels: usize,
    pub alt_labels: usize,
    pub geometries: usize,
    pub triples: usize,
}

impl ConceptGraph {
    /// Create an empty graph serialized with the given prefix bindings.
    pub fn new(prefixes: PrefixTable) -> Self {
        Self {
            prefixes,
            nodes: BTreeMap::new(),
        }
    }

    pub fn prefixes(&self) -> &PrefixTable {
        &self.prefixes
    }

    /// Whether a node exists for `uri`. Edge targets alone do not count.
    pub fn contains(&self, uri: &str) -> bool {
        self.nodes.contains_key(uri)
    }

    pub fn node(&self, uri: &str) -> Option<&ConceptNode> {
        self.nodes.get(uri)
    }

    pub fn node_mut(&mut self, uri: &str) -> Option<&mut ConceptNode> {
        self.nodes.get_mut(uri)
    }

    /// Get the node for `uri`, creating an empty one if needed.
    /// Returns `true` alongside the node when it was created by this call.
    pub fn ensure_node(&mut self, uri: &str) -> (&mut ConceptNode, bool) {
        let created = !self.nodes.contains_key(uri);
        let node = self
            .nodes
            .entry(uri.to_string())
            .or_insert_with(|| ConceptNode::new(uri));
        (node, created)
    }

    /// Nodes in URI order.
    pub fn nodes(&self) -> impl Iterator<Item = &ConceptNode> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Flatten every node into RDF statements.
    ///
    /// Repeated labels on one node collapse into a single statement, matching
    /// RDF set semantics.
    pub fn triples(&self) -> BTreeSet<Triple> {
        let mut out = BTreeSet::new();
        for node in self.nodes.values() {
            node_triples(node, &mut out);
        }
        out
    }

    pub fn stats(&self) -> GraphStats {
        let mut stats = GraphStats {
            nodes: self.nodes.len(),
            ..GraphStats::default()
        };
        for node in self.nodes.values() {
            stats.broader_edges += usize::from(node.broader.is_some());
            stats.narrower_edges += node.narrower.len();
            stats.pref_labels += node.pref_labels.len();
            stats.alt_labels += node.alt_labels.len();
            stats.geometries += usize::from(node.geometry.is_some());
        }
        stats.triples = self.triples().len();
        stats
    }
}

impl Default for ConceptGraph {
    fn default() -> Self {
        Self::new(PrefixTable::launuts())
    }
}

fn node_triples(node: &ConceptNode, out: &mut BTreeSet<Triple>) {
    let s = node.uri.as_str();
    if node.is_concept {
        out.insert(Triple::new(s, RDF_TYPE, Term::Iri(SKOS_CONCEPT.to_string())));
    }
    if let Some(parent) = &node.broader {
        out.insert(Triple::new(s, SKOS_BROADER, Term::Iri(parent.clone())));
    }
    for child in &node.narrower {
        out.insert(Triple::new(s, SKOS_NARROWER, Term::Iri(child.clone())));
    }
    if let Some(notation) = &node.notation {
        out.insert(Triple::new(
            s,
            SKOS_NOTATION,
            Term::Literal(Literal::plain(notation.clone())),
        ));
    }
    for label in &node.pref_labels {
        out.insert(Triple::new(
            s,
            SKOS_PREF_LABEL,
            Term::Literal(Literal::plain(label.clone())),
        ));
    }
    for label in &node.alt_labels {
        out.insert(Triple::new(
            s,
            SKOS_ALT_LABEL,
            Term::Literal(Literal::plain(label.clone())),
        ));
    }
    if let Some(wkt) = &node.geometry {
        out.insert(Triple::new(
            s,
            GEO_HAS_GEOMETRY,
            Term::Literal(Literal::typed(wkt.clone(), GEO_WKT_LITERAL)),
        ));
    }
}
