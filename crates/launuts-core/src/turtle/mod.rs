//! Turtle serialization of a [`ConceptGraph`], and read-back for verification.

mod parse;

pub use parse::{TurtleError, parse_triples};

use crate::graph::{ConceptGraph, ConceptNode, Literal};
use crate::vocab::{
    GEO_HAS_GEOMETRY, GEO_WKT_LITERAL, PrefixTable, SKOS_ALT_LABEL, SKOS_BROADER, SKOS_CONCEPT,
    SKOS_NARROWER, SKOS_NOTATION, SKOS_PREF_LABEL,
};
use std::fmt::{self, Write};

/// Continuation indent for the second and later predicates of a subject.
const INDENT: &str = "        ";

/// Write `@prefix` declarations followed by one block per node, in URI order.
pub fn write_turtle<W: Write>(graph: &ConceptGraph, out: &mut W) -> fmt::Result {
    let prefixes = graph.prefixes();
    for prefix in prefixes.iter() {
        writeln!(out, "@prefix {}: <{}> .", prefix.name, prefix.namespace)?;
    }

    for node in graph.nodes() {
        let statements = node_statements(node, prefixes);
        if statements.is_empty() {
            continue;
        }
        writeln!(out)?;
        write!(out, "{}", format_iri(&node.uri, prefixes))?;
        for (i, (predicate, objects)) in statements.iter().enumerate() {
            if i == 0 {
                write!(out, "  ")?;
            } else {
                write!(out, " ;\n{INDENT}")?;
            }
            write!(out, "{}  {}", predicate, objects.join(" , "))?;
        }
        writeln!(out, " .")?;
    }
    Ok(())
}

/// Predicate/object lists for one node, in a fixed predicate order.
fn node_statements(node: &ConceptNode, prefixes: &PrefixTable) -> Vec<(String, Vec<String>)> {
    let mut statements = Vec::new();
    if node.is_concept {
        // rdf:type is written with the `a` keyword, so no rdf prefix is needed.
        statements.push(("a".to_string(), vec![format_iri(SKOS_CONCEPT, prefixes)]));
    }

    let mut push = |predicate: &str, objects: Vec<String>| {
        if !objects.is_empty() {
            statements.push((format_iri(predicate, prefixes), objects));
        }
    };
    push(SKOS_BROADER, iri_list(&node.broader, prefixes));
    push(SKOS_NARROWER, iri_list(&node.narrower, prefixes));
    push(SKOS_NOTATION, plain_list(&node.notation, prefixes));
    push(SKOS_PREF_LABEL, plain_list(&node.pref_labels, prefixes));
    push(SKOS_ALT_LABEL, plain_list(&node.alt_labels, prefixes));
    if let Some(wkt) = &node.geometry {
        let literal = Literal::typed(wkt.clone(), GEO_WKT_LITERAL);
        push(GEO_HAS_GEOMETRY, vec![format_literal(&literal, prefixes)]);
    }
    statements
}

fn iri_list<'a>(
    uris: impl IntoIterator<Item = &'a String>,
    prefixes: &PrefixTable,
) -> Vec<String> {
    uris.into_iter().map(|u| format_iri(u, prefixes)).collect()
}

fn plain_list<'a>(
    values: impl IntoIterator<Item = &'a String>,
    prefixes: &PrefixTable,
) -> Vec<String> {
    values
        .into_iter()
        .map(|v| format_literal(&Literal::plain(v.clone()), prefixes))
        .collect()
}

/// `prefix:local` when the table allows it, `<iri>` otherwise.
pub fn format_iri(iri: &str, prefixes: &PrefixTable) -> String {
    prefixes
        .compact(iri)
        .unwrap_or_else(|| format!("<{}>", escape_iri(iri)))
}

pub fn format_literal(literal: &Literal, prefixes: &PrefixTable) -> String {
    let mut out = format!("\"{}\"", escape_string(&literal.lexical));
    if let Some(lang) = &literal.language {
        out.push('@');
        out.push_str(lang);
    } else if let Some(datatype) = &literal.datatype {
        out.push_str("^^");
        out.push_str(&format_iri(datatype, prefixes));
    }
    out
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// Characters not allowed in an IRIREF are percent-encoded; a `\uXXXX`
/// escape would decode back to the illegal character.
fn escape_iri(iri: &str) -> String {
    let mut out = String::with_capacity(iri.len());
    for c in iri.chars() {
        if c <= ' ' || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\') {
            out.push_str(&format!("%{:02X}", u32::from(c)));
        } else {
            out.push(c);
        }
    }
    out
}
