//! Turtle read-back through Sophia.
//!
//! Only the shapes the writer produces are supported: IRI subjects and
//! predicates, IRI or literal objects. Blank nodes are rejected.

use crate::graph::{Literal, Term};
use crate::vocab::XSD_STRING;
use std::collections::BTreeSet;

/// Errors from reading a Turtle document back into triples.
#[derive(Debug, thiserror::Error)]
pub enum TurtleError {
    #[error("failed to parse Turtle: {0}")]
    Syntax(String),
    #[error("unsupported RDF term: {0}")]
    UnsupportedTerm(String),
}

/// Parse a Turtle document into a set of triples.
pub fn parse_triples(input: &str) -> Result<BTreeSet<crate::graph::Triple>, TurtleError> {
    use sophia::api::prelude::*;

    let reader = std::io::BufReader::new(std::io::Cursor::new(input.as_bytes()));
    let mut out = BTreeSet::new();
    let mut parser = sophia::turtle::parser::turtle::parse_bufread(reader);
    parser
        .try_for_each_triple(|t| -> Result<(), TurtleError> {
            let subject = parse_iri_display(&t.s().to_string())?;
            let predicate = parse_iri_display(&t.p().to_string())?;
            let object = parse_term_display(&t.o().to_string())?;
            out.insert(crate::graph::Triple {
                subject,
                predicate,
                object,
            });
            Ok(())
        })
        .map_err(|e| TurtleError::Syntax(e.to_string()))?;
    Ok(out)
}

fn parse_iri_display(term: &str) -> Result<String, TurtleError> {
    match parse_term_display(term)? {
        Term::Iri(iri) => Ok(iri),
        Term::Literal(_) => Err(TurtleError::UnsupportedTerm(term.to_string())),
    }
}

/// Parse the N-Triples-style display form of a term.
fn parse_term_display(term: &str) -> Result<Term, TurtleError> {
    let s = term.trim();

    if let Some(iri) = s.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
        return Ok(Term::Iri(iri.to_string()));
    }

    if s.starts_with('"') {
        // Language tags and datatype IRIs never contain a quote.
        let end = s
            .rfind('"')
            .filter(|&i| i > 0)
            .ok_or_else(|| TurtleError::UnsupportedTerm(s.to_string()))?;
        let lexical = unescape(&s[1..end]);
        let rest = &s[end + 1..];

        let mut literal = Literal::plain(lexical);
        if let Some(lang) = rest.strip_prefix('@') {
            literal.language = Some(lang.to_string());
        } else if let Some(dt) = rest.strip_prefix("^^") {
            let dt = dt.trim();
            let dt = dt
                .strip_prefix('<')
                .and_then(|t| t.strip_suffix('>'))
                .unwrap_or(dt);
            if dt != XSD_STRING {
                literal.datatype = Some(dt.to_string());
            }
        }
        return Ok(Term::Literal(literal));
    }

    Err(TurtleError::UnsupportedTerm(s.to_string()))
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(u @ ('u' | 'U')) => {
                let width = if u == 'u' { 4 } else { 8 };
                let hex: String = chars.by_ref().take(width).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push('\\');
                        out.push(u);
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
