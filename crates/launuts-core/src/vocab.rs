//! Namespace IRIs, vocabulary terms, and the prefix table used for serialization.

pub const NS_DCTERMS: &str = "http://purl.org/dc/terms/";
pub const NS_LAU: &str = "http://projekt-opal.de/launuts/lau/";
pub const NS_NUTS: &str = "http://data.europa.eu/nuts/";
pub const NS_SKOS: &str = "http://www.w3.org/2004/02/skos/core#";
pub const NS_GEO: &str = "http://www.opengis.net/ont/geosparql#";
pub const NS_XSD: &str = "http://www.w3.org/2001/XMLSchema#";
pub const NS_OGC: &str = "http://www.opengis.net/def/crs/OGC/1.3/";

/// Narrower namespace for German LAU codes.
pub const NS_LAU_DE: &str = "http://projekt-opal.de/launuts/lau/DE/";
/// Narrower namespace for NUTS codes.
pub const NS_NUTS_CODE: &str = "http://data.europa.eu/nuts/code/";

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const SKOS_CONCEPT: &str = "http://www.w3.org/2004/02/skos/core#Concept";
pub const SKOS_BROADER: &str = "http://www.w3.org/2004/02/skos/core#broader";
pub const SKOS_NARROWER: &str = "http://www.w3.org/2004/02/skos/core#narrower";
pub const SKOS_NOTATION: &str = "http://www.w3.org/2004/02/skos/core#notation";
pub const SKOS_PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
pub const SKOS_ALT_LABEL: &str = "http://www.w3.org/2004/02/skos/core#altLabel";
pub const GEO_HAS_GEOMETRY: &str = "http://www.opengis.net/ont/geosparql#hasGeometry";
pub const GEO_WKT_LITERAL: &str = "http://www.opengis.net/ont/geosparql#wktLiteral";
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// A single `prefix → namespace` binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefix {
    pub name: &'static str,
    pub namespace: &'static str,
}

/// Ordered prefix bindings handed to a graph at construction time.
///
/// Declaration order is preserved in the serialized output. When compacting an
/// IRI, the longest matching namespace wins, so `laude:` is preferred over
/// `lau:` for German LAU codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixTable {
    prefixes: Vec<Prefix>,
}

impl PrefixTable {
    /// The bindings used for the LAU/NUTS output document.
    pub fn launuts() -> Self {
        let bindings: [(&'static str, &'static str); 9] = [
            ("dct", NS_DCTERMS),
            ("lau", NS_LAU),
            ("nuts", NS_NUTS),
            ("skos", NS_SKOS),
            ("geo", NS_GEO),
            ("xsd", NS_XSD),
            ("ogc", NS_OGC),
            // Size reduction
            ("laude", NS_LAU_DE),
            ("nutscode", NS_NUTS_CODE),
        ];
        Self {
            prefixes: bindings
                .into_iter()
                .map(|(name, namespace)| Prefix { name, namespace })
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Prefix> {
        self.prefixes.iter()
    }

    /// Compact `iri` to `prefix:local` if a namespace matches and the local
    /// part is a safe Turtle local name.
    pub fn compact(&self, iri: &str) -> Option<String> {
        self.prefixes
            .iter()
            .filter(|p| iri.starts_with(p.namespace))
            .max_by_key(|p| p.namespace.len())
            .and_then(|p| {
                let local = &iri[p.namespace.len()..];
                is_safe_local_name(local).then(|| format!("{}:{}", p.name, local))
            })
    }
}

impl Default for PrefixTable {
    fn default() -> Self {
        Self::launuts()
    }
}

/// Conservative subset of Turtle's PN_LOCAL: ASCII alphanumerics, `_` and `-`,
/// not starting with `-`. Empty locals are allowed (`nuts:`).
fn is_safe_local_name(local: &str) -> bool {
    !local.starts_with('-')
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launuts_table_order() {
        let table = PrefixTable::launuts();
        let names: Vec<&str> = table.iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            vec![
                "dct", "lau", "nuts", "skos", "geo", "xsd", "ogc", "laude", "nutscode"
            ]
        );
    }

    #[test]
    fn test_compact_prefers_longest_namespace() {
        let table = PrefixTable::launuts();
        assert_eq!(
            table.compact("http://projekt-opal.de/launuts/lau/DE/08111000"),
            Some("laude:08111000".to_string())
        );
        assert_eq!(
            table.compact("http://data.europa.eu/nuts/code/DE111"),
            Some("nutscode:DE111".to_string())
        );
        assert_eq!(table.compact(SKOS_BROADER), Some("skos:broader".to_string()));
    }

    #[test]
    fn test_compact_rejects_unsafe_local() {
        let table = PrefixTable::launuts();
        assert_eq!(table.compact("http://data.europa.eu/nuts/code/DE 1"), None);
        assert_eq!(table.compact("http://example.org/x"), None);
        assert_eq!(table.compact("http://data.europa.eu/nuts/code/-x"), None);
    }
}
