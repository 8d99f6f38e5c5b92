//! Input descriptors handed to the graph builder by the loaders.

use crate::vocab::{NS_LAU_DE, NS_NUTS_CODE};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Place identifier → coordinate.
pub type PlaceIndex = HashMap<String, Coordinate>;

/// Region URI → place identifier in the external index.
pub type CrossReference = HashMap<String, String>;

/// A NUTS region at any level, including the synthetic country root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutsRegion {
    pub code: String,
    /// Code of the parent region. `None` only for the country root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl NutsRegion {
    pub fn new(code: impl Into<String>, parent: Option<&str>, labels: &[&str]) -> Self {
        Self {
            code: code.into(),
            parent: parent.map(String::from),
            labels: labels.iter().map(|l| (*l).to_string()).collect(),
        }
    }

    pub fn uri(&self) -> String {
        nuts_uri(&self.code)
    }

    pub fn parent_uri(&self) -> Option<String> {
        self.parent.as_deref().map(nuts_uri)
    }
}

/// A German local administrative unit (municipality).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LauRegion {
    pub code: String,
    /// Code of the owning NUTS3 region.
    pub nuts3: String,
    pub name: String,
    /// Latin-script spelling of the name.
    pub name_latin: String,
}

impl LauRegion {
    pub fn new(
        code: impl Into<String>,
        nuts3: impl Into<String>,
        name: impl Into<String>,
        name_latin: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            nuts3: nuts3.into(),
            name: name.into(),
            name_latin: name_latin.into(),
        }
    }

    pub fn uri(&self) -> String {
        lau_uri(&self.code)
    }

    /// The Latin-script name, only when it differs from the primary name.
    pub fn alternate_name(&self) -> Option<&str> {
        (self.name != self.name_latin).then_some(self.name_latin.as_str())
    }
}

pub fn nuts_uri(code: &str) -> String {
    format!("{NS_NUTS_CODE}{}", encode_segment(code))
}

pub fn lau_uri(code: &str) -> String {
    format!("{NS_LAU_DE}{}", encode_segment(code))
}

/// Percent-encode a code so it forms a single valid IRI path segment.
///
/// Codes are not validated upstream; spaces, brackets, quotes and the like
/// become `%XX` UTF-8 escapes. Letters outside ASCII are kept as they are
/// when IRIs allow them.
fn encode_segment(code: &str) -> String {
    let mut out = String::with_capacity(code.len());
    for c in code.chars() {
        if is_segment_char(c) {
            out.push(c);
        } else {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("%{byte:02X}"));
            }
        }
    }
    out
}

/// `ipchar` of RFC 3987 without `%`.
fn is_segment_char(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_alphanumeric()
            || matches!(
                c,
                '-' | '.' | '_' | '~' | '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ','
                    | ';' | '=' | ':' | '@'
            );
    }
    let cp = u32::from(c);
    // ucschar ranges; plane-final noncharacters are excluded.
    matches!(cp, 0xA0..=0xD7FF | 0xF900..=0xFDCF | 0xFDF0..=0xFFEF | 0x1_0000..=0xE_FFFD)
        && (cp & 0xFFFE) != 0xFFFE
}

/// Errors for coordinates that cannot be turned into a point geometry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    #[error("coordinate is not a finite number: ({lat}, {lon})")]
    NotFinite { lat: f64, lon: f64 },
    #[error("latitude {0} outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// A WGS84 point in decimal degrees, range-checked on construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(CoordinateError::NotFinite { lat, lon });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(CoordinateError::LongitudeOutOfRange(lon));
        }
        Ok(Self { lat, lon })
    }

    /// Well-known-text point, latitude first, no CRS qualifier.
    ///
    /// Numbers use the shortest representation that round-trips the `f64`,
    /// so `48.78` stays `48.78` and `9.0` becomes `9`.
    pub fn to_wkt(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "POINT({} {})", self.lat, self.lon)
    }
}
