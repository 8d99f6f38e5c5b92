//! JSON source bundle: the pre-parsed NUTS, LAU, place, and cross-reference data.
//!
//! Layout of a bundle directory:
//!
//! | file             | content                                   |
//! |------------------|-------------------------------------------|
//! | `nuts.json`      | `[{"code", "parent"?, "labels": [..]}]`   |
//! | `lau.json`       | `[{"code", "nuts3", "name", "name_latin"}]` |
//! | `places.json`    | `{"<place id>": {"lat", "lon"}}`          |
//! | `nuts-xref.json` | `{"<NUTS URI>": "<place id>"}`            |
//! | `lau-xref.json`  | `{"<LAU URI>": "<place id>"}`             |
//!
//! The place and cross-reference files are optional.

use crate::region::{Coordinate, CrossReference, LauRegion, NutsRegion, PlaceIndex};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const NUTS_FILE: &str = "nuts.json";
pub const LAU_FILE: &str = "lau.json";
pub const PLACES_FILE: &str = "places.json";
pub const NUTS_XREF_FILE: &str = "nuts-xref.json";
pub const LAU_XREF_FILE: &str = "lau-xref.json";

/// All inputs of one build.
#[derive(Debug, Clone, Default)]
pub struct SourceBundle {
    pub nuts: Vec<NutsRegion>,
    pub lau: Vec<LauRegion>,
    pub places: PlaceIndex,
    pub nuts_xref: CrossReference,
    pub lau_xref: CrossReference,
}

#[derive(Deserialize)]
struct PlaceRecord {
    lat: f64,
    lon: f64,
}

impl SourceBundle {
    /// Load a bundle from `dir`. NUTS and LAU files are required.
    pub fn load(dir: &Path) -> Result<Self> {
        let nuts: Vec<NutsRegion> = read_json(&dir.join(NUTS_FILE))?;
        let lau: Vec<LauRegion> = read_json(&dir.join(LAU_FILE))?;
        let places = read_optional_json::<HashMap<String, PlaceRecord>>(&dir.join(PLACES_FILE))?
            .map(place_index)
            .unwrap_or_default();
        let nuts_xref: CrossReference =
            read_optional_json(&dir.join(NUTS_XREF_FILE))?.unwrap_or_default();
        let lau_xref: CrossReference =
            read_optional_json(&dir.join(LAU_XREF_FILE))?.unwrap_or_default();

        tracing::info!(
            "loaded {} NUTS regions, {} LAU entries, {} places from {}",
            nuts.len(),
            lau.len(),
            places.len(),
            dir.display()
        );

        Ok(Self {
            nuts,
            lau,
            places,
            nuts_xref,
            lau_xref,
        })
    }
}

/// Validate raw place records, dropping out-of-range coordinates.
fn place_index(records: HashMap<String, PlaceRecord>) -> PlaceIndex {
    records
        .into_iter()
        .filter_map(|(id, record)| match Coordinate::new(record.lat, record.lon) {
            Ok(coordinate) => Some((id, coordinate)),
            Err(e) => {
                tracing::warn!("skipping place {}: {}", id, e);
                None
            }
        })
        .collect()
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("failed to parse {}", path.display()))
}

fn read_optional_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        tracing::debug!("{} not found, using empty input", path.display());
        return Ok(None);
    }
    read_json(path).map(Some)
}
