//! Dataset loading and cleanup.
//!
//! Two static inputs: the world topology (TopoJSON) and the person-event
//! collection (GeoJSON). Records with missing or malformed years are
//! dropped here, before any other stage runs, and never resurface.

use crate::map::Topology;
use anyhow::{Context, Result};
use geojson::{Feature, GeoJson, Value};
use std::fs;
use std::path::Path;

/// Source property carrying the year of birth
const BIRTH_YEAR_KEY: &str = "Geboortejaar";
/// Source property carrying the year of death
const DEATH_YEAR_KEY: &str = "Sterftejaar";
/// Source property carrying the movement category
const CATEGORY_KEY: &str = "Categorie";
/// Literal category value meaning "came to the city"
const CATEGORY_ARRIVED: &str = "Naar Amsterdam gekomen";

/// Which way a person moved relative to the city
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Category {
    Arrived,
    Departed,
}

/// Endpoints of one person's movement
#[derive(Clone, Debug)]
pub enum EventTrack {
    Line(Vec<(f64, f64)>),
    Point((f64, f64)),
}

/// One admissible record: a person born and died in relation to the city
#[derive(Clone, Debug)]
pub struct PersonEvent {
    pub category: Category,
    pub birth_year: u16,
    pub death_year: u16,
    pub track: EventTrack,
}

/// Read and parse the world topology
pub fn load_world(path: &Path) -> Result<Topology> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading world topology {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("parsing world topology {}", path.display()))
}

/// Read the event collection, drop inadmissible records, and convert
/// the survivors
pub fn load_events(path: &Path) -> Result<Vec<PersonEvent>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading event collection {}", path.display()))?;
    let geojson: GeoJson = content
        .parse()
        .with_context(|| format!("parsing event collection {}", path.display()))?;

    let features = match geojson {
        GeoJson::FeatureCollection(fc) => fc.features,
        _ => anyhow::bail!("event collection {} is not a FeatureCollection", path.display()),
    };

    Ok(filter_features(features)
        .iter()
        .filter_map(event_from_feature)
        .collect())
}

/// A record is admissible when both year fields are present and non-empty
/// and the death year's text is under 5 characters (guards against
/// corrupted multi-token year fields)
pub fn admissible(feature: &Feature) -> bool {
    let text = |key: &str| {
        feature
            .properties
            .as_ref()
            .and_then(|p| p.get(key))
            .and_then(|v| v.as_str())
            .unwrap_or("")
    };
    let birth = text(BIRTH_YEAR_KEY);
    let death = text(DEATH_YEAR_KEY);
    !birth.is_empty() && !death.is_empty() && death.len() < 5
}

/// Keep only admissible records. Pure; idempotent by construction.
pub fn filter_features(features: Vec<Feature>) -> Vec<Feature> {
    features.into_iter().filter(admissible).collect()
}

/// Convert one admissible feature. Years that fail numeric parsing and
/// unusable geometries are silently excluded, same as malformed records.
fn event_from_feature(feature: &Feature) -> Option<PersonEvent> {
    let props = feature.properties.as_ref()?;
    let text = |key: &str| props.get(key).and_then(|v| v.as_str());

    let birth_year = text(BIRTH_YEAR_KEY)?.trim().parse().ok()?;
    let death_year = text(DEATH_YEAR_KEY)?.trim().parse().ok()?;
    let category = match text(CATEGORY_KEY) {
        Some(CATEGORY_ARRIVED) => Category::Arrived,
        _ => Category::Departed,
    };

    let track = match feature.geometry.as_ref().map(|g| &g.value) {
        Some(Value::LineString(coords)) if coords.len() >= 2 && coords.iter().all(|c| c.len() >= 2) => {
            EventTrack::Line(coords.iter().map(|c| (c[0], c[1])).collect())
        }
        Some(Value::Point(c)) if c.len() >= 2 => EventTrack::Point((c[0], c[1])),
        _ => return None,
    };

    Some(PersonEvent {
        category,
        birth_year,
        death_year,
        track,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use geojson::{Geometry, JsonObject};
    use serde_json::json;

    fn feature(birth: &str, death: &str, category: &str) -> Feature {
        let mut props = JsonObject::new();
        props.insert(BIRTH_YEAR_KEY.to_string(), json!(birth));
        props.insert(DEATH_YEAR_KEY.to_string(), json!(death));
        props.insert(CATEGORY_KEY.to_string(), json!(category));
        Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::LineString(vec![
                vec![4.9, 52.4],
                vec![-74.0, 40.7],
            ]))),
            id: None,
            properties: Some(props),
            foreign_members: None,
        }
    }

    #[test]
    fn test_filter_keeps_only_valid_years() {
        let input = vec![
            feature("1820", "1885", CATEGORY_ARRIVED),
            feature("", "1885", CATEGORY_ARRIVED),
            feature("1820", "", CATEGORY_ARRIVED),
            feature("1820", "18851", CATEGORY_ARRIVED),
            feature("1820", "9999", "Uit Amsterdam vertrokken"),
        ];
        let kept = filter_features(input);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(admissible));
    }

    #[test]
    fn test_filter_output_is_subset_of_input() {
        let input = vec![
            feature("1820", "1885", CATEGORY_ARRIVED),
            feature("", "", CATEGORY_ARRIVED),
        ];
        let input_len = input.len();
        let kept = filter_features(input);
        assert!(kept.len() <= input_len);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let input = vec![
            feature("1820", "1885", CATEGORY_ARRIVED),
            feature("1801", "18", CATEGORY_ARRIVED),
            feature("", "1850", CATEGORY_ARRIVED),
        ];
        let once = filter_features(input);
        let once_len = once.len();
        let twice = filter_features(once);
        assert_eq!(twice.len(), once_len);
    }

    #[test]
    fn test_category_mapping() {
        let arrived = event_from_feature(&feature("1820", "1885", CATEGORY_ARRIVED)).unwrap();
        assert_eq!(arrived.category, Category::Arrived);

        let departed =
            event_from_feature(&feature("1820", "1885", "Uit Amsterdam vertrokken")).unwrap();
        assert_eq!(departed.category, Category::Departed);
    }

    #[test]
    fn test_years_parsed_numerically() {
        let event = event_from_feature(&feature("1820", "1885", CATEGORY_ARRIVED)).unwrap();
        assert_eq!(event.birth_year, 1820);
        assert_eq!(event.death_year, 1885);
    }

    #[test]
    fn test_unparsable_year_excluded() {
        assert!(event_from_feature(&feature("18xx", "1885", CATEGORY_ARRIVED)).is_none());
    }

    #[test]
    fn test_point_geometry_accepted() {
        let mut f = feature("1820", "1885", CATEGORY_ARRIVED);
        f.geometry = Some(Geometry::new(Value::Point(vec![4.9, 52.4])));
        let event = event_from_feature(&f).unwrap();
        assert!(matches!(event.track, EventTrack::Point(_)));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load_events(Path::new("does/not/exist.geojson")).is_err());
        assert!(load_world(Path::new("does/not/exist.json")).is_err());
    }
}
