//! City boundary shapes and the per-city aggregate join.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::aggregate::CategoryBucket;
use crate::errors::PipelineError;
use crate::types::CategoryKey;

/// GeoJSON feature collection of named city boundary shapes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoundaryCollection {
    /// GeoJSON object type, `"FeatureCollection"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Boundary features keyed by city name in their properties.
    pub features: Vec<BoundaryFeature>,
}

/// One named boundary shape.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoundaryFeature {
    /// GeoJSON object type, `"Feature"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Naming properties for the shape.
    pub properties: BoundaryProperties,
    /// Opaque geometry payload; the pipeline never interprets coordinates.
    pub geometry: Value,
}

/// Administrative naming attached to a boundary shape.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BoundaryProperties {
    /// City name; the join key against per-city aggregates.
    #[serde(rename = "varos", default)]
    pub city: String,
    /// County name.
    #[serde(rename = "megye", default)]
    pub county: String,
    /// Region name.
    #[serde(rename = "regio", default)]
    pub region: String,
    /// Sub-regional district name.
    #[serde(rename = "kisterseg", default)]
    pub district: String,
    /// Alternate join name used by some boundary file revisions.
    #[serde(rename = "varos_nev_join", default)]
    pub city_join_name: String,
}

/// A boundary shape with its joined per-city aggregate bucket.
#[derive(Clone, Debug)]
pub struct CityShape<'a> {
    /// The boundary feature the bucket was joined onto.
    pub feature: &'a BoundaryFeature,
    /// Joined aggregate values; zeroed when no city matched.
    pub bucket: CategoryBucket,
}

/// Deserialize a boundary collection from a reader.
pub fn boundaries_from_reader<R: Read>(reader: R) -> Result<BoundaryCollection, PipelineError> {
    let collection: BoundaryCollection = serde_json::from_reader(reader)
        .map_err(|err| PipelineError::Boundary(format!("failed parsing boundary JSON: {err}")))?;
    debug!(features = collection.features.len(), "loaded boundary shapes");
    Ok(collection)
}

/// Load a boundary collection from a local file.
pub fn boundaries_from_path(path: &Path) -> Result<BoundaryCollection, PipelineError> {
    let file = File::open(path).map_err(|err| PipelineError::Boundary(format!(
        "failed opening boundary file {}: {err}",
        path.display()
    )))?;
    boundaries_from_reader(file)
}

/// Fetch and deserialize a boundary collection over HTTP(S).
pub fn boundaries_from_url(url: &str) -> Result<BoundaryCollection, PipelineError> {
    let response = ureq::get(url)
        .call()
        .map_err(|err| PipelineError::Boundary(format!("failed fetching '{url}': {err}")))?;
    boundaries_from_reader(response.into_body().into_reader())
}

/// Join per-city aggregate buckets onto boundary shapes.
///
/// Exact, case-sensitive match on each feature's city property. Shapes
/// with no matching aggregate get a zeroed bucket; aggregate cities with
/// no shape are simply absent from the output.
pub fn join_city_aggregates<'a>(
    boundaries: &'a BoundaryCollection,
    by_city: &IndexMap<CategoryKey, CategoryBucket>,
) -> Vec<CityShape<'a>> {
    boundaries
        .features
        .iter()
        .map(|feature| CityShape {
            feature,
            bucket: by_city
                .get(&feature.properties.city)
                .copied()
                .unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn collection(cities: &[&str]) -> BoundaryCollection {
        BoundaryCollection {
            kind: "FeatureCollection".to_string(),
            features: cities
                .iter()
                .map(|city| BoundaryFeature {
                    kind: "Feature".to_string(),
                    properties: BoundaryProperties {
                        city: (*city).to_string(),
                        ..BoundaryProperties::default()
                    },
                    geometry: json!({ "type": "MultiPolygon", "coordinates": [] }),
                })
                .collect(),
        }
    }

    #[test]
    fn join_matches_exact_city_names() {
        let boundaries = collection(&["Budapest", "Szeged"]);
        let mut by_city = IndexMap::new();
        by_city.insert(
            "Budapest".to_string(),
            CategoryBucket {
                count: 3,
                total_amount: 900.0,
            },
        );

        let shapes = join_city_aggregates(&boundaries, &by_city);
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[0].bucket.count, 3);
        assert_eq!(shapes[0].bucket.total_amount, 900.0);
        // Unmatched shape gets a zeroed bucket, not an error.
        assert_eq!(shapes[1].bucket.count, 0);
        assert_eq!(shapes[1].bucket.total_amount, 0.0);
    }

    #[test]
    fn join_is_case_sensitive_and_drops_shapeless_cities() {
        let boundaries = collection(&["budapest"]);
        let mut by_city = IndexMap::new();
        by_city.insert(
            "Budapest".to_string(),
            CategoryBucket {
                count: 1,
                total_amount: 100.0,
            },
        );
        by_city.insert(
            "Pécs".to_string(),
            CategoryBucket {
                count: 2,
                total_amount: 200.0,
            },
        );

        let shapes = join_city_aggregates(&boundaries, &by_city);
        // Case mismatch means no join; Pécs has no shape and is absent.
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].bucket.count, 0);
    }

    #[test]
    fn boundary_json_parses_hungarian_property_names() {
        let raw = json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {
                    "regio": "Dél-Alföld",
                    "megye": "Csongrád-Csanád",
                    "kisterseg": "Szegedi",
                    "varos": "Szeged",
                    "varos_nev_join": "szeged"
                },
                "geometry": { "type": "MultiPolygon", "coordinates": [] }
            }]
        })
        .to_string();

        let collection = boundaries_from_reader(raw.as_bytes()).unwrap();
        assert_eq!(collection.features.len(), 1);
        let properties = &collection.features[0].properties;
        assert_eq!(properties.city, "Szeged");
        assert_eq!(properties.county, "Csongrád-Csanád");
        assert_eq!(properties.city_join_name, "szeged");
    }

    #[test]
    fn malformed_boundary_json_surfaces_boundary_error() {
        let err = boundaries_from_reader("{not json".as_bytes()).unwrap_err();
        assert!(matches!(err, PipelineError::Boundary(_)));
    }
}
