use crate::{api::types::MissionStatus, types::Point};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCoordinates {
  Flat(Vec<[f64; 2]>),
  Rings(Vec<Vec<[f64; 2]>>),
}

/// Missions created by this console carry a flat ring, standard GeoJSON
/// polygons nest it once more. Both are read back as the outer ring.
fn deserialize_ring<'de, D>(deserializer: D) -> Result<Vec<[f64; 2]>, D::Error>
where
  D: Deserializer<'de>,
{
  let ring = match RawCoordinates::deserialize(deserializer)? {
    RawCoordinates::Flat(ring) => ring,
    RawCoordinates::Rings(rings) => rings.into_iter().next().unwrap_or_default(),
  };
  Ok(ring)
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum PolygonTag {
  Polygon,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SurveyArea {
  #[serde(rename = "type")]
  pub tag: PolygonTag,
  /// `[lng, lat]` pairs in drawing order
  #[serde(deserialize_with = "deserialize_ring")]
  pub coordinates: Vec<[f64; 2]>,
}

impl SurveyArea {
  pub fn from_points(points: &[Point]) -> Self {
    Self {
      tag: PolygonTag::Polygon,
      coordinates: points.iter().map(Point::lng_lat).collect(),
    }
  }

  pub fn points(&self) -> Vec<Point> {
    self
      .coordinates
      .iter()
      .map(|c| Point { lat: c[1], lng: c[0] })
      .collect()
  }
}

/// Body of `POST /missions`
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct MissionSubmission {
  pub drone: String,
  pub altitude: i32,
  pub survey_area: SurveyArea,
  pub flight_path: Vec<[f64; 2]>,
  pub status: MissionStatus,
}

#[cfg(test)]
pub mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_serialize_submission() {
    let sub = MissionSubmission {
      drone: "DRN-002".to_owned(),
      altitude: 120,
      survey_area: SurveyArea::from_points(&[Point::new(37.77, -122.42), Point::new(37.78, -122.41)]),
      flight_path: vec![],
      status: MissionStatus::Planned,
    };
    let value = serde_json::to_value(&sub).unwrap();
    assert_eq!(
      value,
      json!({
        "drone": "DRN-002",
        "altitude": 120,
        "survey_area": {"type": "Polygon", "coordinates": [[-122.42, 37.77], [-122.41, 37.78]]},
        "flight_path": [],
        "status": "planned",
      })
    );
  }

  #[test]
  fn test_read_nested_ring() {
    let area: SurveyArea = serde_json::from_value(json!({
      "type": "Polygon",
      "coordinates": [[[-122.42, 37.77], [-122.41, 37.78]]]
    }))
    .unwrap();
    assert_eq!(area.points()[1], Point::new(37.78, -122.41));

    let area: SurveyArea = serde_json::from_value(json!({
      "type": "Polygon",
      "coordinates": [[-122.42, 37.77]]
    }))
    .unwrap();
    assert_eq!(area.points(), vec![Point::new(37.77, -122.42)]);
  }
}
