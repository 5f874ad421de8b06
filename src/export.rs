use crate::{api::types::Mission, types::Point};
use geo::{ChamberlainDuquetteArea, HaversineLength, LineString, Polygon};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use log::warn;
use serde::Serialize;

// a linear ring needs 4 positions, i.e. 3 distinct vertices plus the closing one
const MIN_RING_VERTICES: usize = 3;

fn position(p: &Point) -> Vec<f64> {
  vec![p.lng, p.lat]
}

/// Outer ring with the first point repeated at the end.
fn closed_ring(points: &[Point]) -> Vec<Point> {
  let mut ring = points.to_vec();
  if let (Some(first), Some(last)) = (points.first(), points.last()) {
    if points.len() > 1 && first != last {
      ring.push(*first);
    }
  }
  ring
}

fn distinct_vertices(points: &[Point]) -> usize {
  let mut seen: Vec<&Point> = vec![];
  for p in points {
    if !seen.contains(&p) {
      seen.push(p);
    }
  }
  seen.len()
}

/// Polygon when the area has enough vertices to form a valid ring, otherwise
/// the degenerate shape as a LineString (or a Point for a single vertex).
fn survey_geometry(points: &[Point]) -> Option<Value> {
  if points.is_empty() {
    return None;
  }
  let vertices = distinct_vertices(points);
  if vertices >= MIN_RING_VERTICES {
    let ring = closed_ring(points).iter().map(position).collect();
    return Some(Value::Polygon(vec![ring]));
  }
  warn!("survey area has {vertices} distinct vertices, exporting it as a line");
  if vertices == 1 {
    Some(Value::Point(position(&points[0])))
  } else {
    Some(Value::LineString(points.iter().map(position).collect()))
  }
}

pub fn path_length_km(points: &[Point]) -> f64 {
  let line: LineString = points.iter().map(|p| geo::Coord::from(*p)).collect();
  line.haversine_length() / 1000.0
}

pub fn area_km2(points: &[Point]) -> f64 {
  if points.len() < 3 {
    return 0.0;
  }
  let ring: LineString = points.iter().map(|p| geo::Coord::from(*p)).collect();
  Polygon::new(ring, vec![]).chamberlain_duquette_unsigned_area() / 1_000_000.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeometrySummary {
  pub waypoints: usize,
  pub path_km: f64,
  pub survey_points: usize,
  pub survey_km2: f64,
}

impl GeometrySummary {
  pub fn new(survey_area: &[Point], flight_path: &[Point]) -> Self {
    Self {
      waypoints: flight_path.len(),
      path_km: path_length_km(flight_path),
      survey_points: survey_area.len(),
      survey_km2: area_km2(survey_area),
    }
  }

  pub fn of_mission(mission: &Mission) -> Self {
    let survey = mission
      .survey_area
      .as_ref()
      .map(|a| a.points())
      .unwrap_or_default();
    Self::new(&survey, &mission.flight_path_points())
  }
}

fn feature(geometry: Value, kind: &str, mission: &Mission) -> Feature {
  let mut props = JsonObject::new();
  props.insert("kind".to_owned(), JsonValue::from(kind));
  props.insert("mission".to_owned(), JsonValue::from(mission.id.clone()));
  props.insert("drone".to_owned(), JsonValue::from(mission.drone.clone()));
  props.insert("status".to_owned(), JsonValue::from(mission.status.as_str()));
  props.insert("altitude".to_owned(), JsonValue::from(mission.altitude));
  Feature {
    bbox: None,
    geometry: Some(Geometry::new(geometry)),
    id: None,
    properties: Some(props),
    foreign_members: None,
  }
}

/// Survey area as a standard Polygon and flight path as a LineString, for
/// viewing a mission in any GIS tool. Survey areas too small for a ring are
/// exported as a LineString or a Point.
pub fn mission_to_geojson(mission: &Mission) -> FeatureCollection {
  let mut features = vec![];

  if let Some(area) = &mission.survey_area {
    if let Some(geometry) = survey_geometry(&area.points()) {
      features.push(feature(geometry, "survey_area", mission));
    }
  }

  let path: Vec<Vec<f64>> = mission.flight_path_points().iter().map(position).collect();
  if !path.is_empty() {
    features.push(feature(Value::LineString(path), "flight_path", mission));
  }

  FeatureCollection {
    bbox: None,
    features,
    foreign_members: None,
  }
}
