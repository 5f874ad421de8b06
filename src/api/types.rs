use crate::{draft::payload::SurveyArea, types::Point};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt::Display, str::FromStr};

const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Backend timestamps come either as RFC3339 or as naive UTC, sometimes null.
pub fn deserialize_opt_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
  D: Deserializer<'de>,
{
  let s = Option::<String>::deserialize(deserializer)?;
  let s = match s {
    Some(s) if !s.is_empty() => s,
    _ => return Ok(None),
  };
  if let Ok(dt) = DateTime::parse_from_rfc3339(&s) {
    return Ok(Some(dt.with_timezone(&Utc)));
  }
  let dt = NaiveDateTime::parse_from_str(&s, NAIVE_FORMAT).map_err(serde::de::Error::custom)?;
  Ok(Some(DateTime::from_naive_utc_and_offset(dt, Utc)))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
  Text(String),
  Number(i64),
}

pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  let id = match RawId::deserialize(deserializer)? {
    RawId::Text(s) => s,
    RawId::Number(n) => n.to_string(),
  };
  Ok(id)
}

/// Every backend response wraps its payload into `{"data": ...}`
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
  pub data: T,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DroneStatus {
  Available,
  InMission,
  Maintenance,
}

impl DroneStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      DroneStatus::Available => "available",
      DroneStatus::InMission => "in_mission",
      DroneStatus::Maintenance => "maintenance",
    }
  }
}

impl Display for DroneStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

#[derive(Debug, PartialEq)]
pub struct StatusParseError {
  pub src: String,
  pub expected: &'static [&'static str],
}

impl Display for StatusParseError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "invalid status '{}', valid ones are [{}]",
      self.src,
      self.expected.join(", ")
    )
  }
}

impl std::error::Error for StatusParseError {}

impl FromStr for DroneStatus {
  type Err = StatusParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().replace(' ', "_").as_str() {
      "available" => Ok(DroneStatus::Available),
      "in_mission" => Ok(DroneStatus::InMission),
      "maintenance" => Ok(DroneStatus::Maintenance),
      _ => Err(StatusParseError {
        src: s.to_owned(),
        expected: &["available", "in_mission", "maintenance"],
      }),
    }
  }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
  Planned,
  InProgress,
  Completed,
  Aborted,
  Paused,
}

impl MissionStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      MissionStatus::Planned => "planned",
      MissionStatus::InProgress => "in_progress",
      MissionStatus::Completed => "completed",
      MissionStatus::Aborted => "aborted",
      MissionStatus::Paused => "paused",
    }
  }
}

impl Display for MissionStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str().replace('_', " "))
  }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Drone {
  #[serde(deserialize_with = "deserialize_id")]
  pub id: String,
  pub status: DroneStatus,
  #[serde(default)]
  pub battery_level: f64,
  pub location: Option<Point>,
  #[serde(default, deserialize_with = "deserialize_opt_datetime")]
  pub updated_at: Option<DateTime<Utc>>,
}

impl Drone {
  pub fn is_available(&self) -> bool {
    self.status == DroneStatus::Available
  }
}

/// Drones an operator may assign to a new mission.
pub fn available_drones(drones: &[Drone]) -> Vec<&Drone> {
  drones.iter().filter(|d| d.is_available()).collect()
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Mission {
  #[serde(deserialize_with = "deserialize_id")]
  pub id: String,
  #[serde(deserialize_with = "deserialize_id")]
  pub drone: String,
  pub status: MissionStatus,
  #[serde(default)]
  pub progress: f64,
  #[serde(default)]
  pub distance_covered: f64,
  #[serde(default)]
  pub altitude: f64,
  #[serde(default, deserialize_with = "deserialize_opt_datetime")]
  pub start_time: Option<DateTime<Utc>>,
  #[serde(default, deserialize_with = "deserialize_opt_datetime")]
  pub end_time: Option<DateTime<Utc>>,
  #[serde(default)]
  pub estimated_time_remaining: Option<f64>,
  /// `[lng, lat]` pairs
  #[serde(default)]
  pub flight_path: Vec<[f64; 2]>,
  #[serde(default)]
  pub survey_area: Option<SurveyArea>,
}

impl Mission {
  pub fn flight_path_points(&self) -> Vec<Point> {
    self
      .flight_path
      .iter()
      .map(|c| Point { lat: c[1], lng: c[0] })
      .collect()
  }
}

#[derive(Debug, Serialize)]
pub struct DroneStatusUpdate {
  pub status: DroneStatus,
}

#[cfg(test)]
pub mod tests {
  use super::*;

  const DRONES: &str = r#"{"data": [
    {"id": "DRN-001", "status": "in_mission", "battery_level": 85,
     "location": {"lat": 40.7128, "lng": -74.0060}, "updated_at": "2024-05-01T10:00:00Z"},
    {"id": "DRN-002", "status": "available", "battery_level": 92,
     "location": {"lat": 40.7589, "lng": -73.9851}, "updated_at": "2024-05-01T10:00:00.123456"},
    {"id": 3, "status": "maintenance", "battery_level": 45.5,
     "location": null, "updated_at": null}
  ]}"#;

  const MISSION: &str = r#"{"data": {
    "id": 17, "drone": "DRN-001", "status": "in_progress", "progress": 40,
    "distance_covered": 1.25, "altitude": 120, "start_time": "2024-05-01T10:00:00Z",
    "end_time": null, "estimated_time_remaining": 12,
    "flight_path": [[-122.42, 37.77], [-122.41, 37.78]],
    "survey_area": {"type": "Polygon", "coordinates": [[[-122.42, 37.77], [-122.41, 37.78], [-122.40, 37.76]]]}
  }}"#;

  #[test]
  fn test_drones_envelope() {
    let env: Envelope<Vec<Drone>> = serde_json::from_str(DRONES).unwrap();
    let drones = env.data;
    assert_eq!(drones.len(), 3);
    assert_eq!(drones[0].status, DroneStatus::InMission);
    assert!(drones[0].updated_at.is_some());
    assert!(drones[1].updated_at.is_some());
    assert_eq!(drones[2].id, "3");
    assert!(drones[2].location.is_none());
    assert!(drones[2].updated_at.is_none());

    let available = available_drones(&drones);
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].id, "DRN-002");
  }

  #[test]
  fn test_mission_envelope() {
    let env: Envelope<Mission> = serde_json::from_str(MISSION).unwrap();
    let mission = env.data;
    assert_eq!(mission.id, "17");
    assert_eq!(mission.status, MissionStatus::InProgress);
    assert!(mission.end_time.is_none());
    let path = mission.flight_path_points();
    assert_eq!(path[0], Point::new(37.77, -122.42));
    let area = mission.survey_area.unwrap();
    assert_eq!(area.coordinates.len(), 3);
  }

  #[test]
  fn test_missing_mission() {
    let env: Envelope<Option<Mission>> = serde_json::from_str(r#"{"data": null}"#).unwrap();
    assert!(env.data.is_none());
  }

  #[test]
  fn test_drone_status_parse() {
    assert_eq!(
      "In Mission".parse::<DroneStatus>().unwrap(),
      DroneStatus::InMission
    );
    assert_eq!(
      "available".parse::<DroneStatus>().unwrap(),
      DroneStatus::Available
    );
    assert!("flying".parse::<DroneStatus>().is_err());
  }

  #[test]
  fn test_status_display() {
    assert_eq!(MissionStatus::InProgress.to_string(), "in progress");
    assert_eq!(DroneStatus::InMission.to_string(), "in_mission");
  }
}
