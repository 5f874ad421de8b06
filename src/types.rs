use geo_types::{Coord, Point as GeoPoint};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

pub const MAX_LAT: f64 = 90.0;
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LNG: f64 = 180.0;
pub const MIN_LNG: f64 = -180.0;

lazy_static! {
  static ref LAT_LNG: Regex =
    Regex::from_str(r"^\s*(-?\d+(?:\.\d+)?)\s*[,;\s]\s*(-?\d+(?:\.\d+)?)\s*$").unwrap();
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Point {
  pub lat: f64,
  pub lng: f64,
}

impl Point {
  pub fn new(lat: f64, lng: f64) -> Self {
    Self { lat, lng }
  }

  pub fn is_valid(&self) -> bool {
    (MIN_LAT..=MAX_LAT).contains(&self.lat) && (MIN_LNG..=MAX_LNG).contains(&self.lng)
  }

  /// Destination order used by the mission backend and GeoJSON.
  pub fn lng_lat(&self) -> [f64; 2] {
    [self.lng, self.lat]
  }
}

impl From<Point> for Coord {
  fn from(val: Point) -> Self {
    Coord {
      x: val.lng,
      y: val.lat,
    }
  }
}

impl From<Point> for GeoPoint {
  fn from(val: Point) -> Self {
    Self(val.into())
  }
}

impl Display for Point {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{:.6},{:.6}", self.lat, self.lng)
  }
}

#[derive(Debug, PartialEq)]
pub struct PointParseError {
  pub src: String,
}

impl Display for PointParseError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "can't parse '{}' as a point, expected 'lat,lng'", self.src)
  }
}

impl std::error::Error for PointParseError {}

impl FromStr for Point {
  type Err = PointParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let err = || PointParseError { src: s.to_owned() };
    let caps = LAT_LNG.captures(s).ok_or_else(err)?;
    let lat = caps[1].parse::<f64>().map_err(|_| err())?;
    let lng = caps[2].parse::<f64>().map_err(|_| err())?;
    Ok(Self { lat, lng })
  }
}

#[cfg(test)]
pub mod tests {
  use super::*;

  #[test]
  fn test_parse_point() {
    let p: Point = "37.77,-122.42".parse().unwrap();
    assert_eq!(p, Point::new(37.77, -122.42));

    let p: Point = " 37.77 , -122.42 ".parse().unwrap();
    assert_eq!(p, Point::new(37.77, -122.42));

    let p: Point = "10 20".parse().unwrap();
    assert_eq!(p, Point::new(10.0, 20.0));

    assert!("37.77".parse::<Point>().is_err());
    assert!("north,west".parse::<Point>().is_err());
  }

  #[test]
  fn test_validity() {
    assert!(Point::new(90.0, 180.0).is_valid());
    assert!(Point::new(-90.0, -180.0).is_valid());
    assert!(!Point::new(90.1, 0.0).is_valid());
    assert!(!Point::new(0.0, -180.5).is_valid());
  }

  #[test]
  fn test_lng_lat_order() {
    let p = Point::new(37.77, -122.42);
    assert_eq!(p.lng_lat(), [-122.42, 37.77]);
    let gp: GeoPoint = p.into();
    assert_eq!(gp.x(), -122.42);
    assert_eq!(gp.y(), 37.77);
  }
}
