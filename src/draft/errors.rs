use crate::types::Point;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
  InsufficientSurveyPoints,
  NoDroneSelected,
  InvalidAltitude(String),
  AltitudeOutOfRange(i32, i32, i32),
  PointOutOfRange(Point),
}

impl Display for ValidationError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ValidationError::InsufficientSurveyPoints => write!(f, "insufficient survey points"),
      ValidationError::NoDroneSelected => write!(f, "no drone selected"),
      ValidationError::InvalidAltitude(_) => write!(f, "invalid altitude"),
      ValidationError::AltitudeOutOfRange(alt, min, max) => {
        write!(f, "altitude {alt}m is out of range [{min}, {max}]")
      }
      ValidationError::PointOutOfRange(p) => write!(f, "point {p} is out of lat/lng range"),
    }
  }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
  /// Operator-facing hint, shown next to the error itself.
  pub fn hint(&self) -> String {
    match self {
      ValidationError::InsufficientSurveyPoints => {
        "draw a survey area of at least 2 points".to_owned()
      }
      ValidationError::NoDroneSelected => "select an available drone".to_owned(),
      ValidationError::InvalidAltitude(raw) => {
        format!("'{raw}' is not a whole number of meters")
      }
      ValidationError::AltitudeOutOfRange(_, min, max) => {
        format!("pick an altitude between {min} and {max} meters")
      }
      ValidationError::PointOutOfRange(_) => {
        "latitude must be within [-90, 90] and longitude within [-180, 180]".to_owned()
      }
    }
  }
}
