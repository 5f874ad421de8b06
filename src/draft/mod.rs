//! Mission draft: transient operator input for a mission being composed,
//! turned into a `MissionSubmission` once it validates.
pub mod errors;
pub mod payload;

use self::{
  errors::ValidationError,
  payload::{MissionSubmission, SurveyArea},
};
use crate::{api::types::MissionStatus, config, types::Point};
use log::{debug, warn};

pub const DEFAULT_ALTITUDE: &str = "120";
const MIN_SURVEY_POINTS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
  SurveyArea,
  FlightPath,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DraftGeometry {
  pub kind: GeometryKind,
  pub points: Vec<Point>,
}

impl DraftGeometry {
  pub fn empty(kind: GeometryKind) -> Self {
    Self {
      kind,
      points: vec![],
    }
  }

  pub fn len(&self) -> usize {
    self.points.len()
  }

  pub fn is_empty(&self) -> bool {
    self.points.is_empty()
  }

  fn lng_lat(&self) -> Vec<[f64; 2]> {
    self.points.iter().map(Point::lng_lat).collect()
  }
}

/// Altitude and coordinate limits. Advisory unless `enforce` is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
  pub min_altitude: i32,
  pub max_altitude: i32,
  pub enforce: bool,
}

impl Default for Bounds {
  fn default() -> Self {
    Self {
      min_altitude: 30,
      max_altitude: 400,
      enforce: false,
    }
  }
}

impl From<&config::Mission> for Bounds {
  fn from(cfg: &config::Mission) -> Self {
    Self {
      min_altitude: cfg.min_altitude,
      max_altitude: cfg.max_altitude,
      enforce: cfg.enforce_bounds,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MissionDraft {
  selected_drone_id: String,
  altitude: String,
  survey_area: DraftGeometry,
  flight_path: DraftGeometry,
}

impl Default for MissionDraft {
  fn default() -> Self {
    Self::new()
  }
}

impl MissionDraft {
  pub fn new() -> Self {
    Self::with_altitude(DEFAULT_ALTITUDE)
  }

  pub fn with_altitude(altitude: &str) -> Self {
    Self {
      selected_drone_id: String::new(),
      altitude: altitude.to_owned(),
      survey_area: DraftGeometry::empty(GeometryKind::SurveyArea),
      flight_path: DraftGeometry::empty(GeometryKind::FlightPath),
    }
  }

  pub fn selected_drone_id(&self) -> &str {
    &self.selected_drone_id
  }

  pub fn altitude(&self) -> &str {
    &self.altitude
  }

  pub fn geometry(&self, kind: GeometryKind) -> &DraftGeometry {
    match kind {
      GeometryKind::SurveyArea => &self.survey_area,
      GeometryKind::FlightPath => &self.flight_path,
    }
  }

  pub fn set_drone(&mut self, id: &str) {
    self.selected_drone_id = id.to_owned();
  }

  pub fn set_altitude(&mut self, value: &str) {
    self.altitude = value.to_owned();
  }

  /// Replaces the geometry of the given kind, the other one stays as is.
  pub fn record_geometry(&mut self, points: Vec<Point>, kind: GeometryKind) {
    debug!("recording {kind:?} of {} points", points.len());
    let geom = DraftGeometry { kind, points };
    match kind {
      GeometryKind::SurveyArea => self.survey_area = geom,
      GeometryKind::FlightPath => self.flight_path = geom,
    }
  }

  pub fn reset(&mut self) {
    *self = Self::with_altitude(&self.altitude);
  }

  pub fn build_submission(&self) -> Result<MissionSubmission, ValidationError> {
    self.build_submission_within(&Bounds::default())
  }

  /// Altitude must be whole meters: `"12.5"` is rejected, not truncated.
  pub fn build_submission_within(
    &self,
    bounds: &Bounds,
  ) -> Result<MissionSubmission, ValidationError> {
    if self.survey_area.len() < MIN_SURVEY_POINTS {
      return Err(ValidationError::InsufficientSurveyPoints);
    }
    if self.selected_drone_id.is_empty() {
      return Err(ValidationError::NoDroneSelected);
    }
    let altitude = self
      .altitude
      .trim()
      .parse::<i32>()
      .map_err(|_| ValidationError::InvalidAltitude(self.altitude.clone()))?;

    self.check_bounds(altitude, bounds)?;

    Ok(MissionSubmission {
      drone: self.selected_drone_id.clone(),
      altitude,
      survey_area: SurveyArea::from_points(&self.survey_area.points),
      flight_path: self.flight_path.lng_lat(),
      status: MissionStatus::Planned,
    })
  }

  fn check_bounds(&self, altitude: i32, bounds: &Bounds) -> Result<(), ValidationError> {
    let mut violations = vec![];
    if altitude < bounds.min_altitude || altitude > bounds.max_altitude {
      violations.push(ValidationError::AltitudeOutOfRange(
        altitude,
        bounds.min_altitude,
        bounds.max_altitude,
      ));
    }
    let stray = self
      .survey_area
      .points
      .iter()
      .chain(self.flight_path.points.iter())
      .find(|p| !p.is_valid());
    if let Some(p) = stray {
      violations.push(ValidationError::PointOutOfRange(*p));
    }

    if bounds.enforce {
      match violations.into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
      }
    } else {
      for v in violations {
        warn!("{v}, submitting anyway");
      }
      Ok(())
    }
  }
}
