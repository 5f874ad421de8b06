use crate::{
  draft::{GeometryKind, MissionDraft},
  types::Point,
};
use log::debug;
use std::{
  cell::{Ref, RefCell, RefMut},
  fmt::Display,
  rc::Rc,
  str::FromStr,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeType {
  Polygon,
  Polyline,
}

impl From<ShapeType> for GeometryKind {
  fn from(value: ShapeType) -> Self {
    match value {
      ShapeType::Polygon => GeometryKind::SurveyArea,
      ShapeType::Polyline => GeometryKind::FlightPath,
    }
  }
}

#[derive(Debug, PartialEq)]
pub struct ShapeParseError(pub String);

impl Display for ShapeParseError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "unknown shape '{}', valid ones are [polygon, polyline]",
      self.0
    )
  }
}

impl std::error::Error for ShapeParseError {}

impl FromStr for ShapeType {
  type Err = ShapeParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "polygon" => Ok(ShapeType::Polygon),
      "polyline" => Ok(ShapeType::Polyline),
      _ => Err(ShapeParseError(s.to_owned())),
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
  pub shape: ShapeType,
  pub points: Vec<Point>,
}

pub type CompletionFunc = dyn FnMut(Vec<Point>, GeometryKind);

/// Drawing surface state. Each instance keeps at most one overlay per shape
/// and reports every finished gesture through its own completion callback.
pub struct DrawingSurface {
  polygon: Option<Overlay>,
  polyline: Option<Overlay>,
  on_complete: Box<CompletionFunc>,
}

impl DrawingSurface {
  pub fn new(on_complete: Box<CompletionFunc>) -> Self {
    Self {
      polygon: None,
      polyline: None,
      on_complete,
    }
  }

  pub fn overlay(&self, shape: ShapeType) -> Option<&Overlay> {
    match shape {
      ShapeType::Polygon => self.polygon.as_ref(),
      ShapeType::Polyline => self.polyline.as_ref(),
    }
  }

  /// A drawing gesture is over: drop the previous overlay of the same shape
  /// and hand the new points over.
  pub fn complete(&mut self, shape: ShapeType, points: Vec<Point>) {
    let slot = match shape {
      ShapeType::Polygon => &mut self.polygon,
      ShapeType::Polyline => &mut self.polyline,
    };
    if let Some(prev) = slot.replace(Overlay {
      shape,
      points: points.clone(),
    }) {
      debug!("{shape:?} overlay of {} points discarded", prev.points.len());
    }
    (self.on_complete)(points, shape.into());
  }
}

/// Couples a drawing surface to a draft: every completed gesture lands in
/// the draft via `record_geometry`.
pub struct DraftSession {
  draft: Rc<RefCell<MissionDraft>>,
  surface: DrawingSurface,
}

impl DraftSession {
  pub fn new(draft: MissionDraft) -> Self {
    let draft = Rc::new(RefCell::new(draft));
    let sink = draft.clone();
    let surface = DrawingSurface::new(Box::new(move |points: Vec<Point>, kind: GeometryKind| {
      sink.borrow_mut().record_geometry(points, kind)
    }));
    Self { draft, surface }
  }

  pub fn surface(&mut self) -> &mut DrawingSurface {
    &mut self.surface
  }

  pub fn draft(&self) -> Ref<'_, MissionDraft> {
    self.draft.borrow()
  }

  pub fn draft_mut(&self) -> RefMut<'_, MissionDraft> {
    self.draft.borrow_mut()
  }

  pub fn into_draft(self) -> MissionDraft {
    let Self { draft, surface } = self;
    // the surface callback holds the only other handle
    drop(surface);
    match Rc::try_unwrap(draft) {
      Ok(cell) => cell.into_inner(),
      Err(shared) => shared.borrow().clone(),
    }
  }
}

#[cfg(test)]
pub mod tests {
  use super::*;

  fn pts(n: usize) -> Vec<Point> {
    (0..n).map(|i| Point::new(i as f64, -(i as f64))).collect()
  }

  #[test]
  fn test_shape_parse() {
    assert_eq!("polygon".parse::<ShapeType>().unwrap(), ShapeType::Polygon);
    assert_eq!("polyline".parse::<ShapeType>().unwrap(), ShapeType::Polyline);
    assert!("circle".parse::<ShapeType>().is_err());
    assert_eq!(GeometryKind::from(ShapeType::Polygon), GeometryKind::SurveyArea);
    assert_eq!(GeometryKind::from(ShapeType::Polyline), GeometryKind::FlightPath);
  }

  #[test]
  fn test_callback_once_per_gesture() {
    let calls = Rc::new(RefCell::new(vec![]));
    let c = calls.clone();
    let mut surface = DrawingSurface::new(Box::new(move |points: Vec<Point>, kind: GeometryKind| {
      c.borrow_mut().push((points.len(), kind))
    }));
    surface.complete(ShapeType::Polygon, pts(3));
    surface.complete(ShapeType::Polyline, pts(2));
    surface.complete(ShapeType::Polygon, pts(5));

    assert_eq!(
      *calls.borrow(),
      vec![
        (3, GeometryKind::SurveyArea),
        (2, GeometryKind::FlightPath),
        (5, GeometryKind::SurveyArea)
      ]
    );
    assert_eq!(surface.overlay(ShapeType::Polygon).unwrap().points, pts(5));
    assert_eq!(surface.overlay(ShapeType::Polyline).unwrap().points, pts(2));
  }

  #[test]
  fn test_surfaces_are_independent() {
    let mut a = DraftSession::new(MissionDraft::new());
    let mut b = DraftSession::new(MissionDraft::new());
    a.surface().complete(ShapeType::Polygon, pts(4));
    b.surface().complete(ShapeType::Polyline, pts(2));

    assert!(b.surface().overlay(ShapeType::Polygon).is_none());
    assert!(a.surface().overlay(ShapeType::Polyline).is_none());
    assert_eq!(a.draft().geometry(GeometryKind::SurveyArea).len(), 4);
    assert!(b.draft().geometry(GeometryKind::SurveyArea).is_empty());
  }

  #[test]
  fn test_session_to_submission() {
    let mut session = DraftSession::new(MissionDraft::new());
    session.draft_mut().set_drone("DRN-004");
    session.surface().complete(ShapeType::Polygon, pts(1));
    assert!(session.draft().build_submission().is_err());

    session.surface().complete(ShapeType::Polygon, pts(3));
    session.surface().complete(ShapeType::Polyline, pts(2));
    let draft = session.into_draft();
    let sub = draft.build_submission().unwrap();
    assert_eq!(sub.survey_area.coordinates.len(), 3);
    assert_eq!(sub.flight_path, vec![[0.0, 0.0], [-1.0, 1.0]]);
  }
}
