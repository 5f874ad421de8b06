use crate::{
  api::{ApiClient, ApiError},
  draft::{errors::ValidationError, payload::MissionSubmission, Bounds, MissionDraft},
};
use log::{info, warn};
use std::{
  fmt::Display,
  sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

/// Destination of validated mission payloads.
#[allow(async_fn_in_trait)]
pub trait MissionSink {
  async fn create_mission(&self, mission: &MissionSubmission) -> Result<(), ApiError>;
}

impl MissionSink for ApiClient {
  async fn create_mission(&self, mission: &MissionSubmission) -> Result<(), ApiError> {
    ApiClient::create_mission(self, mission).await
  }
}

#[derive(Debug)]
pub enum SubmissionError {
  Validation(ValidationError),
  InFlight,
  Remote(ApiError),
}

impl Display for SubmissionError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      SubmissionError::Validation(err) => write!(f, "{err}"),
      SubmissionError::InFlight => write!(f, "a mission submission is already in progress"),
      SubmissionError::Remote(err) => write!(f, "failed to create mission: {err}"),
    }
  }
}

impl std::error::Error for SubmissionError {}

impl From<ValidationError> for SubmissionError {
  fn from(value: ValidationError) -> Self {
    SubmissionError::Validation(value)
  }
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
  fn drop(&mut self) {
    self.0.store(false, Ordering::Release);
  }
}

/// Sends drafts to a sink, one request at a time and never retrying.
#[derive(Debug)]
pub struct Submitter<S: MissionSink> {
  sink: S,
  bounds: Bounds,
  in_flight: AtomicBool,
  sent: AtomicUsize,
}

impl<S: MissionSink> Submitter<S> {
  pub fn new(sink: S, bounds: Bounds) -> Self {
    Self {
      sink,
      bounds,
      in_flight: AtomicBool::new(false),
      sent: AtomicUsize::new(0),
    }
  }

  pub fn is_in_flight(&self) -> bool {
    self.in_flight.load(Ordering::Acquire)
  }

  pub fn requests_sent(&self) -> usize {
    self.sent.load(Ordering::Relaxed)
  }

  /// Validates and sends the draft. Validation happens before anything goes
  /// out, a failed draft never reaches the sink.
  pub async fn submit(&self, draft: &MissionDraft) -> Result<MissionSubmission, SubmissionError> {
    let mission = draft.build_submission_within(&self.bounds)?;

    if self
      .in_flight
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .is_err()
    {
      warn!("submission for drone {} rejected, another one is in flight", mission.drone);
      return Err(SubmissionError::InFlight);
    }
    let _guard = InFlightGuard(&self.in_flight);

    self.sent.fetch_add(1, Ordering::Relaxed);
    self
      .sink
      .create_mission(&mission)
      .await
      .map_err(SubmissionError::Remote)?;
    info!("mission for drone {} has been created", mission.drone);
    Ok(mission)
  }

  /// Resets the draft on success, keeps it for correction on any failure.
  pub async fn submit_draft(
    &self,
    draft: &mut MissionDraft,
  ) -> Result<MissionSubmission, SubmissionError> {
    let mission = self.submit(draft).await?;
    draft.reset();
    Ok(mission)
  }
}
