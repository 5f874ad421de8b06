use crate::api::{
  types::{Mission, MissionStatus},
  ApiClient, ApiError,
};
use log::{info, warn};
use std::{fmt::Display, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissionAction {
  Pause,
  Resume,
  Abort,
}

impl MissionAction {
  pub fn as_str(&self) -> &'static str {
    match self {
      MissionAction::Pause => "pause",
      MissionAction::Resume => "resume",
      MissionAction::Abort => "abort",
    }
  }

  pub fn past_tense(&self) -> &'static str {
    match self {
      MissionAction::Pause => "paused",
      MissionAction::Resume => "resumed",
      MissionAction::Abort => "aborted",
    }
  }
}

impl Display for MissionAction {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for MissionAction {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "pause" => Ok(MissionAction::Pause),
      "resume" => Ok(MissionAction::Resume),
      "abort" => Ok(MissionAction::Abort),
      _ => Err(format!(
        "unknown action '{s}', valid ones are [pause, resume, abort]"
      )),
    }
  }
}

impl MissionStatus {
  pub fn allowed_actions(&self) -> &'static [MissionAction] {
    match self {
      MissionStatus::InProgress => &[MissionAction::Pause, MissionAction::Abort],
      MissionStatus::Paused => &[MissionAction::Resume, MissionAction::Abort],
      MissionStatus::Planned | MissionStatus::Completed | MissionStatus::Aborted => &[],
    }
  }

  pub fn allows(&self, action: MissionAction) -> bool {
    self.allowed_actions().contains(&action)
  }
}

#[derive(Debug)]
pub enum ControlError {
  NotAllowed(String, MissionStatus, MissionAction),
  Api(ApiError),
}

impl Display for ControlError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ControlError::NotAllowed(id, status, action) => {
        write!(f, "can't {action} mission {id} while it is {status}")
      }
      ControlError::Api(err) => write!(f, "failed to control mission: {err}"),
    }
  }
}

impl std::error::Error for ControlError {}

impl From<ApiError> for ControlError {
  fn from(value: ApiError) -> Self {
    ControlError::Api(value)
  }
}

pub fn check_action(mission: &Mission, action: MissionAction) -> Result<(), ControlError> {
  if mission.status.allows(action) {
    Ok(())
  } else {
    Err(ControlError::NotAllowed(
      mission.id.clone(),
      mission.status,
      action,
    ))
  }
}

/// Fetches the mission, checks the action against its current status, sends
/// it and returns the refreshed mission. `force` skips the local check and
/// leaves the decision to the backend.
pub async fn apply_action(
  client: &ApiClient,
  id: &str,
  action: MissionAction,
  force: bool,
) -> Result<Mission, ControlError> {
  let mission = client.get_mission(id).await?;
  match check_action(&mission, action) {
    Ok(()) => {}
    Err(err) if force => warn!("{err}, sending anyway"),
    Err(err) => return Err(err),
  }
  client.mission_action(id, action).await?;
  info!("mission {id} has been {}", action.past_tense());
  let mission = client.get_mission(id).await?;
  Ok(mission)
}

#[cfg(test)]
pub mod tests {
  use super::*;

  fn mission(status: MissionStatus) -> Mission {
    Mission {
      id: "M-1".to_owned(),
      drone: "DRN-001".to_owned(),
      status,
      progress: 0.0,
      distance_covered: 0.0,
      altitude: 120.0,
      start_time: None,
      end_time: None,
      estimated_time_remaining: None,
      flight_path: vec![],
      survey_area: None,
    }
  }

  #[test]
  fn test_allowed_actions() {
    use MissionAction::*;
    assert_eq!(MissionStatus::InProgress.allowed_actions(), &[Pause, Abort]);
    assert_eq!(MissionStatus::Paused.allowed_actions(), &[Resume, Abort]);
    assert!(MissionStatus::Planned.allowed_actions().is_empty());
    assert!(MissionStatus::Completed.allowed_actions().is_empty());
    assert!(MissionStatus::Aborted.allowed_actions().is_empty());
  }

  #[test]
  fn test_check_action() {
    assert!(check_action(&mission(MissionStatus::InProgress), MissionAction::Pause).is_ok());
    assert!(check_action(&mission(MissionStatus::Paused), MissionAction::Resume).is_ok());

    let err = check_action(&mission(MissionStatus::Completed), MissionAction::Abort).unwrap_err();
    assert_eq!(err.to_string(), "can't abort mission M-1 while it is completed");

    let err = check_action(&mission(MissionStatus::InProgress), MissionAction::Resume).unwrap_err();
    assert_eq!(
      err.to_string(),
      "can't resume mission M-1 while it is in progress"
    );
  }

  #[test]
  fn test_action_parse() {
    assert_eq!("pause".parse::<MissionAction>().unwrap(), MissionAction::Pause);
    assert!("land".parse::<MissionAction>().is_err());
    assert_eq!(MissionAction::Resume.past_tense(), "resumed");
  }
}
