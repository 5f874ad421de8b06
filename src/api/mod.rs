//! Fleet backend HTTP client.
//! The backend owns drones and missions, this client only reads them and
//! issues the few commands an operator has at hand.
pub mod types;

use self::types::{Drone, DroneStatus, DroneStatusUpdate, Envelope, Mission};
use crate::{
  config, control::MissionAction, draft::payload::MissionSubmission, util::seconds_since,
};
use chrono::Utc;
use log::{debug, error, info};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Display;

#[derive(Debug)]
pub enum ApiError {
  Request(reqwest::Error),
  Status(StatusCode, String),
  NotFound(String),
}

impl Display for ApiError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ApiError::Request(err) => write!(f, "request failed: {err}"),
      ApiError::Status(code, body) if body.is_empty() => write!(f, "backend responded {code}"),
      ApiError::Status(code, body) => write!(f, "backend responded {code}: {body}"),
      ApiError::NotFound(what) => write!(f, "{what} not found"),
    }
  }
}

impl std::error::Error for ApiError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ApiError::Request(err) => Some(err),
      _ => None,
    }
  }
}

impl From<reqwest::Error> for ApiError {
  fn from(value: reqwest::Error) -> Self {
    ApiError::Request(value)
  }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
  base_url: String,
  client: Client,
}

impl ApiClient {
  pub fn new(cfg: &config::Api) -> Result<Self, ApiError> {
    let client = Client::builder().timeout(cfg.timeout).build()?;
    Ok(Self {
      base_url: cfg.url.trim_end_matches('/').to_owned(),
      client,
    })
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  pub fn url(&self, path: &str) -> String {
    format!("{}/{}", self.base_url, path.trim_start_matches('/'))
  }

  async fn check(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
      Ok(resp)
    } else {
      let body = resp.text().await.unwrap_or_default();
      Err(ApiError::Status(status, body))
    }
  }

  async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
    let url = self.url(path);
    debug!("GET {url}");
    let t = Utc::now();
    let resp = self.client.get(&url).send().await?;
    let resp = Self::check(resp).await?;
    let env = resp.json::<Envelope<T>>().await?;
    debug!("GET {url} done in {}s", seconds_since(t));
    Ok(env.data)
  }

  async fn send<B: Serialize + ?Sized>(
    &self,
    method: reqwest::Method,
    path: &str,
    body: Option<&B>,
  ) -> Result<(), ApiError> {
    let url = self.url(path);
    debug!("{method} {url}");
    let mut req = self.client.request(method, &url);
    if let Some(body) = body {
      req = req.json(body);
    }
    let resp = req.send().await?;
    Self::check(resp).await?;
    Ok(())
  }

  pub async fn get_drones(&self) -> Result<Vec<Drone>, ApiError> {
    let drones: Vec<Drone> = self.get("drones").await?;
    info!("{} drones loaded", drones.len());
    Ok(drones)
  }

  pub async fn get_missions(&self) -> Result<Vec<Mission>, ApiError> {
    let missions: Vec<Mission> = self.get("missions").await?;
    info!("{} missions loaded", missions.len());
    Ok(missions)
  }

  pub async fn get_mission(&self, id: &str) -> Result<Mission, ApiError> {
    let res = self.get::<Option<Mission>>(&format!("missions/{id}")).await;
    match res {
      Ok(Some(mission)) => Ok(mission),
      Ok(None) => Err(ApiError::NotFound(format!("mission {id}"))),
      Err(ApiError::Status(code, _)) if code == StatusCode::NOT_FOUND => {
        Err(ApiError::NotFound(format!("mission {id}")))
      }
      Err(err) => Err(err),
    }
  }

  pub async fn update_drone_status(&self, id: &str, status: DroneStatus) -> Result<(), ApiError> {
    info!("setting drone {id} status to {status}");
    let body = DroneStatusUpdate { status };
    self
      .send(reqwest::Method::PATCH, &format!("drones/{id}"), Some(&body))
      .await
  }

  pub async fn mission_action(&self, id: &str, action: MissionAction) -> Result<(), ApiError> {
    info!("requesting {action} for mission {id}");
    let path = format!("missions/{id}/{}", action.as_str());
    self
      .send::<()>(reqwest::Method::POST, &path, None)
      .await
  }

  pub async fn create_mission(&self, mission: &MissionSubmission) -> Result<(), ApiError> {
    info!(
      "creating mission for drone {} at {}m, {} survey points, {} path points",
      mission.drone,
      mission.altitude,
      mission.survey_area.coordinates.len(),
      mission.flight_path.len()
    );
    let res = self
      .send(reqwest::Method::POST, "missions", Some(mission))
      .await;
    if let Err(err) = &res {
      error!("error creating mission: {err}");
    }
    res
  }
}

#[cfg(test)]
pub mod tests {
  use super::*;
  use std::time::Duration;

  fn client(url: &str) -> ApiClient {
    ApiClient::new(&config::Api {
      url: url.to_owned(),
      timeout: Duration::from_secs(1),
    })
    .unwrap()
  }

  #[test]
  fn test_url_join() {
    let c = client("http://127.0.0.1:8000/api/");
    assert_eq!(c.base_url(), "http://127.0.0.1:8000/api");
    assert_eq!(c.url("drones"), "http://127.0.0.1:8000/api/drones");
    assert_eq!(
      c.url("/missions/7/pause"),
      "http://127.0.0.1:8000/api/missions/7/pause"
    );
  }

  #[test]
  fn test_error_display() {
    let err = ApiError::Status(StatusCode::BAD_REQUEST, "drone is busy".to_owned());
    assert_eq!(err.to_string(), "backend responded 400 Bad Request: drone is busy");
    let err = ApiError::Status(StatusCode::BAD_GATEWAY, String::new());
    assert_eq!(err.to_string(), "backend responded 502 Bad Gateway");
    let err = ApiError::NotFound("mission 7".to_owned());
    assert_eq!(err.to_string(), "mission 7 not found");
  }

  #[tokio::test]
  async fn test_unreachable_backend() {
    // nothing listens on the discard port
    let c = client("http://127.0.0.1:9/api");
    let res = c.get_drones().await;
    assert!(matches!(res, Err(ApiError::Request(_))));
  }
}
