use crate::{
  api::types::{Drone, DroneStatus, Mission, MissionStatus},
  util::Counter,
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FleetStats {
  pub total: usize,
  pub available: usize,
  pub in_mission: usize,
  pub maintenance: usize,
}

impl FleetStats {
  pub fn collect(drones: &[Drone]) -> Self {
    let counter: Counter<DroneStatus> = drones.iter().map(|d| d.status).collect();
    Self {
      total: drones.len(),
      available: counter.count(&DroneStatus::Available),
      in_mission: counter.count(&DroneStatus::InMission),
      maintenance: counter.count(&DroneStatus::Maintenance),
    }
  }

  /// Available drones out of the whole fleet, in percent; 0 for an empty fleet.
  pub fn availability(&self) -> f64 {
    if self.total == 0 {
      0.0
    } else {
      self.available as f64 * 100.0 / self.total as f64
    }
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MissionStats {
  pub total: usize,
  pub planned: usize,
  pub in_progress: usize,
  pub paused: usize,
  pub completed: usize,
  pub aborted: usize,
}

impl MissionStats {
  pub fn collect(missions: &[Mission]) -> Self {
    let counter: Counter<MissionStatus> = missions.iter().map(|m| m.status).collect();
    Self {
      total: missions.len(),
      planned: counter.count(&MissionStatus::Planned),
      in_progress: counter.count(&MissionStatus::InProgress),
      paused: counter.count(&MissionStatus::Paused),
      completed: counter.count(&MissionStatus::Completed),
      aborted: counter.count(&MissionStatus::Aborted),
    }
  }

  /// Completed missions out of all missions, in percent; 0 without missions.
  pub fn success_rate(&self) -> f64 {
    if self.total == 0 {
      0.0
    } else {
      self.completed as f64 * 100.0 / self.total as f64
    }
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Dashboard {
  pub fleet: FleetStats,
  pub missions: MissionStats,
  pub avg_battery_level: Option<f64>,
}

impl Dashboard {
  pub fn collect(drones: &[Drone], missions: &[Mission]) -> Self {
    let avg_battery_level = if drones.is_empty() {
      None
    } else {
      Some(drones.iter().map(|d| d.battery_level).sum::<f64>() / drones.len() as f64)
    };
    Self {
      fleet: FleetStats::collect(drones),
      missions: MissionStats::collect(missions),
      avg_battery_level,
    }
  }
}

#[cfg(test)]
pub mod tests {
  use super::*;

  fn drone(id: &str, status: DroneStatus, battery_level: f64) -> Drone {
    Drone {
      id: id.to_owned(),
      status,
      battery_level,
      location: None,
      updated_at: None,
    }
  }

  fn mission(status: MissionStatus) -> Mission {
    Mission {
      id: "M".to_owned(),
      drone: "DRN-001".to_owned(),
      status,
      progress: 0.0,
      distance_covered: 0.0,
      altitude: 100.0,
      start_time: None,
      end_time: None,
      estimated_time_remaining: None,
      flight_path: vec![],
      survey_area: None,
    }
  }

  #[test]
  fn test_fleet_stats() {
    let drones = vec![
      drone("DRN-001", DroneStatus::InMission, 85.0),
      drone("DRN-002", DroneStatus::Available, 92.0),
      drone("DRN-003", DroneStatus::Maintenance, 45.0),
      drone("DRN-004", DroneStatus::Available, 78.0),
    ];
    let stats = FleetStats::collect(&drones);
    assert_eq!(
      stats,
      FleetStats {
        total: 4,
        available: 2,
        in_mission: 1,
        maintenance: 1
      }
    );
    assert_eq!(stats.availability(), 50.0);
  }

  #[test]
  fn test_mission_stats() {
    use MissionStatus::*;
    let missions: Vec<Mission> = [InProgress, InProgress, Completed, Planned, Aborted, Paused, Completed]
      .into_iter()
      .map(mission)
      .collect();
    let stats = MissionStats::collect(&missions);
    assert_eq!(stats.total, 7);
    assert_eq!(stats.in_progress, 2);
    assert_eq!(stats.completed, 2);
    assert_eq!(stats.planned, 1);
    assert_eq!(stats.aborted, 1);
    assert_eq!(stats.paused, 1);
    let rate = stats.success_rate();
    assert!((rate - 28.571).abs() < 0.01, "{rate}");
  }

  #[test]
  fn test_empty_dashboard() {
    let dash = Dashboard::collect(&[], &[]);
    assert_eq!(dash, Dashboard::default());
    assert_eq!(dash.missions.success_rate(), 0.0);
    assert_eq!(dash.fleet.availability(), 0.0);
  }

  #[test]
  fn test_avg_battery() {
    let drones = vec![
      drone("a", DroneStatus::Available, 50.0),
      drone("b", DroneStatus::Available, 100.0),
    ];
    let dash = Dashboard::collect(&drones, &[]);
    assert_eq!(dash.avg_battery_level, Some(75.0));
  }
}
