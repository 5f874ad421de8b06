use duration_str::deserialize_duration;
use log::LevelFilter;
use serde::Deserialize;
use std::{fs, path::Path, time::Duration};

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Api {
  pub url: String,
  #[serde(deserialize_with = "deserialize_duration")]
  pub timeout: Duration,
}

impl Default for Api {
  fn default() -> Self {
    Self {
      url: "http://127.0.0.1:8000/api".to_owned(),
      timeout: Duration::from_secs(10),
    }
  }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Log {
  pub level: LevelFilter,
}

impl Default for Log {
  fn default() -> Self {
    Self {
      level: LevelFilter::Info,
    }
  }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Mission {
  pub default_altitude: i32,
  pub min_altitude: i32,
  pub max_altitude: i32,
  pub enforce_bounds: bool,
}

impl Default for Mission {
  fn default() -> Self {
    Self {
      default_altitude: 120,
      min_altitude: 30,
      max_altitude: 400,
      enforce_bounds: false,
    }
  }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
  pub log: Log,
  pub api: Api,
  pub mission: Mission,
}

pub fn parse_config(raw: &str) -> Result<Config, toml::de::Error> {
  toml::from_str(raw)
}

/// Tries the explicit filename first, then the well-known locations.
/// Falls back to defaults when nothing can be read. The logger is not set up
/// yet at this point, so diagnostics go to stderr.
pub fn read_config(filename: Option<&str>) -> Config {
  let mut filenames = vec!["./dronectl.toml", "/etc/dronectl.toml"];
  if let Some(filename) = filename {
    filenames.insert(0, filename);
  }

  for fname in filenames {
    let path = Path::new(fname);
    if !path.is_file() {
      continue;
    }
    let raw = match fs::read_to_string(path) {
      Ok(raw) => raw,
      Err(err) => {
        eprintln!("Error reading config file {}: {}", fname, err);
        continue;
      }
    };
    match parse_config(&raw) {
      Ok(cfg) => return cfg,
      Err(err) => {
        eprintln!("Error parsing config file {}: {}", fname, err);
        continue;
      }
    }
  }
  Default::default()
}
