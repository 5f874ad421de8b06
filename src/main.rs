use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use dronectl::{
  api::{
    types::{available_drones, DroneStatus, Mission},
    ApiClient,
  },
  config::{read_config, Config},
  control::{apply_action, MissionAction},
  draft::{Bounds, GeometryKind, MissionDraft},
  drawing::{DraftSession, ShapeType},
  export::{mission_to_geojson, GeometrySummary},
  import::read_points,
  stats::Dashboard,
  submit::{SubmissionError, Submitter},
  types::Point,
};
use geojson::GeoJson;
use log::{debug, info, LevelFilter};
use simplelog::{ColorChoice, Config as LogConfig, TermLogger, TerminalMode};
use std::{error::Error, fs::File, path::PathBuf};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(version, about = "Drone fleet operations console")]
struct Args {
  #[arg(short, long)]
  config: Option<String>,
  /// More logging, -vv for trace
  #[arg(short, long, action = ArgAction::Count, global = true)]
  verbose: u8,
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Drone fleet
  Drones {
    #[command(subcommand)]
    cmd: DronesCmd,
  },
  /// Missions
  Missions {
    #[command(subcommand)]
    cmd: MissionsCmd,
  },
  /// Fleet and mission overview
  Stats,
}

#[derive(Subcommand, Debug)]
enum DronesCmd {
  List {
    /// Only drones that can take a new mission
    #[arg(long)]
    available: bool,
  },
  SetStatus {
    id: String,
    status: DroneStatus,
  },
}

#[derive(Subcommand, Debug)]
enum MissionsCmd {
  List,
  Show {
    id: String,
  },
  Pause {
    id: String,
    #[arg(long)]
    force: bool,
  },
  Resume {
    id: String,
    #[arg(long)]
    force: bool,
  },
  Abort {
    id: String,
    #[arg(long)]
    force: bool,
  },
  Create(CreateArgs),
  /// Mission geometry as GeoJSON
  Export {
    id: String,
    #[arg(short, long)]
    output: Option<PathBuf>,
  },
}

#[derive(ClapArgs, Debug)]
struct CreateArgs {
  #[arg(long, default_value = "")]
  drone: String,
  /// Meters, defaults to [mission] default_altitude
  #[arg(long)]
  altitude: Option<String>,
  /// Survey area vertex as lat,lng; repeat for each point
  #[arg(long = "survey", value_name = "LAT,LNG", allow_hyphen_values = true)]
  survey: Vec<Point>,
  /// Flight path waypoint as lat,lng; repeat for each point
  #[arg(long = "path", value_name = "LAT,LNG", allow_hyphen_values = true)]
  path: Vec<Point>,
  /// CSV file with survey area points, one lat,lng per row
  #[arg(long)]
  survey_csv: Option<PathBuf>,
  /// CSV file with flight path points, one lat,lng per row
  #[arg(long)]
  path_csv: Option<PathBuf>,
  /// Assign the drone even if the backend doesn't list it as available
  #[arg(long)]
  force: bool,
  /// Print the payload instead of sending it
  #[arg(long)]
  dry_run: bool,
}

fn log_level(cfg: &Config, verbose: u8) -> LevelFilter {
  match verbose {
    0 => cfg.log.level,
    1 => LevelFilter::Debug,
    _ => LevelFilter::Trace,
  }
}

fn load_points(inline: Vec<Point>, csv: Option<&PathBuf>) -> Result<Vec<Point>, Box<dyn Error>> {
  match csv {
    Some(path) => {
      let f = File::open(path)?;
      let mut points = read_points(f)?;
      debug!("{} points read from {}", points.len(), path.display());
      points.extend(inline);
      Ok(points)
    }
    None => Ok(inline),
  }
}

fn print_mission(m: &Mission) {
  let summary = GeometrySummary::of_mission(m);
  println!("Mission {}", m.id);
  println!("  drone:      {}", m.drone);
  println!("  status:     {}", m.status);
  println!("  progress:   {:.0}%", m.progress);
  println!("  altitude:   {}m", m.altitude);
  println!("  distance:   {:.1} km covered", m.distance_covered);
  if let Some(eta) = m.estimated_time_remaining {
    println!("  remaining:  {eta:.0} min");
  }
  if let Some(t) = m.start_time {
    println!("  started:    {}", t.to_rfc3339());
  }
  if let Some(t) = m.end_time {
    println!("  ended:      {}", t.to_rfc3339());
  }
  println!(
    "  path:       {} waypoints, {:.2} km",
    summary.waypoints, summary.path_km
  );
  println!(
    "  survey:     {} points, {:.3} km2",
    summary.survey_points, summary.survey_km2
  );
  let actions: Vec<&str> = m.status.allowed_actions().iter().map(|a| a.as_str()).collect();
  if !actions.is_empty() {
    println!("  actions:    {}", actions.join(", "));
  }
}

async fn drones(client: &ApiClient, cmd: DronesCmd) -> Result<(), Box<dyn Error>> {
  match cmd {
    DronesCmd::List { available } => {
      let all = client.get_drones().await?;
      let list = if available {
        available_drones(&all)
      } else {
        all.iter().collect()
      };
      println!(
        "{:<12} {:<12} {:>8} {:>22} {:<25}",
        "ID", "STATUS", "BATTERY", "LOCATION", "UPDATED"
      );
      for d in list {
        let location = d.location.map(|p| p.to_string()).unwrap_or_default();
        let updated = d.updated_at.map(|t| t.to_rfc3339()).unwrap_or_default();
        println!(
          "{:<12} {:<12} {:>7.0}% {:>22} {:<25}",
          d.id,
          d.status.as_str(),
          d.battery_level,
          location,
          updated
        );
      }
    }
    DronesCmd::SetStatus { id, status } => {
      client.update_drone_status(&id, status).await?;
      println!("Drone {id} status updated to {status}");
    }
  }
  Ok(())
}

async fn create_mission(
  client: ApiClient,
  cfg: &Config,
  args: CreateArgs,
) -> Result<(), Box<dyn Error>> {
  let survey = load_points(args.survey, args.survey_csv.as_ref())?;
  let path = load_points(args.path, args.path_csv.as_ref())?;

  if !args.drone.is_empty() && !args.force && !args.dry_run {
    let drones = client.get_drones().await?;
    if !available_drones(&drones).iter().any(|d| d.id == args.drone) {
      return Err(format!("drone {} is not available", args.drone).into());
    }
  }

  let altitude = args
    .altitude
    .unwrap_or_else(|| cfg.mission.default_altitude.to_string());
  let mut session = DraftSession::new(MissionDraft::with_altitude(&altitude));
  session.draft_mut().set_drone(&args.drone);
  if !survey.is_empty() {
    session.surface().complete(ShapeType::Polygon, survey);
  }
  if !path.is_empty() {
    session.surface().complete(ShapeType::Polyline, path);
  }
  let mut draft = session.into_draft();

  let summary = GeometrySummary::new(
    &draft.geometry(GeometryKind::SurveyArea).points,
    &draft.geometry(GeometryKind::FlightPath).points,
  );
  info!(
    "waypoints: {} | estimated distance: {:.1}km | survey area: {:.3}km2",
    summary.waypoints, summary.path_km, summary.survey_km2
  );

  let bounds = Bounds::from(&cfg.mission);
  if args.dry_run {
    let mission = match draft.build_submission_within(&bounds) {
      Ok(mission) => mission,
      Err(err) => return Err(format!("{err}: {}", err.hint()).into()),
    };
    println!("{}", serde_json::to_string_pretty(&mission)?);
    return Ok(());
  }

  let submitter = Submitter::new(client, bounds);
  match submitter.submit_draft(&mut draft).await {
    Ok(mission) => {
      println!("Mission has been created successfully for drone {}", mission.drone);
      Ok(())
    }
    Err(SubmissionError::Validation(err)) => {
      Err(format!("{err}: {}", err.hint()).into())
    }
    Err(err) => Err(err.into()),
  }
}

async fn missions(client: ApiClient, cfg: &Config, cmd: MissionsCmd) -> Result<(), Box<dyn Error>> {
  let (id, action, force) = match cmd {
    MissionsCmd::List => {
      let missions = client.get_missions().await?;
      println!(
        "{:<10} {:<12} {:<12} {:>8} {:>10} {:>9}",
        "ID", "DRONE", "STATUS", "PROGRESS", "DISTANCE", "ALTITUDE"
      );
      for m in missions {
        println!(
          "{:<10} {:<12} {:<12} {:>7.0}% {:>7.1} km {:>8}m",
          m.id,
          m.drone,
          m.status.to_string(),
          m.progress,
          m.distance_covered,
          m.altitude
        );
      }
      return Ok(());
    }
    MissionsCmd::Show { id } => {
      let mission = client.get_mission(&id).await?;
      print_mission(&mission);
      return Ok(());
    }
    MissionsCmd::Export { id, output } => {
      let mission = client.get_mission(&id).await?;
      let geojson = GeoJson::from(mission_to_geojson(&mission)).to_string();
      match output {
        Some(path) => {
          std::fs::write(&path, geojson)?;
          info!("mission {id} exported to {}", path.display());
        }
        None => println!("{geojson}"),
      }
      return Ok(());
    }
    MissionsCmd::Create(args) => return create_mission(client, cfg, args).await,
    MissionsCmd::Pause { id, force } => (id, MissionAction::Pause, force),
    MissionsCmd::Resume { id, force } => (id, MissionAction::Resume, force),
    MissionsCmd::Abort { id, force } => (id, MissionAction::Abort, force),
  };

  let mission = apply_action(&client, &id, action, force).await?;
  println!("Mission {id} has been {}", action.past_tense());
  print_mission(&mission);
  Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
  let args = Args::parse();
  let config = read_config(args.config.as_deref());

  TermLogger::init(
    log_level(&config, args.verbose),
    LogConfig::default(),
    TerminalMode::Stderr,
    ColorChoice::Auto,
  )?;

  debug!("dronectl version {VERSION}, backend at {}", config.api.url);
  let client = ApiClient::new(&config.api)?;

  match args.command {
    Command::Drones { cmd } => drones(&client, cmd).await,
    Command::Missions { cmd } => missions(client, &config, cmd).await,
    Command::Stats => {
      let drones = client.get_drones().await?;
      let missions = client.get_missions().await?;
      let dash = Dashboard::collect(&drones, &missions);
      println!("Drones:   {} total", dash.fleet.total);
      println!("  available    {}", dash.fleet.available);
      println!("  in mission   {}", dash.fleet.in_mission);
      println!("  maintenance  {}", dash.fleet.maintenance);
      println!("  availability {:.0}%", dash.fleet.availability());
      if let Some(battery) = dash.avg_battery_level {
        println!("  avg battery  {battery:.0}%");
      }
      println!("Missions: {} total", dash.missions.total);
      println!("  planned      {}", dash.missions.planned);
      println!("  in progress  {}", dash.missions.in_progress);
      println!("  paused       {}", dash.missions.paused);
      println!("  completed    {}", dash.missions.completed);
      println!("  aborted      {}", dash.missions.aborted);
      println!("  success rate {:.0}%", dash.missions.success_rate());
      Ok(())
    }
  }
}
