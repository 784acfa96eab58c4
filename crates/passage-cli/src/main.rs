//! `passage` - plan a route, fetch weather along it, inspect the result.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use passage_cli::{JsonSnapshotStore, SyntheticForecast, SyntheticMarine};
use passage_core::{
    Coordinate, RoutePoint, SpeedUnit, TimedWaypoint, VehicleProfile, VehicleType, WeatherParameter,
    WeatherRecord,
};
use passage_planner::{RoutePlanner, SnapshotStore};

#[derive(Parser, Debug)]
#[command(author, version, about = "Travel route planner with weather along the way")]
struct Cli {
    /// Snapshot file holding the route and its weather
    #[arg(long, default_value = "passage.json", global = true)]
    file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan a new route and fetch weather for every waypoint
    Plan {
        /// Route point as "lat,lon"; repeat in travel order
        #[arg(long = "point", value_parser = parse_coordinate, required = true)]
        points: Vec<Coordinate>,

        /// Vehicle name shown in the summary
        #[arg(long, default_value = "vehicle")]
        name: String,

        /// Cruising speed, in the chosen unit
        #[arg(long, default_value_t = 100.0)]
        speed: f64,

        #[arg(long, value_enum, default_value_t = UnitArg::Kmh)]
        unit: UnitArg,

        #[arg(long, value_enum, default_value_t = VehicleArg::Car)]
        vehicle: VehicleArg,

        /// Departure time, RFC 3339; defaults to now
        #[arg(long)]
        departure: Option<DateTime<Utc>>,

        /// Minutes between interpolated waypoints
        #[arg(long, default_value_t = 30)]
        interval_mins: i64,
    },

    /// Re-fetch weather for the stored route
    Refresh {
        #[arg(long, default_value_t = 100.0)]
        speed: f64,

        #[arg(long, value_enum, default_value_t = UnitArg::Kmh)]
        unit: UnitArg,

        #[arg(long, value_enum, default_value_t = VehicleArg::Car)]
        vehicle: VehicleArg,

        /// Departure time; defaults to the stored first waypoint
        #[arg(long)]
        departure: Option<DateTime<Utc>>,

        #[arg(long, default_value_t = 30)]
        interval_mins: i64,
    },

    /// Print the stored waypoints with one weather category
    Show {
        #[arg(long, value_enum, default_value_t = ParameterArg::Wind)]
        parameter: ParameterArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum UnitArg {
    Kmh,
    Knots,
    Mph,
}

impl From<UnitArg> for SpeedUnit {
    fn from(unit: UnitArg) -> Self {
        match unit {
            UnitArg::Kmh => SpeedUnit::Kmh,
            UnitArg::Knots => SpeedUnit::Knots,
            UnitArg::Mph => SpeedUnit::Mph,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VehicleArg {
    Boat,
    Car,
    Plane,
}

impl From<VehicleArg> for VehicleType {
    fn from(vehicle: VehicleArg) -> Self {
        match vehicle {
            VehicleArg::Boat => VehicleType::Boat,
            VehicleArg::Car => VehicleType::Car,
            VehicleArg::Plane => VehicleType::Plane,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ParameterArg {
    Wind,
    Current,
    Wave,
    Conditions,
    Solar,
}

impl From<ParameterArg> for WeatherParameter {
    fn from(parameter: ParameterArg) -> Self {
        match parameter {
            ParameterArg::Wind => WeatherParameter::Wind,
            ParameterArg::Current => WeatherParameter::Current,
            ParameterArg::Wave => WeatherParameter::Wave,
            ParameterArg::Conditions => WeatherParameter::Conditions,
            ParameterArg::Solar => WeatherParameter::Solar,
        }
    }
}

fn parse_coordinate(raw: &str) -> Result<Coordinate, String> {
    let (lat, lon) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected \"lat,lon\", got {raw:?}"))?;
    let lat: f64 = lat.trim().parse().map_err(|e| format!("bad latitude: {e}"))?;
    let lon: f64 = lon.trim().parse().map_err(|e| format!("bad longitude: {e}"))?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(format!("coordinate out of range: {lat},{lon}"));
    }
    Ok(Coordinate::new(lat, lon))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("passage=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let store = JsonSnapshotStore::new(&cli.file);

    match cli.command {
        Command::Plan {
            points,
            name,
            speed,
            unit,
            vehicle,
            departure,
            interval_mins,
        } => {
            let route: Vec<RoutePoint> = points
                .into_iter()
                .enumerate()
                .map(|(i, coordinate)| RoutePoint {
                    position: i as u32,
                    coordinate,
                })
                .collect();
            let profile = VehicleProfile::new(&name, speed, unit.into(), vehicle.into());
            let departure = departure.unwrap_or_else(Utc::now);

            let mut planner = RoutePlanner::with_route(
                route,
                profile,
                departure,
                Duration::minutes(interval_mins),
                SyntheticForecast,
                SyntheticMarine,
            )?;

            let refresh = planner.refresh_weather(Utc::now()).await;
            store.save(planner.route(), planner.waypoints())?;

            let summary = planner.summary();
            println!(
                "Planned {} waypoints over {:.1} km",
                summary.waypoint_count,
                summary.total_distance_m / 1000.0
            );
            if let Some(arrival) = summary.estimated_arrival {
                println!("Last waypoint reached at {}", arrival.to_rfc3339());
            }
            println!(
                "Weather: {} waypoints refreshed, {} with failures",
                refresh.refreshed, refresh.failed
            );
            println!("Saved to {}", store.path().display());
        }

        Command::Refresh {
            speed,
            unit,
            vehicle,
            departure,
            interval_mins,
        } => {
            let route = store.load_route()?;
            let waypoints = store.load_waypoints()?;
            if route.is_empty() {
                return Err(anyhow!("no stored route in {}", store.path().display()));
            }

            let departure = departure
                .or_else(|| waypoints.first().map(|w| w.timestamp))
                .unwrap_or_else(Utc::now);
            let profile = VehicleProfile::new("vehicle", speed, unit.into(), vehicle.into());

            let mut planner = RoutePlanner::restore(
                route,
                waypoints,
                profile,
                departure,
                Duration::minutes(interval_mins),
                SyntheticForecast,
                SyntheticMarine,
            )?;

            let refresh = planner.refresh_weather(Utc::now()).await;
            store.save(planner.route(), planner.waypoints())?;

            println!(
                "Refreshed {} waypoints, {} already sufficient, {} with failures",
                refresh.refreshed, refresh.already_sufficient, refresh.failed
            );
            for error in &refresh.errors {
                println!("  warning: {error}");
            }
        }

        Command::Show { parameter } => {
            let waypoints = store.load_waypoints()?;
            if waypoints.is_empty() {
                return Err(anyhow!("no stored waypoints in {}", store.path().display()));
            }

            let parameter: WeatherParameter = parameter.into();
            println!("{:>4}  {:<20}  {:<22}  {}", "#", "time (UTC)", "position", parameter);
            for waypoint in &waypoints {
                println!(
                    "{:>4}  {:<20}  {:<22}  {}",
                    waypoint.position,
                    waypoint.timestamp.format("%Y-%m-%d %H:%M"),
                    waypoint.coordinate.to_string(),
                    render_parameter(waypoint, parameter),
                );
            }
        }
    }

    Ok(())
}

/// The record closest in time to the waypoint's own timestamp.
fn nearest_record(waypoint: &TimedWaypoint) -> Option<&WeatherRecord> {
    waypoint
        .records
        .iter()
        .min_by_key(|r| (r.timestamp - waypoint.timestamp).num_seconds().abs())
}

/// One display cell for the chosen category; absent measurements render as
/// "no data" rather than being skipped.
fn render_parameter(waypoint: &TimedWaypoint, parameter: WeatherParameter) -> String {
    let Some(record) = nearest_record(waypoint) else {
        return "no data".to_string();
    };

    let cell = match parameter {
        WeatherParameter::Wind => match (record.wind_direction_deg, record.wind_speed_kmh) {
            (Some(dir), Some(speed)) => {
                let gust = record
                    .wind_gust_kmh
                    .map(|g| format!(", gusts {g:.0} km/h"))
                    .unwrap_or_default();
                Some(format!("{dir:.0}° at {speed:.1} km/h{gust}"))
            }
            _ => None,
        },
        WeatherParameter::Current => {
            match (record.current_direction_deg, record.current_speed_kmh) {
                (Some(dir), Some(speed)) => Some(format!("{dir:.0}° at {speed:.1} km/h")),
                _ => None,
            }
        }
        WeatherParameter::Wave => record.wave_height_m.map(|height| {
            let direction = record
                .wave_direction_deg
                .map(|d| format!(" from {d:.0}°"))
                .unwrap_or_default();
            format!("{height:.1} m{direction}")
        }),
        WeatherParameter::Conditions => record.condition_title.clone(),
        WeatherParameter::Solar => record
            .is_daylight
            .map(|daylight| if daylight { "daylight" } else { "dark" }.to_string()),
    };
    cell.unwrap_or_else(|| "no data".to_string())
}
