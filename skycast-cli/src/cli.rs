use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};

use skycast_core::{
    Config, ForecastBundle, ForecastProvider, Location, OpenMeteoProvider,
    cache::{Snapshot, SnapshotStore},
    editorial::{self, CityDashboard},
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather dashboard CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the dashboard for a location.
    Show {
        /// Location key, e.g. "melbourne". Falls back to the configured
        /// default, then to an interactive picker.
        location: Option<String>,

        /// Print the merged dashboard as JSON instead of formatted text.
        #[arg(long)]
        json: bool,

        /// Bypass the snapshot cache and fetch fresh data.
        #[arg(long)]
        refresh: bool,
    },

    /// List known locations.
    Locations,

    /// Set the default location.
    Configure {
        /// Location key; prompts interactively when omitted.
        location: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Show {
                location,
                json,
                refresh,
            } => show(location, json, refresh).await,
            Command::Locations => {
                list_locations();
                Ok(())
            }
            Command::Configure { location } => configure(location),
        }
    }
}

async fn show(location: Option<String>, json: bool, refresh: bool) -> Result<()> {
    let config = Config::load()?;

    let location = match location.as_deref() {
        Some(key) => Location::resolve(key),
        None => match config.resolve_default_location() {
            Some(location) => location,
            None => pick_location("Which location?")?,
        },
    };

    let store = SnapshotStore::open()?;
    let bundle = fetch_bundle(location, &store, config.ttl_secs(), refresh).await?;
    let dashboard = editorial::merge(bundle, editorial::content_for(location.key));

    if json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
    } else {
        print_dashboard(&dashboard);
    }

    Ok(())
}

/// Serve a fresh snapshot when one exists, otherwise fetch live data. A
/// failed live fetch falls back to a stale snapshot when there is one.
async fn fetch_bundle(
    location: &Location,
    store: &SnapshotStore,
    ttl_secs: u64,
    refresh: bool,
) -> Result<ForecastBundle> {
    let cached = store.load(location.key);

    if !refresh {
        if let Some(snapshot) = &cached {
            if snapshot.is_fresh(chrono::Utc::now(), ttl_secs) {
                return Ok(snapshot.bundle.clone());
            }
        }
    }

    let provider = OpenMeteoProvider::new();
    match provider.forecast(location).await {
        Ok(bundle) => {
            if let Err(err) = store.store(location.key, &Snapshot::new(bundle.clone())) {
                tracing::warn!("failed to store forecast snapshot: {err:#}");
            }
            Ok(bundle)
        }
        Err(err) => match cached {
            Some(snapshot) => {
                tracing::warn!("live fetch failed, serving stale snapshot: {err}");
                Ok(snapshot.bundle)
            }
            None => Err(err).with_context(|| {
                format!("Could not fetch a forecast for {}", location.name)
            }),
        },
    }
}

fn pick_location(prompt: &str) -> Result<&'static Location> {
    let keys: Vec<&str> = Location::all().iter().map(|l| l.key).collect();
    let choice = inquire::Select::new(prompt, keys)
        .prompt()
        .context("Location selection cancelled")?;

    Location::find(choice).ok_or_else(|| anyhow!("Unknown location '{choice}'"))
}

fn list_locations() {
    for location in Location::all() {
        let marker = if location.coastal { "coastal" } else { "inland" };
        println!("{:<12} {} ({marker})", location.key, location.name);
    }
}

fn configure(location: Option<String>) -> Result<()> {
    let location = match location {
        Some(key) => Location::find(&key).ok_or_else(|| {
            anyhow!("Unknown location '{key}'. Run `skycast locations` to list known keys.")
        })?,
        None => pick_location("Default location")?,
    };

    let mut config = Config::load()?;
    config.set_default_location(location.key);
    config.save()?;

    println!("Default location set to {} ({}).", location.name, location.key);
    Ok(())
}

fn print_dashboard(dashboard: &CityDashboard) {
    let current = &dashboard.current;

    println!("{}", dashboard.name);
    println!(
        "{}°C (feels like {}°C), {}",
        current.temperature, current.feels_like, current.condition
    );
    println!(
        "Wind {} km/h {} (gusts {}), humidity {}%, UV {}",
        current.wind_speed,
        current.wind_direction,
        current.wind_gusts,
        current.humidity,
        current.uv_index
    );
    println!(
        "Rain chance {}%, pressure {} hPa, visibility {} km, cloud {}%, dew point {}°C",
        current.chance_of_rain,
        current.pressure,
        current.visibility,
        current.cloud_cover,
        current.dew_point
    );

    if let Some(air) = &dashboard.air_quality {
        println!(
            "Air quality: AQI {}, PM2.5 {:.1}, PM10 {:.1}",
            air.aqi, air.pm25, air.pm10
        );
    }

    if let Some(line) = dashboard.microtext.first() {
        println!("\n  \"{line}\"");
    }

    println!("\nNext hours:");
    for slot in &dashboard.hourly {
        let peak = if slot.is_peak_travel { "*" } else { " " };
        println!(
            "  {:>5}{peak} {:>3}°  {:<8} rain {:>3}%  wind {:>3} km/h",
            slot.time_label,
            slot.temperature,
            slot.condition.as_str(),
            slot.rain_prob,
            slot.wind_speed
        );
    }

    println!("\nThis week:");
    for slot in &dashboard.daily {
        println!(
            "  {:<6} {:>3}°/{:>3}°  {:<8} rain {:>3}%  {} - {}",
            slot.day_label,
            slot.high,
            slot.low,
            slot.condition.as_str(),
            slot.rain_prob,
            slot.sunrise,
            slot.sunset
        );
    }

    if !dashboard.stories.is_empty() {
        println!("\nStories:");
        for story in &dashboard.stories {
            println!("  {:<22} {}", story.title, story.value);
        }
    }

    if !dashboard.suburbs.is_empty() {
        println!("\nSuburbs: {}", dashboard.suburbs.join(", "));
    }
}
