mod logging;
mod parse;
mod render;

use std::path::PathBuf;

use atlas::{Axis, CelestialState, ConjureRequest, Property, ZodiacKind};
use atlas_config::AtlasConfig;
use chrono::Utc;
use clap::{Parser, Subcommand};
use log::info;

#[derive(Parser)]
#[command(
    name = "atlas",
    about = "Swiss Ephemeris interface for observing celestial bodies"
)]
struct Cli {
    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Config file (default: $ATLAS_CONFIG or ~/.config/atlas/atlas.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Write log lines to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Observe the listed celestial bodies
    Observe(ObserveArgs),
}

#[derive(clap::Args)]
struct ObserveArgs {
    /// Bodies to observe, by configured name
    #[arg(required = true)]
    targets: Vec<String>,
    /// Date of observation, YYYY-MM-DD (UTC, default today)
    #[arg(short, long)]
    date: Option<String>,
    /// Time of observation, HH:MM:SS (UTC, default now)
    #[arg(short, long)]
    time: Option<String>,
    /// "lat,lon[,alt]" (default: config location)
    #[arg(short, long)]
    location: Option<String>,
    /// Zodiac: tropical or sidereal
    #[arg(short, long, default_value = "tropical")]
    zodiac: ZodiacKind,
    /// Ayanamsa for the sidereal zodiac (lahiri, fagan, krishna, raman, yukteshwar, deluce)
    #[arg(short, long)]
    ayanamsa: Option<String>,
    /// One line per body
    #[arg(short, long)]
    concise: bool,
    /// JSON output
    #[arg(long, conflicts_with = "concise")]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_file.as_deref())?;

    let path = match cli.config {
        Some(path) => path,
        None => atlas_config::config_path()?,
    };
    let config = atlas_config::load_or_init(&path)?;

    match cli.command {
        Commands::Observe(args) => observe(&config, &args),
    }
}

fn observe(config: &AtlasConfig, args: &ObserveArgs) -> anyhow::Result<()> {
    let time = parse::observation_time(args.date.as_deref(), args.time.as_deref(), Utc::now())?;
    let location = match &args.location {
        Some(text) => parse::parse_location(text)?,
        None => config.location(),
    };
    info!(target: "cli", "observing {:?} at {} from {}", args.targets, time, location);

    let template = ConjureRequest::new(time, location, "")
        .with_zodiac(args.zodiac, args.ayanamsa.as_deref())
        .with_properties(&[Property::Position, Property::Phenomenon])
        .with_frames(&[Axis::Ecliptic, Axis::Equatorial]);

    let states = conjure_all(config, &template, &args.targets)?;

    let reports: Vec<_> = states.iter().map(render::Report::new).collect();
    if args.json {
        println!("{}", render::json(&reports)?);
    } else if args.concise {
        for report in &reports {
            println!("{}", render::concise(report));
        }
    } else {
        for report in &reports {
            print!("{}", render::full(report));
        }
    }
    Ok(())
}

#[cfg(feature = "swisseph")]
fn conjure_all(
    config: &AtlasConfig,
    template: &ConjureRequest,
    targets: &[String],
) -> anyhow::Result<Vec<CelestialState>> {
    use anyhow::Context;
    use atlas::ephemeris::{EphemerisFacade, SwissEph};
    use atlas::{Observatory, Wizard};

    let path = config.ephemeris_path();
    let engine = SwissEph::acquire(&path)?;
    let facade = EphemerisFacade::new(engine, &path);
    let mut wizard = Wizard::new(Observatory::new(facade), config.registry().clone());
    wizard
        .conjure_many(template, targets)
        .context("observation failed")
}

#[cfg(not(feature = "swisseph"))]
fn conjure_all(
    config: &AtlasConfig,
    _template: &ConjureRequest,
    _targets: &[String],
) -> anyhow::Result<Vec<CelestialState>> {
    anyhow::bail!(
        "atlas was built without the Swiss Ephemeris engine (config: {}); rebuild with --features swisseph",
        config.source.display()
    )
}
