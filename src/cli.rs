//! Command line interface
//!
//! Each subcommand runs one print session: start code, an optional travel
//! to the start corner, the generated toolpath and the end code. The result
//! is written to a file, uploaded to the printer host, copied to the
//! clipboard or printed, in any combination.

use crate::{
    ApertureGenerator, Config, MotionEmitter, MoveRequest, PropertyValue, ScriptExporter,
    DEFAULT_OVERLAP,
};
use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// ExtrudeKit CLI
#[derive(Parser, Debug)]
#[command(
    name = "extrudekit",
    version,
    about = "Generate G-code for extruded apertures and lattices on Klipper printers."
)]
pub struct Cli {
    /// Configuration file (TOML or JSON); defaults to the platform config directory
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Leave out firmware macros so generic G-code viewers can render the output
    #[arg(long)]
    pub simulation: bool,

    /// Print property override, e.g. --set layer_width=0.45 (repeatable)
    #[arg(long = "set", value_parser = parse_property, number_of_values = 1)]
    pub overrides: Vec<(String, PropertyValue)>,

    /// Save the script to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Upload the script into the printer's gcode directory under this name
    #[arg(long, value_name = "NAME")]
    pub upload: Option<String>,

    /// Copy the script to the clipboard
    #[arg(long)]
    pub clipboard: bool,

    /// Print the script to stdout
    #[arg(long)]
    pub show: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the toolpath starts
#[derive(Args, Debug, Clone, Copy, PartialEq)]
pub struct StartArgs {
    /// Start corner X in mm
    #[arg(long)]
    pub x: Option<f64>,

    /// Start corner Y in mm
    #[arg(long)]
    pub y: Option<f64>,

    /// Start height in mm
    #[arg(long)]
    pub z: Option<f64>,

    /// Z-lift for the travel to the start corner in mm
    #[arg(long, default_value_t = 0.0)]
    pub z_lift: f64,

    /// Feed rate for the toolpath in mm/min
    #[arg(long)]
    pub feed: Option<f64>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Hollow square aperture
    Square {
        /// Outer side length in mm
        #[arg(long)]
        outer: f64,
        /// Inner side length in mm
        #[arg(long)]
        inner: f64,
        /// Bead overlap fraction
        #[arg(long, default_value_t = DEFAULT_OVERLAP)]
        overlap: f64,
        #[command(flatten)]
        start: StartArgs,
    },
    /// Hollow rectangular aperture, wider in X than in Y
    Rect {
        #[arg(long)]
        outer_x: f64,
        #[arg(long)]
        outer_y: f64,
        #[arg(long)]
        inner_x: f64,
        #[arg(long)]
        inner_y: f64,
        /// Bead overlap fraction
        #[arg(long, default_value_t = DEFAULT_OVERLAP)]
        overlap: f64,
        #[command(flatten)]
        start: StartArgs,
    },
    /// Lattice of parallel bars
    Lattice {
        /// Y extent to cover in mm; each pass of two bars uses twice the spacing
        #[arg(long)]
        extent: f64,
        /// Distance between bars in mm
        #[arg(long)]
        spacing: f64,
        /// Bar length in mm
        #[arg(long)]
        length: f64,
        #[command(flatten)]
        start: StartArgs,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Self::Square { .. } => "square",
            Self::Rect { .. } => "rect",
            Self::Lattice { .. } => "lattice",
        }
    }

    fn start(&self) -> &StartArgs {
        match self {
            Self::Square { start, .. } | Self::Rect { start, .. } | Self::Lattice { start, .. } => {
                start
            }
        }
    }
}

fn parse_property(s: &str) -> Result<(String, PropertyValue), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid KEY=VALUE: no `=` found in '{}'.", s))?;
    let value = match value.trim() {
        "true" => PropertyValue::Flag(true),
        "false" => PropertyValue::Flag(false),
        number => PropertyValue::Number(
            number
                .parse()
                .map_err(|_| format!("Invalid value '{}' for '{}'", number, key))?,
        ),
    };
    Ok((key.trim().to_string(), value))
}

impl Cli {
    /// Configuration from `--config`, else the default file if present
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let path = match &self.config {
            Some(path) => path.clone(),
            None => match Config::default_path() {
                Ok(path) if path.exists() => path,
                _ => {
                    tracing::debug!("No configuration file, using defaults");
                    return Ok(Config::default());
                }
            },
        };
        Config::load_from_file(&path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))
    }
}

/// Run the session described by `cli` and return the finished emitter
pub fn generate(cli: &Cli, config: &Config) -> anyhow::Result<MotionEmitter> {
    let mut emitter = MotionEmitter::new(config.print.clone());
    emitter
        .set_properties(cli.overrides.iter().map(|(k, v)| (k.as_str(), *v)))
        .context("Invalid --set override")?;
    if cli.simulation {
        emitter.set_properties([("simulation", PropertyValue::Flag(true))])?;
    }

    emitter.begin_session();
    emitter.add_comment(format!("extrudekit {}", cli.command.name()));

    let start = cli.command.start();
    let mut travel = MoveRequest::absolute().z_lift(start.z_lift);
    if let Some(x) = start.x {
        travel = travel.x(x);
    }
    if let Some(y) = start.y {
        travel = travel.y(y);
    }
    if let Some(z) = start.z {
        travel = travel.z(z);
    }
    if !travel.target.is_empty() {
        emitter.travel_move(travel)?;
    }
    if let Some(feed) = start.feed {
        emitter.set_feed(feed)?;
    }

    let mut generator = ApertureGenerator::new(&mut emitter);
    match &cli.command {
        Commands::Square {
            outer,
            inner,
            overlap,
            ..
        } => generator.square_aperture(*outer, *inner, *overlap)?,
        Commands::Rect {
            outer_x,
            outer_y,
            inner_x,
            inner_y,
            overlap,
            ..
        } => generator.rect_aperture(*outer_x, *outer_y, *inner_x, *inner_y, *overlap)?,
        Commands::Lattice {
            extent,
            spacing,
            length,
            ..
        } => generator.lattice(*extent, *spacing, *length)?,
    }

    emitter.end_session();
    Ok(emitter)
}

fn copy_to_clipboard(script: &str) -> anyhow::Result<()> {
    let mut clipboard = arboard::Clipboard::new().context("Clipboard unavailable")?;
    clipboard
        .set_text(script.to_string())
        .context("Failed to copy script to clipboard")?;
    tracing::info!("Script copied to clipboard");
    Ok(())
}

/// Generate the script and deliver it to every requested destination
pub fn run(cli: &Cli) -> anyhow::Result<String> {
    let config = cli.load_config()?;
    let emitter = generate(cli, &config)?;
    let script = emitter.script_text();
    let simulation = emitter.properties().simulation;
    let exporter = ScriptExporter::new(config.output.clone());

    if let Some(path) = &cli.output {
        exporter.save(&script, path)?;
    }
    if let Some(name) = &cli.upload {
        let path = exporter.upload(&script, name, simulation)?;
        tracing::info!("Uploaded {} to {}", name, path.display());
        if simulation && !cli.clipboard {
            // previews are usually pasted into a web viewer
            if let Err(e) = copy_to_clipboard(&script) {
                tracing::warn!("{:#}", e);
            }
        }
    }
    if cli.clipboard {
        copy_to_clipboard(&script)?;
    }
    if cli.show {
        print!("{}", script);
    }
    Ok(script)
}
