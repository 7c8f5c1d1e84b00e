#![deny(unsafe_code)]
//! CLI binary for the colormap core.
//!
//! Subcommands:
//! - `sample`: colors at given positions, or evenly spaced
//! - `discretize`: lookup table with N bins
//! - `convert <color>`: hex / RGB / HSV / dark flag of a color
//! - `insert` / `consolidate`: control-point edits, printing the new map
//! - `list`: built-in presets and interpolation methods
//!
//! Maps come from `--map '<json>'` (the `controlPoints` / `interpolationMethod`
//! shape) or `--preset <name>`.

mod error;

use clap::{Args, Parser, Subcommand};
use colormap_core::interpolate::{color_at, sample};
use colormap_core::{discretize, editor, presets, Color, ColorMap, InterpolationMethod};
use error::CliError;
use std::process;

#[derive(Parser)]
#[command(name = "colormap", about = "Color map sampling and editing CLI")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Print debug logging to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Where the color map comes from.
#[derive(Args)]
#[group(required = true, multiple = false)]
struct MapSource {
    /// Color map as JSON.
    #[arg(long)]
    map: Option<String>,

    /// Built-in color map name (see `list`).
    #[arg(short, long)]
    preset: Option<String>,
}

#[derive(Args)]
struct MapArgs {
    #[command(flatten)]
    source: MapSource,

    /// Override the interpolation method (rgb, hsv, lab).
    #[arg(short, long)]
    method: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the color at each position, or `--count` evenly spaced colors.
    Sample {
        #[command(flatten)]
        map: MapArgs,

        /// Domain positions to sample.
        #[arg(long = "at", allow_negative_numbers = true, num_args = 1..)]
        at: Vec<f64>,

        /// Number of evenly spaced samples when no `--at` is given.
        #[arg(short, long, default_value_t = 5)]
        count: usize,
    },
    /// Split the domain into equal bins colored at their centers.
    Discretize {
        #[command(flatten)]
        map: MapArgs,

        /// Number of bins.
        #[arg(short, long, default_value_t = 8, allow_negative_numbers = true)]
        bins: i64,
    },
    /// Show every representation of a color.
    Convert {
        /// Hex color such as "#ff8800" or "f80".
        color: String,
    },
    /// Insert a control point and print the resulting map.
    Insert {
        #[command(flatten)]
        map: MapArgs,

        /// Domain position of the new point.
        #[arg(long, allow_negative_numbers = true)]
        at: f64,
    },
    /// Resolve tied and out-of-range control points and print the map.
    Consolidate {
        #[command(flatten)]
        map: MapArgs,
    },
    /// List built-in presets and interpolation methods.
    List,
}

fn load_map(args: &MapArgs) -> Result<ColorMap, CliError> {
    let mut map = match (&args.source.map, &args.source.preset) {
        (Some(json), _) => ColorMap::from_json(json)?,
        (None, Some(name)) => presets::from_name(name)?,
        (None, None) => {
            return Err(CliError::Input(
                "one of --map or --preset is required".to_string(),
            ))
        }
    };
    if let Some(name) = &args.method {
        let method = InterpolationMethod::from_name(name).ok_or_else(|| {
            CliError::Input(format!("unknown interpolation method '{name}' (rgb, hsv, lab)"))
        })?;
        map.set_interpolation_method(method);
    }
    log::debug!(
        "loaded color map: {} control points over [{}, {}]",
        map.len(),
        map.start_range,
        map.end_range
    );
    Ok(map)
}

fn color_json(color: &Color) -> serde_json::Value {
    let rgb = color.rgb();
    let hsv = color.hsv();
    serde_json::json!({
        "hex": color.hex(),
        "rgb": {"r": rgb.r, "g": rgb.g, "b": rgb.b},
        "hsv": {"h": hsv.h, "s": hsv.s, "v": hsv.v},
        "isDark": color.is_dark(),
    })
}

fn print_map(map: &ColorMap, json: bool) -> Result<(), CliError> {
    if json {
        println!("{}", map.to_json_pretty()?);
    } else {
        println!(
            "{} [{}, {}]",
            map.interpolation_method.name(),
            map.start_range,
            map.end_range
        );
        for (i, p) in map.control_points.iter().enumerate() {
            println!("  {i:>3}  {:<10} {}", p.position, p.color);
        }
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let presets = presets::list_names();
            let methods: Vec<&str> = InterpolationMethod::ALL.iter().map(|m| m.name()).collect();
            if cli.json {
                let info = serde_json::json!({
                    "presets": presets,
                    "methods": methods,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Presets:");
                for name in presets {
                    println!("  {name}");
                }
                println!("Methods:");
                println!("  {}", methods.join(", "));
            }
        }
        Command::Sample { map, at, count } => {
            let map = load_map(&map)?;
            let samples: Vec<(f64, Color)> = if at.is_empty() {
                let step = if count > 1 {
                    map.span() / (count - 1) as f64
                } else {
                    0.0
                };
                sample(&map, count)
                    .into_iter()
                    .enumerate()
                    .map(|(i, c)| (map.start_range + i as f64 * step, c))
                    .collect()
            } else {
                at.iter().map(|&p| (p, color_at(&map, p))).collect()
            };
            if cli.json {
                let out: Vec<_> = samples
                    .iter()
                    .map(|(p, c)| serde_json::json!({"position": p, "color": c}))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                for (p, c) in &samples {
                    println!("{p:<10} {c}");
                }
            }
        }
        Command::Discretize { map, bins } => {
            let map = load_map(&map)?;
            let lut = discretize(&map, bins);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&lut)?);
            } else {
                for entry in &lut {
                    println!(
                        "[{}, {}]  center {}  {}",
                        entry.lower_bound, entry.upper_bound, entry.center, entry.color
                    );
                }
            }
        }
        Command::Convert { color } => {
            let color = Color::parse_hex(&color)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&color_json(&color))?);
            } else {
                let rgb = color.rgb();
                let hsv = color.hsv();
                println!("hex   {color}");
                println!("rgb   {} {} {}", rgb.r, rgb.g, rgb.b);
                println!("hsv   {:.1} {:.3} {:.3}", hsv.h, hsv.s, hsv.v);
                println!("dark  {}", color.is_dark());
            }
        }
        Command::Insert { map, at } => {
            let map = editor::insert(&load_map(&map)?, at);
            print_map(&map, cli.json)?;
        }
        Command::Consolidate { map } => {
            let map = editor::consolidate(&load_map(&map)?);
            print_map(&map, cli.json)?;
        }
    }

    Ok(())
}

/// Stderr logger for the `log` facade: warnings always, debug with
/// `--verbose`.
fn log_builder(verbose: bool) -> env_logger::Builder {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .format_timestamp(None)
        .target(env_logger::Target::Stderr);
    builder
}

fn main() {
    let cli = Cli::parse();
    log_builder(cli.verbose).init();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
