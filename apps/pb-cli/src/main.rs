use clap::{Parser, Subcommand};
use pb_app::{AppConfig, AppError, AppResult, export_csv, run_headless};
use pb_data::{
    DatasetKind, DatasetStore, DeviceReading, LatestQuery, RangeQuery, decode_latest,
    decode_range, merge_overlay, parse_table, serialize_overlay, series_keys,
};
use pb_sim::SimulationState;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pb-cli")]
#[command(about = "propbench CLI - propulsion test-rig blocks, simulation and datasets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the block catalog
    Catalog {
        /// Print the full definitions as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the telemetry simulation to completion and export CSV
    Simulate {
        /// YAML config file with simulation defaults
        #[arg(long)]
        config: Option<PathBuf>,
        /// Simulated duration in seconds
        #[arg(long)]
        duration: Option<f64>,
        /// Speed multiplier
        #[arg(long)]
        speed: Option<f64>,
        /// Jitter seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Parse a CSV file and summarize its channels
    Inspect {
        /// Path to the CSV file
        csv_path: PathBuf,
    },
    /// Merge a simulation CSV with test CSVs for one channel
    Overlay {
        /// Simulation CSV (e.g. output of `simulate`)
        #[arg(long)]
        sim: PathBuf,
        /// Test dataset CSVs; each file stem becomes the dataset name
        #[arg(long = "data")]
        data: Vec<PathBuf>,
        /// Channel to overlay (e.g. RPM)
        #[arg(long)]
        channel: String,
    },
    /// Build a live-telemetry request, or decode a saved response
    Feed {
        /// Device id (defaults to telemetry.device_id from the config)
        device_id: Option<String>,
        /// YAML config file with telemetry defaults
        #[arg(long)]
        config: Option<PathBuf>,
        /// Number of readings to request
        #[arg(long)]
        limit: Option<u32>,
        /// Range start (ISO-8601); requests a range instead of the latest readings
        #[arg(long, requires = "end")]
        start: Option<String>,
        /// Range end (ISO-8601)
        #[arg(long, requires = "start")]
        end: Option<String>,
        /// Saved JSON body of the response to decode
        #[arg(long)]
        response: Option<PathBuf>,
    },
    /// Load and validate a config file
    CheckConfig {
        /// Path to the config YAML file
        config_path: PathBuf,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Catalog { json } => cmd_catalog(json),
        Commands::Simulate {
            config,
            duration,
            speed,
            seed,
            output,
        } => cmd_simulate(config.as_deref(), duration, speed, seed, output.as_deref()),
        Commands::Inspect { csv_path } => cmd_inspect(&csv_path),
        Commands::Overlay { sim, data, channel } => cmd_overlay(&sim, &data, &channel),
        Commands::Feed {
            device_id,
            config,
            limit,
            start,
            end,
            response,
        } => cmd_feed(FeedArgs {
            device_id,
            config,
            limit,
            range: start.zip(end),
            response,
        }),
        Commands::CheckConfig { config_path } => cmd_check_config(&config_path),
    }
}

fn cmd_catalog(json: bool) -> AppResult<()> {
    let defs = pb_graph::definitions();
    if json {
        let out = serde_json::to_string_pretty(defs)
            .map_err(|e| AppError::Io(io::Error::other(e)))?;
        println!("{}", out);
        return Ok(());
    }

    println!("Block catalog:");
    for def in defs {
        println!(
            "  {:<10} {:<12} in: [{}]  out: [{}]",
            def.block_type,
            def.name,
            def.inputs.join(", "),
            def.outputs.join(", ")
        );
    }
    Ok(())
}

fn cmd_simulate(
    config_path: Option<&Path>,
    duration: Option<f64>,
    speed: Option<f64>,
    seed: Option<u64>,
    output: Option<&Path>,
) -> AppResult<()> {
    let mut config = match config_path {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(d) = duration {
        config.simulation.duration_s = d;
    }
    if let Some(s) = speed {
        config.simulation.speed_multiplier = s;
    }
    if seed.is_some() {
        config.simulation.seed = seed;
    }
    config.validate()?;

    eprintln!(
        "Simulating {:.1} s at {}x",
        config.simulation.duration_s, config.simulation.speed_multiplier
    );

    let started = Instant::now();
    let mut last_emit = Instant::now();
    let mut on_tick = |state: &SimulationState| {
        if state.progress >= 100.0 || last_emit.elapsed().as_millis() >= 100 {
            render_cli_progress(state, started.elapsed().as_secs_f64());
            last_emit = Instant::now();
        }
    };
    let samples = run_headless(&config.simulation, Some(&mut on_tick))?;
    clear_progress_line();

    let csv = export_csv(&samples)?;
    if let Some(path) = output {
        std::fs::write(path, csv)?;
        eprintln!("✓ Exported {} samples to {}", samples.len(), path.display());
    } else {
        print!("{}", csv);
    }
    Ok(())
}

fn clear_progress_line() {
    eprint!("\r{}\r", " ".repeat(80));
    let _ = io::stderr().flush();
}

fn render_cli_progress(state: &SimulationState, elapsed_wall_s: f64) {
    let width = 28usize;
    let fraction = state.progress / 100.0;
    let filled = ((fraction * width as f64).round() as usize).min(width);
    let bar = format!(
        "{}{}",
        "#".repeat(filled),
        "-".repeat(width.saturating_sub(filled))
    );
    eprint!(
        "\r[{}] {:>5.1}%  t={:.2}/{:.2}s  elapsed={:.2}s",
        bar,
        state.progress,
        fraction * state.duration_s,
        state.duration_s,
        elapsed_wall_s
    );
    let _ = io::stderr().flush();
}

fn cmd_inspect(csv_path: &Path) -> AppResult<()> {
    let text = std::fs::read_to_string(csv_path)?;
    let table = parse_table(&text)?;

    println!("File: {}", csv_path.display());
    println!("  Channels ({}): {}", table.columns.len(), table.columns.join(", "));
    println!("  Rows: {}", table.rows.len());
    if table.skipped > 0 {
        println!("  Skipped rows: {}", table.skipped);
    }
    if let (Some(first), Some(last)) = (table.rows.first(), table.rows.last()) {
        println!("  Time: {:.3} .. {:.3} s", first.time, last.time);
    }
    Ok(())
}

fn cmd_overlay(sim_path: &Path, data_paths: &[PathBuf], channel: &str) -> AppResult<()> {
    let sim = parse_table(&std::fs::read_to_string(sim_path)?)?;

    let mut store = DatasetStore::new();
    for path in data_paths {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let text = std::fs::read_to_string(path)?;
        let dataset = store.import_csv(&name, DatasetKind::Test, &text)?;
        if let Some((from, to)) = dataset.time_range() {
            eprintln!(
                "{}: {} rows, {:.3} .. {:.3} s",
                dataset.name,
                dataset.rows.len(),
                from,
                to
            );
        }
        if !dataset.has_channel(channel) {
            eprintln!("warning: {} has no {} channel", dataset.name, channel);
        }
    }

    let points = merge_overlay(&sim.rows, store.datasets(), channel);
    tracing::debug!(points = points.len(), datasets = store.len(), "overlay merged");

    print!("{}", serialize_overlay(&points, &series_keys(&points))?);
    Ok(())
}

struct FeedArgs {
    device_id: Option<String>,
    config: Option<PathBuf>,
    limit: Option<u32>,
    range: Option<(String, String)>,
    response: Option<PathBuf>,
}

fn cmd_feed(args: FeedArgs) -> AppResult<()> {
    let config = match args.config.as_deref() {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    config.validate()?;
    let telemetry = &config.telemetry;

    let device_id = args
        .device_id
        .or_else(|| telemetry.device_id.clone())
        .ok_or_else(|| {
            AppError::Config("no device id: pass one or set telemetry.device_id".into())
        })?;

    let body = match args.response.as_deref() {
        Some(path) => Some(std::fs::read_to_string(path)?),
        None => None,
    };

    let readings = match args.range {
        Some((start, end)) => {
            let query = RangeQuery::new(device_id, start, end);
            println!("GET {}", query.path());
            body.as_deref().map(decode_range).transpose()?
        }
        None => {
            let query = LatestQuery::new(device_id)
                .with_limit(args.limit.unwrap_or(telemetry.limit));
            println!("GET {}", query.path());
            eprintln!("poll every {} ms", telemetry.poll_interval_ms);
            body.as_deref().map(decode_latest).transpose()?
        }
    };

    if let Some(readings) = readings {
        print_readings(&readings);
    }
    Ok(())
}

fn print_readings(readings: &[DeviceReading]) {
    println!("id,created_at,temperature,humidity,vibration");
    for r in readings {
        println!(
            "{},{},{},{},{}",
            r.id,
            r.created_at.as_deref().unwrap_or(""),
            fmt_opt(r.temperature),
            fmt_opt(r.humidity),
            fmt_opt(r.vibration)
        );
    }
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

fn cmd_check_config(config_path: &Path) -> AppResult<()> {
    println!("Validating config: {}", config_path.display());
    let config = AppConfig::load(config_path)?;
    config.validate()?;
    println!("✓ Config is valid");
    print!("{}", config.to_yaml()?);
    Ok(())
}
