use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use pv_app::{AppError, AppResult, PumpReport, Session, SessionConfig};
use pv_core::{Property, SubstanceId};
use pv_model::{DataModel, UnitModel};
use pv_service::RecordedService;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pv")]
#[command(about = "propviz CLI - thermodynamic state points and property plots", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List output and input properties for a substance
    Properties {
        /// Substance id (e.g., mp.H2O, ig.air)
        substance: String,
    },
    /// Show unit labels for the configured unit selection
    Units {
        /// Path to the session YAML file
        config_path: PathBuf,
        /// Property symbols to label (defaults to every property)
        props: Vec<String>,
    },
    /// Run a session against recorded service responses
    Replay {
        /// Path to the session YAML file
        config_path: PathBuf,
        /// Path to the recordings JSON file
        #[arg(short, long)]
        recordings: PathBuf,
        /// Point to compute, e.g. "T=373.15,x=1" (repeatable)
        #[arg(short, long = "point")]
        points: Vec<String>,
        /// Plot axes as "x,y", e.g. "h,p"
        #[arg(long)]
        axes: Option<String>,
        /// Print view state as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Properties { substance } => cmd_properties(substance.into()),
        Commands::Units { config_path, props } => cmd_units(&config_path, &props),
        Commands::Replay {
            config_path,
            recordings,
            points,
            axes,
            json,
        } => cmd_replay(&config_path, &recordings, &points, axes.as_deref(), json),
    }
}

fn cmd_properties(substance: SubstanceId) -> AppResult<()> {
    let model = DataModel::new(substance);
    println!("Substance: {}", model.substance());
    println!("  Output: {}", join(&model.output_properties()));
    println!("  Input:  {}", join(&model.input_properties()));
    Ok(())
}

fn cmd_units(config_path: &Path, props: &[String]) -> AppResult<()> {
    let config = SessionConfig::load(config_path)?;
    let units = UnitModel::with_units(config.legal_units, config.units)?;

    let symbols: Vec<String> = if props.is_empty() {
        Property::ALL.iter().map(|p| p.symbol().to_string()).collect()
    } else {
        props.to_vec()
    };
    for symbol in &symbols {
        println!("  {symbol}: {}", units.label(symbol));
    }
    Ok(())
}

fn cmd_replay(
    config_path: &Path,
    recordings: &Path,
    points: &[String],
    axes: Option<&str>,
    json: bool,
) -> AppResult<()> {
    let config = SessionConfig::load(config_path)?;
    let service = RecordedService::load(recordings)?;
    let mut session = Session::new(config)?;

    if let Some(axes) = axes {
        let (x, y) = parse_axes(axes)?;
        session.plot_controls_mut().set_axes(x, y)?;
    }

    let mut report = session.pump(&service);
    for text in points {
        let entries = parse_point(text)?;
        session.request_entry(entries.iter().map(|(p, v)| (*p, v.as_str())))?;
    }
    let more = session.pump(&service);
    report.applied += more.applied;
    report.failed.extend(more.failed);

    if json {
        let state = serde_json::json!({
            "substance": session.substance_label(),
            "table": &*session.table().state(),
            "plot": &*session.plot().state(),
        });
        println!("{state:#}");
        return Ok(());
    }

    println!("Substance: {}", session.substance_label());
    print_report(&report);
    print_table(&session);
    print_plot(&session);
    Ok(())
}

fn print_report(report: &PumpReport) {
    println!("Applied {} responses", report.applied);
    for (id, err) in &report.failed {
        println!("  ✗ {id}: {err}");
    }
}

fn print_table(session: &Session) {
    let table = session.table().state();
    println!();
    println!("{}", table.headers().join(" | "));
    for row in 0..table.rows.len() {
        println!("{}", table.visible_cells(row).join(" | "));
    }
}

fn print_plot(session: &Session) {
    let plot = session.plot().state();
    println!();
    println!("Plot: {} vs {}", plot.axis_title(plot.x), plot.axis_title(plot.y));
    for trace in plot.aux_traces.iter().filter(|t| !t.is_empty()) {
        let lines = trace.x.iter().filter(|v| v.is_none()).count();
        println!("  {}: {} line(s)", trace.kind, lines);
    }
    println!("  points: {}", plot.points.x.len());
}

fn parse_point(text: &str) -> AppResult<Vec<(Property, String)>> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|pair| {
            let (symbol, value) = pair
                .split_once('=')
                .ok_or_else(|| AppError::InvalidInput(format!("expected prop=value, got '{pair}'")))?;
            let prop = symbol
                .trim()
                .parse::<Property>()
                .map_err(|err| AppError::InvalidInput(err.to_string()))?;
            Ok((prop, value.trim().to_string()))
        })
        .collect()
}

fn parse_axes(text: &str) -> AppResult<(Property, Property)> {
    match pv_core::parse_property_list(text)
        .map_err(|err| AppError::InvalidInput(err.to_string()))?
        .as_slice()
    {
        [x, y] => Ok((*x, *y)),
        _ => Err(AppError::InvalidInput(format!(
            "expected two axes as x,y, got '{text}'"
        ))),
    }
}

fn join(props: &[Property]) -> String {
    props
        .iter()
        .map(|p| p.symbol())
        .collect::<Vec<_>>()
        .join(", ")
}
