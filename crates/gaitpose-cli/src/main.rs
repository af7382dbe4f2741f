//! gaitpose CLI: link-length calibration and gait analysis of recorded trials.

use clap::{Args, Parser, Subcommand};
use gaitpose::{estimate_link_lengths, GaitAnalyzer, GaitConfig, LinkLengthModel, TrialData};
use std::path::{Path, PathBuf};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "gaitpose")]
#[command(about = "Estimate gait parameters from noisy 3D joint proposals")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate a subject's link-length model from a trial.
    Lengths(CliLengthsArgs),

    /// Run the full analysis on a trial.
    Analyze(CliAnalyzeArgs),

    /// Print the default configuration as JSON.
    ConfigInfo,
}

#[derive(Debug, Clone, Args)]
struct CliLengthsArgs {
    /// Trial JSON used for calibration.
    #[arg(long)]
    trial: PathBuf,

    /// Path to write the link-length model (JSON).
    #[arg(long)]
    out: PathBuf,

    /// Analysis configuration (JSON); defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Minimum valid frames per link.
    #[arg(long)]
    min_frames: Option<usize>,
}

#[derive(Debug, Clone, Args)]
struct CliAnalyzeArgs {
    /// Trial JSON to analyze.
    #[arg(long)]
    trial: PathBuf,

    /// Link-length model (JSON). When omitted the model is estimated from
    /// the trial itself.
    #[arg(long)]
    lengths: Option<PathBuf>,

    /// Path to write the trial result (JSON).
    #[arg(long)]
    out: PathBuf,

    /// Analysis configuration (JSON); defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frame rate override (frames per second).
    #[arg(long)]
    frame_rate: Option<f64>,

    /// Multiplier from sensor units to output length units.
    #[arg(long)]
    unit_scale: Option<f64>,

    /// Largest accepted link length ratio.
    #[arg(long)]
    max_link_ratio: Option<f64>,
}

// ── Helpers ────────────────────────────────────────────────────────────────

fn load_config(path: Option<&Path>) -> CliResult<GaitConfig> {
    match path {
        Some(p) => {
            tracing::info!("Loading config: {}", p.display());
            Ok(GaitConfig::from_json_file(p)?)
        }
        None => Ok(GaitConfig::default()),
    }
}

fn load_trial(path: &Path) -> CliResult<TrialData> {
    tracing::info!("Loading trial: {}", path.display());
    let trial = TrialData::from_json_file(path)?;
    tracing::info!(
        "{} frames, {} proposals",
        trial.frames.len(),
        trial.n_proposals()
    );
    Ok(trial)
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    tracing::info!("Written to {}", path.display());
    Ok(())
}

// ── Commands ───────────────────────────────────────────────────────────────

fn run_lengths(args: &CliLengthsArgs) -> CliResult<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(n) = args.min_frames {
        config.lengths.min_frames = n;
    }
    let trial = load_trial(&args.trial)?;
    let model = estimate_link_lengths(&trial.frames, &config.lengths)?;
    for link in model.links() {
        tracing::info!("  {:<12} {:8.1}", link.pair.to_string(), link.length);
    }
    write_json(&args.out, &model)
}

fn run_analyze(args: &CliAnalyzeArgs) -> CliResult<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(rate) = args.frame_rate {
        config.frame_rate = rate;
    }
    if let Some(scale) = args.unit_scale {
        config.unit_scale = scale;
    }
    if let Some(ratio) = args.max_link_ratio {
        config.selector.max_link_ratio = ratio;
    }

    let mut trial = load_trial(&args.trial)?;
    if args.frame_rate.is_some() {
        trial.frame_rate = None;
    }

    let analyzer = match &args.lengths {
        Some(path) => {
            tracing::info!("Loading link lengths: {}", path.display());
            GaitAnalyzer::new(config, LinkLengthModel::from_json_file(path)?)?
        }
        None => {
            tracing::info!("No link-length model given, calibrating on the trial");
            GaitAnalyzer::calibrate(config, &trial.frames)?
        }
    };

    let result = analyzer.analyze_trial(&trial)?;
    match (&result.empty_reason, result.summary()) {
        (Some(reason), _) => tracing::warn!("No gait records: {:?}", reason),
        (None, Some(s)) => tracing::info!(
            "{} strides: stride length {:.1}, stride time {:.3} s, cadence {:.1}/min",
            s.n_records,
            s.stride_length,
            s.stride_time,
            s.cadence
        ),
        (None, None) => {}
    }
    write_json(&args.out, &result)
}

fn run_config_info() -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(&GaitConfig::default())?);
    Ok(())
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Lengths(args) => run_lengths(&args),
        Commands::Analyze(args) => run_analyze(&args),
        Commands::ConfigInfo => run_config_info(),
    }
}
