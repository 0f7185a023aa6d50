/// Command-line landslide risk assessment.
/// Reads one feature request (or an array of them) as JSON and prints the
/// assessments as JSON on stdout. Logs go to stderr.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scarp_core::batch::{assess_batch, assess_batch_with_provider};
use scarp_core::provider::{SoilGrid, SoilRaster};
use scarp_core::{Assessment, EngineConfig, FeatureRequest, RiskEngine, ScoringMode};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Scoring {
    /// Slope-banded factor-of-safety tiers.
    Fos,
    /// Weighted-overlay susceptibility index.
    Index,
}

impl From<Scoring> for ScoringMode {
    fn from(s: Scoring) -> Self {
        match s {
            Scoring::Fos => ScoringMode::FactorOfSafety,
            Scoring::Index => ScoringMode::SusceptibilityIndex,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "scarp", about = "Landslide risk assessment for geographic points", version)]
struct Args {
    /// JSON file holding one feature request or an array of requests.
    #[arg(short, long)]
    input: PathBuf,

    /// Engine configuration JSON (partial files keep defaults).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured scoring mode.
    #[arg(long, value_enum)]
    scoring: Option<Scoring>,

    /// Simulated rainfall in mm; replaces observed current and 7-day rain.
    #[arg(long)]
    rain: Option<f64>,

    /// Failure-plane depth in metres for requests that do not set one.
    #[arg(long)]
    depth: Option<f64>,

    /// Soil raster JSON used for requests without a soil sample.
    #[arg(long)]
    soil_grid: Option<PathBuf>,

    /// Pretty-print the output.
    #[arg(long)]
    pretty: bool,

    /// Default log filter when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Outcome {
    Ok(Box<Assessment>),
    Err { error: String },
}

fn load_config(args: &Args) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            EngineConfig::from_json(&text).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => EngineConfig::default(),
    };
    if let Some(scoring) = args.scoring {
        config = config.with_scoring_mode(scoring.into());
    }
    Ok(config)
}

fn load_requests(path: &Path) -> Result<(Vec<FeatureRequest>, bool)> {
    let text = fs::read_to_string(path).with_context(|| format!("reading input {}", path.display()))?;
    let value: Value = serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    match value {
        Value::Array(_) => {
            let reqs = serde_json::from_value(value).context("input array is not a list of feature requests")?;
            Ok((reqs, true))
        }
        Value::Object(_) => {
            let req = serde_json::from_value(value).context("input is not a feature request")?;
            Ok((vec![req], false))
        }
        _ => bail!("input must be a JSON object or array"),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let engine = RiskEngine::new(load_config(&args)?).context("invalid engine configuration")?;
    let (mut requests, is_batch) = load_requests(&args.input)?;

    for req in &mut requests {
        if args.rain.is_some() {
            req.rainfall_override_mm = args.rain;
        }
        if req.failure_depth_m.is_none() {
            req.failure_depth_m = args.depth;
        }
    }

    let mut raster = SoilRaster::NotLoaded;
    if let Some(path) = &args.soil_grid {
        let text = fs::read_to_string(path).with_context(|| format!("reading soil grid {}", path.display()))?;
        raster.load(SoilGrid::from_json(&text).with_context(|| format!("parsing soil grid {}", path.display()))?);
        info!(path = %path.display(), "soil raster loaded");
    }

    info!(count = requests.len(), scoring = ?engine.config().scoring_mode, "assessing");
    let results = if raster.is_loaded() {
        assess_batch_with_provider(&engine, &requests, &raster)
    } else {
        assess_batch(&engine, &requests)
    };

    let mut outcomes = Vec::with_capacity(results.len());
    for (i, result) in results.into_iter().enumerate() {
        match result {
            Ok(a) => outcomes.push(Outcome::Ok(Box::new(a))),
            Err(e) => {
                warn!(index = i, error = %e, "request rejected");
                outcomes.push(Outcome::Err { error: e.to_string() });
            }
        }
    }

    let out = if is_batch {
        serde_json::to_value(&outcomes)?
    } else {
        match outcomes.pop() {
            Some(Outcome::Ok(a)) => serde_json::to_value(&a)?,
            Some(Outcome::Err { error }) => bail!("request rejected: {error}"),
            None => bail!("no request in input"),
        }
    };

    let text = if args.pretty { serde_json::to_string_pretty(&out)? } else { serde_json::to_string(&out)? };
    println!("{text}");
    Ok(())
}
