use anyhow::Context;
use clap::Parser;
use confluence::{
    Config, RawTimeframeSignal, UnknownTimeframePolicy, WeightingMode,
};
use std::collections::HashMap;
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Score multi-timeframe predictions from a JSON signal set.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON object mapping timeframe to signal (reads stdin when omitted)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Weighting mode, `direction` or `confidence` (overrides CONFLUENCE_MODE)
    #[arg(long)]
    mode: Option<String>,

    /// Ignore unknown timeframe keys instead of rejecting them
    #[arg(long, default_value_t = false)]
    allow_unknown: bool,

    /// Print the per-timeframe report instead of only the score
    #[arg(long, default_value_t = false)]
    report: bool,
}

fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries only the JSON result
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "confluence=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Cli::parse();
    debug!("Parsed arguments: {:?}", args);

    let mut config = Config::from_env();
    if let Some(ref mode) = args.mode {
        config.mode = WeightingMode::from_str(mode)
            .with_context(|| format!("unknown weighting mode: {}", mode))?;
    }
    if args.allow_unknown {
        config.unknown_timeframes = UnknownTimeframePolicy::Ignore;
    }

    let scorer = config.scorer().context("invalid confluence configuration")?;
    info!(
        "Scoring with {:?} weighting, weights {:?}",
        scorer.mode(),
        scorer.weights()
    );

    let body = match args.input {
        Some(ref path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    let raw: HashMap<String, RawTimeframeSignal> =
        serde_json::from_str(&body).context("input is not a valid signal set")?;

    let output = if args.report {
        let report = scorer.evaluate_raw(&raw)?;
        info!("{}", report.summary());
        serde_json::to_string_pretty(&report)?
    } else {
        let score = scorer.compute_raw(&raw)?;
        info!("{} ({:+})", score.bias().label(), score.weighted);
        serde_json::to_string_pretty(&score)?
    };

    println!("{}", output);
    Ok(())
}
