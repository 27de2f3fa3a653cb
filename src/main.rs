//! Evaluate the configured classification endpoints against the local dataset.
use std::path::PathBuf;

use anyhow::{Context, Result};

use nsfw_eval::{init_logger, parse_toml, run_evaluation};

#[allow(dead_code)]
enum Experiment {
    /// nsfwjs and falconsai, direct-label responses
    BinaryEndpoints,
    /// NudeNet detector, scored multi-label responses
    NudeNet,
}

fn main() -> Result<()> {
    let project_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let config_dir = project_root.join("assets/configs/");

    let experiment = Experiment::BinaryEndpoints;
    let config_toml = match experiment {
        Experiment::BinaryEndpoints => config_dir.join("binary-endpoints.toml"),
        Experiment::NudeNet => config_dir.join("nudenet.toml"),
    };

    let args = parse_toml(&config_toml, &project_root)
        .with_context(|| format!("Failed to parse TOML config: {:?}", config_toml))?;

    init_logger(args.verbose);
    tracing::debug!("{:?}", args);

    let reports = run_evaluation(&args).context("Failed to run evaluation")?;
    for report in &reports {
        println!("{report}");
    }

    tracing::info!("Evaluated {} endpoint(s)", reports.len());
    Ok(())
}
