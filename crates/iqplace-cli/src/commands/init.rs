//! The `iqplace init` command.

use std::path::Path;

use anyhow::{Context, Result};

use iqplace_core::bank::DEFAULT_BANK_TOML;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("iqplace.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("banks").context("failed to create banks/")?;
    write_if_missing(Path::new("banks/default.toml"), DEFAULT_BANK_TOML)?;

    println!("\nNext steps:");
    println!("  1. Edit iqplace.toml to point at your prediction service, if any");
    println!("  2. Run: iqplace validate --bank banks/default.toml");
    println!("  3. Run: iqplace quiz --bank banks/default.toml");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# iqplace configuration

default_predictor = "logistic"
per_category = 2
output_dir = "./iqplace-results"

# Built-in logistic model. Omit the [model] table to use the shipped defaults.
[predictors.logistic]
type = "logistic"

[predictors.logistic.model]
threshold = 0.5

# Remote model service: POST {base_url}/predict
# Setting IQPLACE_PREDICTOR_URL registers this predictor automatically.
[predictors.remote]
type = "http"
base_url = "${IQPLACE_MODEL_URL}"
timeout_secs = 10
"#;
