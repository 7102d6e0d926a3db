//! Predictor configuration and factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use iqplace_core::generator::DEFAULT_PER_CATEGORY;
use iqplace_core::model::Placement;
use iqplace_core::traits::{PlacementPredictor, PredictionResult};

use crate::http::{HttpPredictor, DEFAULT_TIMEOUT_SECS};
use crate::logistic::{LogisticModel, LogisticPredictor};
use crate::mock::MockPredictor;

/// Name under which the built-in logistic model is always available.
pub const BUILTIN_PREDICTOR: &str = "logistic";

/// Environment variable that registers an `http` predictor.
pub const PREDICTOR_URL_ENV: &str = "IQPLACE_PREDICTOR_URL";

/// Configuration for a single placement predictor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PredictorConfig {
    Logistic {
        #[serde(default)]
        model: LogisticModel,
    },
    Http {
        base_url: String,
        #[serde(default = "default_timeout")]
        timeout_secs: u64,
    },
    Mock {
        #[serde(default = "default_mock_placed")]
        placed: bool,
        #[serde(default = "default_mock_confidence")]
        confidence: f64,
        #[serde(default = "default_mock_factor")]
        dominant_factor: String,
    },
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_mock_placed() -> bool {
    true
}
fn default_mock_confidence() -> f64 {
    0.75
}
fn default_mock_factor() -> String {
    "CGPA".to_string()
}

/// Top-level iqplace configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IqplaceConfig {
    /// Predictor configurations keyed by name.
    #[serde(default)]
    pub predictors: HashMap<String, PredictorConfig>,
    /// Predictor used when none is named on the command line.
    #[serde(default = "default_predictor")]
    pub default_predictor: String,
    /// Questions drawn per category.
    #[serde(default = "default_per_category")]
    pub per_category: usize,
    /// Output directory for session exports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_predictor() -> String {
    BUILTIN_PREDICTOR.to_string()
}
fn default_per_category() -> usize {
    DEFAULT_PER_CATEGORY
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./iqplace-results")
}

impl Default for IqplaceConfig {
    fn default() -> Self {
        Self {
            predictors: HashMap::new(),
            default_predictor: default_predictor(),
            per_category: default_per_category(),
            output_dir: default_output_dir(),
        }
    }
}

impl IqplaceConfig {
    /// Look up a predictor by name, falling back to the built-in model for
    /// [`BUILTIN_PREDICTOR`].
    pub fn predictor(&self, name: &str) -> Option<PredictorConfig> {
        match self.predictors.get(name) {
            Some(config) => Some(config.clone()),
            None if name == BUILTIN_PREDICTOR => Some(PredictorConfig::Logistic {
                model: LogisticModel::default(),
            }),
            None => None,
        }
    }

    /// Names of every predictor that can be requested, sorted.
    pub fn predictor_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.predictors.keys().cloned().collect();
        if !self.predictors.contains_key(BUILTIN_PREDICTOR) {
            names.push(BUILTIN_PREDICTOR.to_string());
        }
        names.sort();
        names
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are copied verbatim and never rescanned.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_predictor_config(config: PredictorConfig) -> PredictorConfig {
    match config {
        PredictorConfig::Http {
            base_url,
            timeout_secs,
        } => PredictorConfig::Http {
            base_url: resolve_env_vars(&base_url),
            timeout_secs,
        },
        PredictorConfig::Mock {
            placed,
            confidence,
            dominant_factor,
        } => PredictorConfig::Mock {
            placed,
            confidence,
            dominant_factor: resolve_env_vars(&dominant_factor),
        },
        other => other,
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `iqplace.toml` in the current directory
/// 2. `~/.config/iqplace/config.toml`
///
/// `IQPLACE_PREDICTOR_URL` registers (or repoints) the `http` predictor.
pub fn load_config() -> Result<IqplaceConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<IqplaceConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("iqplace.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => IqplaceConfig::default(),
    };

    if let Ok(url) = std::env::var(PREDICTOR_URL_ENV) {
        apply_predictor_url(&mut config, url);
    }

    config.predictors = config
        .predictors
        .into_iter()
        .map(|(name, predictor)| (name, resolve_predictor_config(predictor)))
        .collect();

    Ok(config)
}

/// Parse a TOML configuration document.
pub fn parse_config(content: &str) -> Result<IqplaceConfig> {
    let config: IqplaceConfig = toml::from_str(content)?;
    anyhow::ensure!(config.per_category > 0, "per_category must be at least 1");
    Ok(config)
}

fn apply_predictor_url(config: &mut IqplaceConfig, url: String) {
    match config.predictors.get_mut("http") {
        Some(PredictorConfig::Http { base_url, .. }) => *base_url = url,
        _ => {
            config.predictors.insert(
                "http".into(),
                PredictorConfig::Http {
                    base_url: url,
                    timeout_secs: DEFAULT_TIMEOUT_SECS,
                },
            );
        }
    }
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("iqplace"))
}

/// Create a predictor instance from its configuration.
pub fn create_predictor(name: &str, config: &PredictorConfig) -> Result<Box<dyn PlacementPredictor>> {
    let predictor: Box<dyn PlacementPredictor> = match config {
        PredictorConfig::Logistic { model } => Box::new(
            LogisticPredictor::new(model.clone())
                .with_context(|| format!("predictor '{name}'"))?,
        ),
        PredictorConfig::Http {
            base_url,
            timeout_secs,
        } => Box::new(
            HttpPredictor::new(base_url, *timeout_secs)
                .with_context(|| format!("predictor '{name}'"))?,
        ),
        PredictorConfig::Mock {
            placed,
            confidence,
            dominant_factor,
        } => {
            let placement = if *placed {
                Placement::Placed
            } else {
                Placement::NotPlaced
            };
            let result = PredictionResult::new(placement, *confidence, dominant_factor.as_str())
                .with_context(|| format!("predictor '{name}'"))?;
            Box::new(MockPredictor::with_fixed_result(result))
        }
    };
    Ok(predictor)
}

/// Resolve a predictor by name (or the configured default) and build it.
pub fn resolve_predictor(
    config: &IqplaceConfig,
    name: Option<&str>,
) -> Result<Box<dyn PlacementPredictor>> {
    let name = name.unwrap_or(&config.default_predictor);
    let predictor_config = config.predictor(name).with_context(|| {
        format!(
            "unknown predictor '{name}' (available: {})",
            config.predictor_names().join(", ")
        )
    })?;
    create_predictor(name, &predictor_config)
}
