//! iqplace-predictors: Placement predictor implementations.
//!
//! Implements the `PlacementPredictor` trait with a local logistic model, a
//! remote HTTP model service, and a mock for tests, plus the configuration
//! layer that selects between them.

pub mod config;
pub mod http;
pub mod logistic;
pub mod mock;

pub use config::{
    create_predictor, load_config, load_config_from, resolve_predictor, IqplaceConfig,
    PredictorConfig,
};
pub use iqplace_core::error::PredictorError;
