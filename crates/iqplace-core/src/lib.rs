//! iqplace-core: Quiz generation, IQ scoring, and placement sessions.
//!
//! This crate defines the data model, the question bank, the scorer, the
//! placement predictor contract, and the per-user session that ties them
//! together. Predictor implementations live in `iqplace-predictors`.

pub mod bank;
pub mod error;
pub mod generator;
pub mod interpretation;
pub mod model;
pub mod report;
pub mod scorer;
pub mod session;
pub mod statistics;
pub mod store;
pub mod traits;

pub use error::{BankError, PredictorError, QuizError, SessionError};
pub use session::Session;
