use thiserror::Error;

use crate::prices::{MAX_HORIZON, MIN_HORIZON};

/// Failure conditions of a forecast render cycle.
///
/// Only `ModelLoad` has a recovery path (the viewer keeps running without a
/// model); every other variant aborts the cycle it was raised in.
#[derive(Debug, Error, PartialEq)]
pub enum ForecastError {
    #[error("Failed to load forecast model: {0}")]
    ModelLoad(String),

    #[error("Horizon {0} is outside the supported range [{}, {}]", MIN_HORIZON, MAX_HORIZON)]
    InvalidHorizon(i64),

    #[error("Forecast model broke its contract: {0}")]
    ContractViolation(String),

    #[error("Forecast does not line up with price history: {0}")]
    Alignment(String),

    #[error("Could not parse price data: {0}")]
    DataParse(String),
}
