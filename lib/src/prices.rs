use chrono::NaiveDate;
use serde::Serialize;
use anyhow::anyhow;

use crate::error::ForecastError;

pub const MIN_HORIZON : i64 = 1;
pub const MAX_HORIZON : i64 = 30;
pub const DEFAULT_HORIZON : i64 = 30;

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct HistoricalRecord {
    pub date : NaiveDate,
    pub close : f64
}

/// One forecasted day. `predicted_close` is `None` when the model produced a
/// non-finite value for that step.
#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
pub struct ForecastRecord {
    #[serde(rename = "Date")]
    pub date : NaiveDate,
    #[serde(rename = "Predicted_Close")]
    pub predicted_close : Option<f64>
}

/// Number of days to forecast, always within `[MIN_HORIZON, MAX_HORIZON]`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Horizon(u32);

impl Horizon {
    pub fn new(days : i64) -> Result<Horizon, ForecastError> {
        if days < MIN_HORIZON || days > MAX_HORIZON {
            return Err(ForecastError::InvalidHorizon(days));
        }

        Ok(Horizon(days as u32))
    }

    pub fn days(&self) -> u32 {
        let Horizon(days) = self;
        *days
    }
}

impl Default for Horizon {
    fn default() -> Self {
        Horizon(DEFAULT_HORIZON as u32)
    }
}

impl std::fmt::Display for Horizon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        write!(f, "{}", self.days())
    }
}

impl std::str::FromStr for Horizon {
    type Err = anyhow::Error;

    fn from_str(text : &str) -> anyhow::Result<Self> {
        let days = text.trim().parse::<i64>()
            .map_err(|_| anyhow!("'{}' is not a number of days", text.trim()))?;
        Ok(Horizon::new(days)?)
    }
}
