use chrono::{Duration, NaiveDate};
use anyhow::Context;
use log::{debug, warn};

use crate::prices::*;
use crate::forecast_model::*;
use crate::error::ForecastError;

/// Builds the forecast table for the `days` following `last_date`.
///
/// `last_date` must be the latest date of the price history. With no model
/// the window is empty (degraded mode), but `days` is still validated. The
/// model must return exactly one value per requested day.
pub fn build_forecast_window(last_date : NaiveDate,
                             days : u32,
                             model : Option<&mut dyn ForecastModel>) -> anyhow::Result<Vec<ForecastRecord>> {
    let horizon = Horizon::new(days as i64)?;

    let model = match model {
        Some(model) => model,
        None => {
            debug!("No forecast model loaded, skipping {} day forecast from {}", horizon, last_date);
            return Ok(Vec::new());
        }
    };

    let values = model.forecast(horizon.days())
        .with_context(|| format!("Model {} failed to forecast {} days", model.name(), horizon))?;
    if values.len() != horizon.days() as usize {
        return Err(ForecastError::ContractViolation(
            format!("Model {} returned {} values for a {} day horizon", model.name(), values.len(), horizon)).into());
    }

    let window = values.into_iter().enumerate()
        .map(|(i, value)| {
            let date = last_date.checked_add_signed(Duration::days(i as i64 + 1))
                .ok_or_else(|| ForecastError::ContractViolation(format!("Day {} after {} is out of range", i + 1, last_date)))?;
            let predicted_close = if value.is_finite() {
                Some(value)
            }
            else {
                warn!("Model produced {} for {}, leaving it blank", value, date);
                None
            };
            Ok(ForecastRecord { date, predicted_close })
        })
        .collect::<Result<Vec<_>, ForecastError>>()?;

    Ok(window)
}
