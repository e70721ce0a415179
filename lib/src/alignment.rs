use chrono::{Duration, NaiveDate};

use crate::prices::*;
use crate::plotter::DatedSeries;
use crate::error::ForecastError;
use crate::utils;

/// History followed by its forecast, split at `boundary` (the last observed
/// date).
#[derive(Debug, PartialEq)]
pub struct CombinedView<'a> {
    pub historical : &'a [HistoricalRecord],
    pub forecast : &'a [ForecastRecord],
    pub boundary : NaiveDate
}

impl<'a> CombinedView<'a> {
    pub fn to_series(&self, historical_label : &str, forecast_label : &str) -> Vec<DatedSeries> {
        vec!(DatedSeries::from_history(historical_label, self.historical),
             DatedSeries::from_forecast(forecast_label, self.forecast))
    }

    /// False when every forecast day is missing its prediction, leaving
    /// nothing to draw for the forecast.
    pub fn has_predictions(&self) -> bool {
        self.forecast.iter().any(|r| r.predicted_close.is_some())
    }
}

/// Joins sorted history with a forecast window. An empty forecast yields
/// `None` so that callers skip the combined output. The forecast must start on
/// the day after the last observation and continue day by day.
pub fn combine<'a>(historical : &'a [HistoricalRecord],
                   forecast : &'a [ForecastRecord]) -> Result<Option<CombinedView<'a>>, ForecastError> {
    let first_forecast = match forecast.first() {
        Some(record) => record,
        None => return Ok(None)
    };

    let boundary = utils::last_date(historical)
        .ok_or_else(|| ForecastError::Alignment(String::from("No price history to attach the forecast to")))?;

    let expected_start = boundary + Duration::days(1);
    if first_forecast.date != expected_start {
        return Err(ForecastError::Alignment(
            format!("Forecast starts on {} but history ends on {}", first_forecast.date, boundary)));
    }

    if let Some(pair) = forecast.windows(2).find(|pair| pair[1].date != pair[0].date + Duration::days(1)) {
        return Err(ForecastError::Alignment(
            format!("Forecast jumps from {} to {}", pair[0].date, pair[1].date)));
    }

    Ok(Some(CombinedView { historical, forecast, boundary }))
}
