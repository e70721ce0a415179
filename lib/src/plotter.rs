use chrono::NaiveDate;
use strum::{AsRefStr, Display};

use crate::prices::*;

#[cfg(test)]
use mockall::{automock};

#[derive(Debug, PartialEq, Clone, Copy, AsRefStr, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ChartKind {
    Historical,
    Forecast,
    Combined
}

#[derive(Debug, PartialEq, Clone)]
pub struct DatedSeries {
    pub label : String,
    pub points : Vec<(NaiveDate, f64)>
}

impl DatedSeries {
    pub fn from_history(label : &str, history : &[HistoricalRecord]) -> DatedSeries {
        DatedSeries { label : String::from(label), points : history.iter().map(|r| (r.date, r.close)).collect() }
    }

    // Days without a prediction leave a gap in the line.
    pub fn from_forecast(label : &str, forecast : &[ForecastRecord]) -> DatedSeries {
        let points = forecast.iter()
            .filter_map(|r| r.predicted_close.map(|value| (r.date, value)))
            .collect();
        DatedSeries { label : String::from(label), points }
    }
}

#[cfg_attr(test, automock)]
pub trait Plotter {
    /// Draws every series on a shared date axis. `marker` adds a vertical line
    /// at the given date.
    fn plot_lines(&mut self, series_list : &Vec<DatedSeries>, marker : Option<NaiveDate>,
                  title : &str, y_label : &str, filename : &str) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_kind_names_are_snake_case() {
        assert_eq!(ChartKind::Historical.as_ref(), "historical");
        assert_eq!(ChartKind::Combined.to_string(), "combined");
    }

    #[test]
    fn forecast_series_skips_missing_predictions() {
        let date = |d| NaiveDate::from_ymd_opt(2024, 2, d).unwrap();
        let forecast = vec!(
            ForecastRecord { date : date(1), predicted_close : Some(150.0) },
            ForecastRecord { date : date(2), predicted_close : None },
            ForecastRecord { date : date(3), predicted_close : Some(149.8) });

        let series = DatedSeries::from_forecast("Forecasted Close", &forecast);
        assert_eq!(series.points, vec!((date(1), 150.0), (date(3), 149.8)));
    }
}
