use forecast_lib::{ForecastRecord, commands::forecast_prices::ForecastReport};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct ForecastRow {
    #[tabled(rename = "Date")]
    date : String,
    #[tabled(rename = "Predicted_Close")]
    predicted_close : String
}

/// Renders the forecast as a `Date | Predicted_Close` table, `-` for missing values.
pub fn format_forecast_table(forecast : &[ForecastRecord]) -> String {
    let rows = forecast.iter().map(|r| ForecastRow {
        date : r.date.format("%Y-%m-%d").to_string(),
        predicted_close : r.predicted_close.map(|v| format!("{:.2}", v)).unwrap_or_else(|| String::from("-"))
    });

    Table::new(rows).to_string()
}

/// Text printed after a render cycle: the table and a completion line, or a
/// notice when forecasting was unavailable.
pub fn format_report(report : &ForecastReport) -> String {
    if report.degraded() {
        return format!("Forecasting is unavailable, showing historical prices up to {} only.", report.last_date());
    }

    format!("Forecast for the next {} days\n{}\nForecast complete for {} days from {}!",
        report.horizon(), format_forecast_table(report.forecast()), report.horizon(), report.last_date())
}
