use anyhow::Context;
use forecast_lib::{ForecastError, ForecastRecord, HistoricalRecord, utils};

const DATE_COLUMN : &str = "Date";
const CLOSE_COLUMN : &str = "Close";

/// Reads price history from CSV files with day-first `Date` and `Close`
/// columns, and writes forecasts as `Date,Predicted_Close`.
pub struct CsvStorage{}

impl CsvStorage {
    pub fn create() -> anyhow::Result<CsvStorage> {
        Ok(CsvStorage{})
    }
}

impl forecast_lib::Storage for CsvStorage {
    fn load_price_history(&mut self, name : &str) -> anyhow::Result<Vec<HistoricalRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(name)
            .with_context(|| format!("Could not open {}", name))?;

        let headers = reader.headers()
            .map_err(|e| ForecastError::DataParse(format!("Unreadable header: {}", e)))?
            .clone();
        let date_index = column_index(&headers, DATE_COLUMN)?;
        let close_index = column_index(&headers, CLOSE_COLUMN)?;

        let mut history = Vec::new();
        for (i, result) in reader.records().enumerate() {
            // Header is line 1.
            let line = i + 2;
            let record = result.map_err(|e| ForecastError::DataParse(format!("Line {}: {}", line, e)))?;

            let date_text = record.get(date_index).unwrap_or("");
            let date = utils::parse_day_first(date_text)
                .map_err(|e| match e {
                    ForecastError::DataParse(message) => ForecastError::DataParse(format!("Line {}: {}", line, message)),
                    other => other
                })?;

            let close_text = record.get(close_index).unwrap_or("");
            let close = close_text.parse::<f64>()
                .map_err(|_| ForecastError::DataParse(format!("Line {}: '{}' is not a price", line, close_text)))?;

            history.push(HistoricalRecord { date, close });
        }

        Ok(history)
    }

    fn save_forecast(&mut self, name : &str, forecast : &Vec<ForecastRecord>) -> anyhow::Result<()> {
        if let Some(parent) = std::path::Path::new(name).parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut writer = csv::Writer::from_path(name)?;
        for record in forecast {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn column_index(headers : &csv::StringRecord, column : &str) -> Result<usize, ForecastError> {
    headers.iter()
        .position(|h| h.trim_start_matches('\u{feff}') == column)
        .ok_or_else(|| ForecastError::DataParse(format!("Missing '{}' column", column)))
}
