use chrono::NaiveDate;

use crate::prices::*;
use crate::error::ForecastError;

// `%y` must come before `%Y`, the four digit pattern also accepts "24".
const DAY_FIRST_FORMATS : [&str; 6] = ["%d/%m/%y", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y-%m-%d", "%Y/%m/%d"];

/// Parses a date written day-first (`31/01/2024`), falling back to ISO
/// year-first dates. A trailing time of day is ignored.
pub fn parse_day_first(text : &str) -> Result<NaiveDate, ForecastError> {
    let date_part = text.trim().split(|c : char| c == ' ' || c == 'T').next().unwrap_or("");

    for format in DAY_FIRST_FORMATS.iter() {
        if let Ok(date) = NaiveDate::parse_from_str(date_part, format) {
            return Ok(date);
        }
    }

    Err(ForecastError::DataParse(format!("Unrecognised date '{}'", text.trim())))
}

/// Sorts the history by date and rejects series that are empty or list the
/// same date twice.
pub fn prepare_history(mut history : Vec<HistoricalRecord>) -> Result<Vec<HistoricalRecord>, ForecastError> {
    if history.is_empty() {
        return Err(ForecastError::DataParse(String::from("Price history is empty")));
    }

    history.sort_by_key(|r| r.date);
    if let Some(pair) = history.windows(2).find(|pair| pair[0].date == pair[1].date) {
        return Err(ForecastError::DataParse(format!("Date {} appears more than once", pair[0].date)));
    }

    Ok(history)
}

pub fn last_date(history : &[HistoricalRecord]) -> Option<NaiveDate> {
    history.iter().map(|r| r.date).max()
}
