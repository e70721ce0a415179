use crate::prices::*;

#[cfg(test)]
use mockall::{automock};

#[cfg_attr(test, automock)]
pub trait Storage {
    fn load_price_history(&mut self, name : &str) -> anyhow::Result<Vec<HistoricalRecord>>;
    fn save_forecast(&mut self, name : &str, forecast : &Vec<ForecastRecord>) -> anyhow::Result<()>;
}
