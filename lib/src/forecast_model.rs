#[cfg(test)]
use mockall::{automock};

/// A pre-trained forecaster, consulted for the next `steps` values of the
/// series it was fitted on. Values are returned in forecast order.
#[cfg_attr(test, automock)]
pub trait ForecastModel {
    fn name(&self) -> String;
    fn forecast(&mut self, steps : u32) -> anyhow::Result<Vec<f64>>;
}
