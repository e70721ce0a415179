use anyhow::Context;
use log::info;

use crate::prices::*;
use crate::forecast_model::*;
use crate::storage::*;
use crate::plotter::*;
use crate::utils;
use crate::commands::forecast_prices::*;

/// Everything one viewer session works with. The price history is loaded once
/// and every `render` recomputes the forecast for a new horizon against it.
pub struct ForecastSession<M : ForecastModel, P : Plotter, S : Storage> {
    model : Option<M>,
    plotter : P,
    storage : S,
    history : Vec<HistoricalRecord>,
    options : RenderOptions
}

impl<M : ForecastModel, P : Plotter, S : Storage> ForecastSession<M, P, S> {
    pub fn open(model : Option<M>,
                plotter : P,
                mut storage : S,
                data_name : &str,
                options : RenderOptions) -> anyhow::Result<ForecastSession<M, P, S>> {
        let history = storage.load_price_history(data_name)
            .with_context(|| format!("Failed to load price history from {}", data_name))?;
        let history = utils::prepare_history(history)
            .with_context(|| format!("Invalid price history in {}", data_name))?;
        info!("Loaded {} closing prices from {}", history.len(), data_name);

        Ok(ForecastSession { model, plotter, storage, history, options })
    }

    pub fn render(&mut self, horizon : Horizon) -> anyhow::Result<ForecastReport> {
        let model = match self.model.as_mut() {
            Some(model) => Some(model as &mut dyn ForecastModel),
            None => None
        };

        forecast_prices(model, &mut self.plotter, &mut self.storage, &self.history, horizon, &self.options)
    }

    pub fn is_degraded(&self) -> bool {
        self.model.is_none()
    }

    pub fn history(&self) -> &[HistoricalRecord] {
        &self.history
    }
}
