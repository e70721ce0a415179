use chrono::NaiveDate;
use getset::{CopyGetters, Getters, Setters};
use anyhow::Context;
use log::{info, warn};

use crate::prices::*;
use crate::forecast_model::*;
use crate::storage::*;
use crate::plotter::*;
use crate::error::ForecastError;
use crate::{alignment, forecast_window, utils};

/// Chart titles, chart directory and export target for a render cycle.
#[derive(Debug, Clone, Getters, Setters)]
#[getset(get = "pub", set = "pub")]
pub struct RenderOptions {
    symbol : String,
    output_dir : String,
    export_name : Option<String>
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions { symbol : String::from("Apple"), output_dir : String::from("charts"),
            export_name : Some(String::from("forecast.csv")) }
    }
}

/// Outcome of one render cycle. `forecast` is empty when no model was loaded.
#[derive(Debug, Clone, PartialEq, Getters, CopyGetters)]
pub struct ForecastReport {
    #[getset(get_copy = "pub")]
    horizon : Horizon,
    #[getset(get_copy = "pub")]
    last_date : NaiveDate,
    #[getset(get = "pub")]
    forecast : Vec<ForecastRecord>,
    #[getset(get_copy = "pub")]
    degraded : bool
}

impl ForecastReport {
    pub fn new(horizon : Horizon, last_date : NaiveDate, forecast : Vec<ForecastRecord>, degraded : bool) -> ForecastReport {
        ForecastReport { horizon, last_date, forecast, degraded }
    }
}

/// Runs one full render cycle over already prepared `history`.
///
/// The forecast is built and aligned before anything is drawn, so a failure
/// leaves no charts or export behind. Without a model only the historical
/// chart is produced.
pub fn forecast_prices(model : Option<&mut dyn ForecastModel>,
                       plotter : &mut impl Plotter,
                       storage : &mut impl Storage,
                       history : &[HistoricalRecord],
                       horizon : Horizon,
                       options : &RenderOptions) -> anyhow::Result<ForecastReport> {
    let last_date = utils::last_date(history)
        .ok_or_else(|| ForecastError::DataParse(String::from("Price history is empty")))?;
    let degraded = model.is_none();

    let forecast = forecast_window::build_forecast_window(last_date, horizon.days(), model)?;
    let combined = alignment::combine(history, &forecast)?;

    plotter.plot_lines(&vec!(DatedSeries::from_history("Historical Close", history)), None,
                       &format!("Historical {} Stock Prices", options.symbol), "Close Price ($)",
                       &chart_filename(options, ChartKind::Historical))
        .context("Failed to plot historical prices")?;

    let view = match combined {
        Some(view) => view,
        None => {
            warn!("Forecasting is disabled, only historical prices up to {} were plotted", last_date);
            return Ok(ForecastReport::new(horizon, last_date, forecast, degraded));
        }
    };

    if view.has_predictions() {
        plotter.plot_lines(&vec!(DatedSeries::from_forecast("Forecasted Close", view.forecast)), None,
                           &format!("Forecasted {} Stock Prices", options.symbol), "Predicted Price ($)",
                           &chart_filename(options, ChartKind::Forecast))
            .context("Failed to plot forecast")?;
        plotter.plot_lines(&view.to_series("Historical Close", "Forecasted Close"), Some(view.boundary),
                           &format!("{} Stock Prices and {} Day Forecast", options.symbol, horizon), "Close Price ($)",
                           &chart_filename(options, ChartKind::Combined))
            .context("Failed to plot combined prices")?;
    }
    else {
        warn!("The model gave no usable values for the next {} days, skipping the forecast charts", horizon);
    }

    if let Some(export_name) = &options.export_name {
        storage.save_forecast(export_name, &forecast)
            .with_context(|| format!("Failed to export forecast to {}", export_name))?;
        info!("Exported {} forecast days to {}", forecast.len(), export_name);
    }

    Ok(ForecastReport::new(horizon, last_date, forecast, degraded))
}

fn chart_filename(options : &RenderOptions, chart : ChartKind) -> String {
    format!("{}/{}", options.output_dir, chart.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::tests::*;
    use mockall::{Sequence, predicate::*};
    use anyhow::anyhow;

    fn expect_chart(plotter : &mut MockPlotter, seq : &mut Sequence, filename : &'static str, marker : Option<NaiveDate>) {
        plotter.expect_plot_lines()
            .withf(move |_, m, _, _, f| f == filename && *m == marker)
            .times(1)
            .in_sequence(seq)
            .returning(|_, _, _, _, _| Ok(()));
    }

    fn model_returning(values : Vec<f64>) -> MockForecastModel {
        let mut model = MockForecastModel::new();
        model.expect_name().returning(|| String::from("ARIMA(2,1,2)"));
        model.expect_forecast()
            .with(eq(values.len() as u32))
            .times(1)
            .return_once(move |_| Ok(values));
        model
    }

    #[test]
    fn render_all_charts_then_export() -> anyhow::Result<()> {
        let history = build_history(ymd(2024, 1, 31), 10);
        let mut model = model_returning(vec!(150.0, 151.2, 149.8));
        let mut plotter = MockPlotter::new();
        let mut storage = MockStorage::new();

        let mut seq = Sequence::new();
        expect_chart(&mut plotter, &mut seq, "charts/historical", None);
        expect_chart(&mut plotter, &mut seq, "charts/forecast", None);
        expect_chart(&mut plotter, &mut seq, "charts/combined", Some(ymd(2024, 1, 31)));

        let expected_export = vec!(
            ForecastRecord { date : ymd(2024, 2, 1), predicted_close : Some(150.0) },
            ForecastRecord { date : ymd(2024, 2, 2), predicted_close : Some(151.2) },
            ForecastRecord { date : ymd(2024, 2, 3), predicted_close : Some(149.8) });
        storage.expect_save_forecast()
            .with(eq("forecast.csv"), eq(expected_export.clone()))
            .times(1)
            .in_sequence(&mut seq)
            .return_once(|_, _| Ok(()));

        let report = forecast_prices(Some(&mut model), &mut plotter, &mut storage, &history,
                                     Horizon::new(3)?, &RenderOptions::default())?;

        assert_eq!(report.forecast(), &expected_export);
        assert_eq!(report.last_date(), ymd(2024, 1, 31));
        assert_eq!(report.horizon().days(), 3);
        assert!(!report.degraded());
        Ok(())
    }

    #[test]
    fn combined_chart_holds_history_and_forecast() -> anyhow::Result<()> {
        let history = build_history(ymd(2024, 1, 31), 2);
        let mut model = model_returning(vec!(150.0));
        let mut plotter = MockPlotter::new();
        let mut storage = MockStorage::new();

        plotter.expect_plot_lines()
            .withf(|_, _, _, _, f| f != "charts/combined")
            .times(2)
            .returning(|_, _, _, _, _| Ok(()));
        plotter.expect_plot_lines()
            .withf(|series, _, title, _, f| f == "charts/combined" &&
                title == "Apple Stock Prices and 1 Day Forecast" &&
                series == &vec!(
                    DatedSeries { label : String::from("Historical Close"),
                        points : vec!((ymd(2024, 1, 30), 100.0), (ymd(2024, 1, 31), 101.0)) },
                    DatedSeries { label : String::from("Forecasted Close"),
                        points : vec!((ymd(2024, 2, 1), 150.0)) }))
            .times(1)
            .returning(|_, _, _, _, _| Ok(()));
        storage.expect_save_forecast().times(1).returning(|_, _| Ok(()));

        forecast_prices(Some(&mut model), &mut plotter, &mut storage, &history,
                        Horizon::new(1)?, &RenderOptions::default())?;
        Ok(())
    }

    #[test]
    fn missing_model_only_plots_history() -> anyhow::Result<()> {
        let history = build_history(ymd(2024, 1, 31), 10);
        let mut plotter = MockPlotter::new();
        let mut storage = MockStorage::new();

        plotter.expect_plot_lines()
            .withf(|_, _, title, _, f| f == "charts/historical" && title == "Historical Apple Stock Prices")
            .times(1)
            .returning(|_, _, _, _, _| Ok(()));
        storage.expect_save_forecast().times(0);

        let report = forecast_prices(None, &mut plotter, &mut storage, &history,
                                     Horizon::new(30)?, &RenderOptions::default())?;

        assert!(report.forecast().is_empty());
        assert!(report.degraded());
        Ok(())
    }

    #[test]
    fn skip_export_when_disabled() -> anyhow::Result<()> {
        let history = build_history(ymd(2024, 1, 31), 10);
        let mut model = model_returning(vec!(1.0, 2.0));
        let mut plotter = MockPlotter::new();
        let mut storage = MockStorage::new();

        plotter.expect_plot_lines().times(3).returning(|_, _, _, _, _| Ok(()));
        storage.expect_save_forecast().times(0);

        let mut options = RenderOptions::default();
        options.set_export_name(None).set_output_dir(String::from("out"));
        assert_eq!(options.output_dir(), "out");
        forecast_prices(Some(&mut model), &mut plotter, &mut storage, &history, Horizon::new(2)?, &options)?;
        Ok(())
    }

    #[test]
    fn unusable_predictions_skip_forecast_charts_but_export() -> anyhow::Result<()> {
        let history = build_history(ymd(2024, 1, 31), 10);
        let mut model = model_returning(vec!(f64::NAN));
        let mut plotter = MockPlotter::new();
        let mut storage = MockStorage::new();

        plotter.expect_plot_lines()
            .withf(|series, _, _, _, f| f == "charts/historical" && series.iter().all(|s| !s.points.is_empty()))
            .times(1)
            .returning(|_, _, _, _, _| Ok(()));
        storage.expect_save_forecast()
            .with(eq("forecast.csv"), eq(vec!(ForecastRecord { date : ymd(2024, 2, 1), predicted_close : None })))
            .times(1)
            .return_once(|_, _| Ok(()));

        let report = forecast_prices(Some(&mut model), &mut plotter, &mut storage, &history,
                                     Horizon::new(1)?, &RenderOptions::default())?;

        assert_eq!(report.forecast().len(), 1);
        assert!(!report.degraded());
        Ok(())
    }

    #[test]
    fn partly_missing_predictions_still_draw_every_chart() -> anyhow::Result<()> {
        let history = build_history(ymd(2024, 1, 31), 10);
        let mut model = model_returning(vec!(150.0, f64::INFINITY));
        let mut plotter = MockPlotter::new();
        let mut storage = MockStorage::new();

        plotter.expect_plot_lines()
            .withf(|series, _, _, _, _| series.iter().all(|s| !s.points.is_empty()))
            .times(3)
            .returning(|_, _, _, _, _| Ok(()));
        storage.expect_save_forecast().times(1).returning(|_, _| Ok(()));

        forecast_prices(Some(&mut model), &mut plotter, &mut storage, &history,
                        Horizon::new(2)?, &RenderOptions::default())?;
        Ok(())
    }

    #[test]
    fn model_failure_leaves_no_charts() {
        let history = build_history(ymd(2024, 1, 31), 10);
        let mut model = MockForecastModel::new();
        model.expect_name().returning(|| String::from("ARIMA(2,1,2)"));
        model.expect_forecast().times(1).return_once(|_| Err(anyhow!("Failed")));
        let mut plotter = MockPlotter::new();
        plotter.expect_plot_lines().times(0);
        let mut storage = MockStorage::new();
        storage.expect_save_forecast().times(0);

        let result = forecast_prices(Some(&mut model), &mut plotter, &mut storage, &history,
                                     Horizon::default(), &RenderOptions::default());

        assert!(result.is_err());
    }

    #[test]
    fn short_model_output_leaves_no_charts() {
        let history = build_history(ymd(2024, 1, 31), 10);
        let mut model = MockForecastModel::new();
        model.expect_name().returning(|| String::from("ARIMA(2,1,2)"));
        model.expect_forecast().times(1).return_once(|_| Ok(vec!(1.0)));
        let mut plotter = MockPlotter::new();
        plotter.expect_plot_lines().times(0);
        let mut storage = MockStorage::new();

        let error = forecast_prices(Some(&mut model), &mut plotter, &mut storage, &history,
                                    Horizon::default(), &RenderOptions::default()).unwrap_err();

        assert!(matches!(error.downcast_ref::<ForecastError>(), Some(ForecastError::ContractViolation(_))));
    }

    #[test]
    fn plotting_failure_stops_before_export() {
        let history = build_history(ymd(2024, 1, 31), 10);
        let mut model = model_returning(vec!(1.0));
        let mut plotter = MockPlotter::new();
        plotter.expect_plot_lines().times(1).returning(|_, _, _, _, _| Err(anyhow!("Disk full")));
        let mut storage = MockStorage::new();
        storage.expect_save_forecast().times(0);

        let result = forecast_prices(Some(&mut model), &mut plotter, &mut storage, &history,
                                     Horizon::new(1).unwrap(), &RenderOptions::default());

        assert!(result.is_err());
    }

    #[test]
    fn empty_history_is_rejected() {
        let mut plotter = MockPlotter::new();
        let mut storage = MockStorage::new();

        let result = forecast_prices(None, &mut plotter, &mut storage, &[],
                                     Horizon::default(), &RenderOptions::default());

        assert!(result.is_err());
    }
}
