mod arima_model;
mod csv_storage;
mod forecast_table;
mod model_loader;
mod plotters_plotter;

use std::io::{BufRead, Write};
use log::{error, info, warn};
use structopt::StructOpt;
use forecast_lib::{ForecastModel, Horizon};
use forecast_lib::commands::forecast_prices::RenderOptions;
use forecast_lib::commands::session::ForecastSession;

use crate::arima_model::ArimaModel;
use crate::csv_storage::CsvStorage;
use crate::model_loader::ModelSource;
use crate::plotters_plotter::PlottersPlotter;

type ViewerSession = ForecastSession<ArimaModel, PlottersPlotter, CsvStorage>;

#[derive(Debug, StructOpt)]
#[structopt(name = "forecast-viewer", about = "Plots historical closing prices next to a short ARIMA forecast")]
struct Opt {
    /// Model parameter file, as a local path or an http(s) URL
    #[structopt(short, long)]
    model : String,

    /// CSV with day-first `Date` and `Close` columns
    #[structopt(short, long)]
    data : String,

    /// Number of days to forecast (1 to 30)
    #[structopt(long, default_value = "30")]
    days : Horizon,

    /// Directory for the chart images
    #[structopt(short, long, default_value = "charts")]
    output_dir : String,

    /// Where to export the forecast table
    #[structopt(long, default_value = "forecast.csv")]
    export : String,

    /// Skip writing the forecast CSV
    #[structopt(long)]
    no_export : bool,

    /// Name used in chart titles
    #[structopt(long, default_value = "Apple")]
    symbol : String,

    /// Keep the session open and read new horizons from stdin
    #[structopt(short, long)]
    interactive : bool
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opt = Opt::from_args();

    let model = match model_loader::load_model(&ModelSource::parse(&opt.model)) {
        Ok(model) => {
            info!("Loaded {} from {}", model.name(), opt.model);
            Some(model)
        },
        Err(load_error) => {
            warn!("{}", load_error);
            eprintln!("Warning: {}. Forecasting is disabled, only historical prices will be shown.", load_error);
            None
        }
    };

    let mut options = RenderOptions::default();
    options.set_symbol(opt.symbol.clone())
        .set_output_dir(opt.output_dir.clone())
        .set_export_name(if opt.no_export { None } else { Some(opt.export.clone()) });

    let mut session = ViewerSession::open(model, PlottersPlotter::create()?, CsvStorage::create()?, &opt.data, options)?;
    info!("Session ready with {} closing prices{}", session.history().len(),
          if session.is_degraded() { ", forecasting disabled" } else { "" });

    if opt.interactive {
        run_interactive(&mut session, opt.days)
    }
    else {
        let report = session.render(opt.days)?;
        println!("{}", forecast_table::format_report(&report));
        Ok(())
    }
}

fn run_interactive(session : &mut ViewerSession, initial_horizon : Horizon) -> anyhow::Result<()> {
    render_and_print(session, initial_horizon);

    let stdin = std::io::stdin();
    prompt()?;
    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim();
        if input == "q" || input == "quit" {
            break;
        }

        if !input.is_empty() {
            match input.parse::<Horizon>() {
                Ok(horizon) => render_and_print(session, horizon),
                Err(parse_error) => eprintln!("{:#}", parse_error)
            }
        }
        prompt()?;
    }

    Ok(())
}

// A failed render only aborts that horizon, the session stays open.
fn render_and_print(session : &mut ViewerSession, horizon : Horizon) {
    match session.render(horizon) {
        Ok(report) => println!("{}", forecast_table::format_report(&report)),
        Err(render_error) => {
            error!("Forecast for {} days failed: {:#}", horizon, render_error);
            eprintln!("Error: {:#}", render_error);
        }
    }
}

fn prompt() -> anyhow::Result<()> {
    print!("Days to forecast (1-30, q to quit): ");
    std::io::stdout().flush()?;
    Ok(())
}
