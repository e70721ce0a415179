mod error;
mod prices;
mod forecast_model;
mod storage;
mod plotter;
mod forecast_window;
mod alignment;
pub mod utils;
pub mod commands;

pub use error::*;
pub use prices::*;
pub use forecast_model::*;
pub use storage::*;
pub use plotter::*;
pub use forecast_window::*;
pub use alignment::*;
