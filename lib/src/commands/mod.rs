pub mod forecast_prices;
pub mod session;
