use std::path::PathBuf;
use anyhow::{anyhow, Context};
use log::info;
use forecast_lib::ForecastError;

use crate::arima_model::{ArimaModel, ArimaParams};

#[derive(Debug, PartialEq)]
pub enum ModelSource {
    Path(PathBuf),
    Url(url::Url)
}

impl ModelSource {
    /// Anything that is not an http(s) URL is treated as a local path.
    pub fn parse(text : &str) -> ModelSource {
        match url::Url::parse(text) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => ModelSource::Url(url),
            _ => ModelSource::Path(PathBuf::from(text))
        }
    }
}

impl std::fmt::Display for ModelSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        match self {
            ModelSource::Path(path) => write!(f, "{}", path.display()),
            ModelSource::Url(url) => write!(f, "{}", url)
        }
    }
}

/// Reads a JSON parameter file and builds the model it describes. Every
/// failure, whether IO, network or a malformed file, is a `ModelLoad` error.
pub fn load_model(source : &ModelSource) -> Result<ArimaModel, ForecastError> {
    read_params(source)
        .map_err(|error| ForecastError::ModelLoad(format!("{:#}", error)))
        .and_then(ArimaModel::from_params)
}

fn read_params(source : &ModelSource) -> anyhow::Result<ArimaParams> {
    let bytes = match source {
        ModelSource::Path(path) => std::fs::read(path)
            .with_context(|| format!("Could not read {}", path.display()))?,
        ModelSource::Url(url) => http_get_bytes(url)
            .with_context(|| format!("Could not download {}", url))?
    };

    let params = serde_json::from_slice(&bytes)
        .with_context(|| format!("{} is not a valid model parameter file", source))?;
    info!("Read model parameters from {}", source);
    Ok(params)
}

fn http_get_bytes(url : &url::Url) -> anyhow::Result<Vec<u8>> {
    let client = reqwest::blocking::Client::new();
    let response = client
        .get(url.clone())
        .header("Accept", "application/json")
        .header("User-Agent", "forecast-viewer")
        .send()?;

    if response.status() != reqwest::StatusCode::OK {
        return Err(anyhow!("Erroneous HTTP status returned: {}", response.status()));
    }

    Ok(response.bytes()?.to_vec())
}
