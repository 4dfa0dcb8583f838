use crate::{
    Config, ForecastError, ForecastSeries, Location,
    provider::{forecast::OpenMeteoForecast, geocoding::OpenMeteoGeocoder},
};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::fmt::Debug;

pub mod forecast;
pub mod geocoding;

const USER_AGENT: &str = concat!("tempchart/", env!("CARGO_PKG_VERSION"));

/// Turns free text into coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    async fn resolve(&self, city: &str) -> Result<Location, ForecastError>;
}

/// Hourly temperatures for a location.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    /// `start` is the first day of the window; `None` means today.
    async fn fetch(
        &self,
        location: &Location,
        start: Option<NaiveDate>,
    ) -> Result<ForecastSeries, ForecastError>;
}

/// Both Open-Meteo clients, sharing one HTTP client.
pub fn open_meteo_from_config(
    config: &Config,
) -> Result<(Box<dyn Geocoder>, Box<dyn ForecastSource>), ForecastError> {
    let http = http_client(config)?;

    let geocoder = OpenMeteoGeocoder::new(http.clone(), &config.geocoding_url, &config.language);
    let forecast = OpenMeteoForecast::new(http, &config.forecast_url, config.forecast_days);

    Ok((Box::new(geocoder), Box::new(forecast)))
}

pub fn http_client(config: &Config) -> Result<Client, ForecastError> {
    let client = Client::builder().timeout(config.timeout()).user_agent(USER_AGENT).build()?;
    Ok(client)
}

/// Send, check status, parse. Status errors carry a truncated body.
async fn get_json<T: DeserializeOwned>(
    request: RequestBuilder,
    endpoint: &'static str,
) -> Result<T, ForecastError> {
    let res = request.send().await?;

    let status = res.status();
    let body = res.text().await?;

    if !status.is_success() {
        return Err(ForecastError::Status { endpoint, status, body: truncate_body(&body) });
    }

    serde_json::from_str(&body)
        .map_err(|e| ForecastError::Parse(format!("{endpoint} response: {e}")))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
