use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use reqwest::Client;
use serde::Deserialize;

use crate::{ForecastError, ForecastSeries, Location};

use super::{ForecastSource, get_json};

#[derive(Debug, Clone)]
pub struct OpenMeteoForecast {
    http: Client,
    url: String,
    days: u32,
}

/// Which days the forecast request covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastWindow {
    /// `forecast_days=N`, starting today.
    FromToday(u32),
    /// `start_date` / `end_date`, both inclusive.
    Range { start: NaiveDate, end: NaiveDate },
}

impl ForecastWindow {
    /// A start of `None` or `today` keeps the plain `forecast_days` request.
    pub fn new(start: Option<NaiveDate>, today: NaiveDate, days: u32) -> Self {
        match start {
            Some(start) if start != today => {
                let span = u64::from(days.max(1) - 1);
                let end = start
                    .checked_add_days(chrono::Days::new(span))
                    .unwrap_or(NaiveDate::MAX);
                ForecastWindow::Range { start, end }
            }
            _ => ForecastWindow::FromToday(days),
        }
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            ForecastWindow::FromToday(days) => vec![("forecast_days", days.to_string())],
            ForecastWindow::Range { start, end } => vec![
                ("start_date", start.format("%Y-%m-%d").to_string()),
                ("end_date", end.format("%Y-%m-%d").to_string()),
            ],
        }
    }
}

impl OpenMeteoForecast {
    pub fn new(http: Client, url: &str, days: u32) -> Self {
        Self { http, url: url.to_string(), days }
    }
}

#[derive(Debug, Deserialize)]
struct HourlyBlock {
    time: Vec<String>,
    temperature_2m: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    timezone: Option<String>,
    hourly: HourlyBlock,
}

#[async_trait]
impl ForecastSource for OpenMeteoForecast {
    async fn fetch(
        &self,
        location: &Location,
        start: Option<NaiveDate>,
    ) -> Result<ForecastSeries, ForecastError> {
        let window = ForecastWindow::new(start, Local::now().date_naive(), self.days);

        tracing::debug!(
            latitude = location.latitude,
            longitude = location.longitude,
            ?window,
            "fetching hourly forecast"
        );

        let mut params = vec![
            ("latitude", location.latitude.to_string()),
            ("longitude", location.longitude.to_string()),
            ("hourly", "temperature_2m".to_string()),
            ("timezone", "auto".to_string()),
        ];
        params.extend(window.query());

        let request = self.http.get(&self.url).query(&params);
        let parsed: ForecastResponse = get_json(request, "forecast").await?;

        Ok(ForecastSeries {
            times: parsed.hourly.time,
            temperatures: parsed.hourly.temperature_2m,
            timezone: parsed.timezone,
        })
    }
}
