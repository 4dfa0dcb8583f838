use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{ForecastError, Location};

use super::{Geocoder, get_json};

#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoder {
    http: Client,
    url: String,
    language: String,
}

impl OpenMeteoGeocoder {
    pub fn new(http: Client, url: &str, language: &str) -> Self {
        Self { http, url: url.to_string(), language: language.to_string() }
    }
}

#[derive(Debug, Deserialize)]
struct GeoResult {
    latitude: f64,
    longitude: f64,
    name: Option<String>,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    // Absent entirely when nothing matches.
    #[serde(default)]
    results: Vec<GeoResult>,
}

#[async_trait]
impl Geocoder for OpenMeteoGeocoder {
    async fn resolve(&self, city: &str) -> Result<Location, ForecastError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(ForecastError::EmptyQuery);
        }

        tracing::debug!(city, language = %self.language, "geocoding");

        let request = self.http.get(&self.url).query(&[
            ("name", city),
            ("count", "1"),
            ("language", self.language.as_str()),
            ("format", "json"),
        ]);

        let parsed: GeoResponse = get_json(request, "geocoding").await?;

        let first = parsed
            .results
            .into_iter()
            .next()
            .ok_or_else(|| ForecastError::LocationNotFound(city.to_string()))?;

        check_coordinates(first.latitude, first.longitude)?;

        Ok(Location {
            latitude: first.latitude,
            longitude: first.longitude,
            name: first.name,
            country: first.country,
        })
    }
}

fn check_coordinates(latitude: f64, longitude: f64) -> Result<(), ForecastError> {
    let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
    let lon_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);

    if lat_ok && lon_ok {
        Ok(())
    } else {
        Err(ForecastError::Parse(format!(
            "geocoding returned invalid coordinates ({latitude}, {longitude})"
        )))
    }
}
