use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// What the user typed: a place name and an optional start date.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub city: String,
    /// Start of the forecast window; `None` means "today".
    pub start: Option<NaiveDate>,
}

impl SearchQuery {
    pub fn new(city: impl Into<String>) -> Self {
        Self { city: city.into(), start: None }
    }

    pub fn starting(mut self, date: NaiveDate) -> Self {
        self.start = Some(date);
        self
    }

    /// The trimmed city, or `None` when there is nothing to search for.
    pub fn city(&self) -> Option<&str> {
        let city = self.city.trim();
        if city.is_empty() { None } else { Some(city) }
    }
}

/// A geocoded place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub name: Option<String>,
    pub country: Option<String>,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude, name: None, country: None }
    }

    /// "Madrid, España" when both parts are known.
    pub fn display_name(&self) -> Option<String> {
        match (&self.name, &self.country) {
            (Some(name), Some(country)) => Some(format!("{name}, {country}")),
            (Some(name), None) => Some(name.clone()),
            _ => None,
        }
    }
}

/// Hourly temperatures as returned by the forecast endpoint.
///
/// `times` and `temperatures` are parallel; nothing enforces equal length
/// here, chart construction checks it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub times: Vec<String>,
    pub temperatures: Vec<f64>,
    pub timezone: Option<String>,
}

impl ForecastSeries {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}
