//! Core library for the `tempchart` tool.
//!
//! This crate defines:
//! - Configuration handling
//! - Open-Meteo geocoding and forecast clients
//! - Threshold coloring and SVG chart rendering
//! - The view-state machine and the search controller tying it together
//!
//! It is used by `tempchart-cli`, but can also be reused by other front-ends.

pub mod chart;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod provider;
pub mod state;

pub use chart::{ChartModel, TempClass, classify};
pub use config::Config;
pub use controller::{ChartSummary, SearchController, SearchOutcome};
pub use error::ForecastError;
pub use model::{ForecastSeries, Location, SearchQuery};
pub use provider::{ForecastSource, Geocoder};
pub use state::{ViewState, Visibility};
