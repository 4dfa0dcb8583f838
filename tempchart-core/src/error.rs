use reqwest::StatusCode;

/// Everything that can go wrong between "search" and "chart on disk".
///
/// The front-end collapses all of these into one error state; the variant
/// only ends up in the log.
#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    #[error("Empty location query")]
    EmptyQuery,

    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Forecast has {times} timestamps but {temperatures} temperatures")]
    SeriesMismatch { times: usize, temperatures: usize },

    #[error("Render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ForecastError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::LocationNotFound(_))
    }
}
