use thiserror::Error;

/// Every way a forecast lookup can fail. All of them end the run.
#[derive(Debug, Error)]
pub enum WeathrError {
    /// Missing credential or an unusable settings file.
    #[error("{0}")]
    Configuration(String),

    /// A flag or settings value outside its accepted set.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Transport failure or non-success HTTP status.
    #[error("Error fetching data from Open Weather Map API: {0}")]
    Fetch(String),

    /// Body is not JSON, or not the forecast shape we expect.
    #[error("Error parsing data: {0}")]
    Parse(String),
}

pub type Result<T, E = WeathrError> = std::result::Result<T, E>;

impl From<serde_json::Error> for WeathrError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
