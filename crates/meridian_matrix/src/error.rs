use jiff::Timestamp;
use thiserror::Error;

use crate::matrix_request::TravelMode;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },
}

#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("Unresolved location: {0}")]
    UnresolvedLocation(String),

    #[error("The number of origins and destinations provided would result in a matrix that has {pairs} cells, the maximum is {max}")]
    MatrixTooLarge { pairs: usize, max: usize },

    #[error("The number of origins and destinations provided would result in a histogram matrix that has {pairs} cells, the maximum is {max}")]
    HistogramMatrixTooLarge { pairs: usize, max: usize },

    #[error("A start time can only be specified with the driving travel mode, got {0}")]
    IncompatibleTravelMode(TravelMode),

    #[error("An end time was specified without a start time")]
    MissingStartTime,

    #[error("The time span between start and end time is {hours:.2} hours, the maximum is 24 hours")]
    TimeSpanTooLarge { hours: f64 },

    #[error("The end time {end} is before the start time {start}")]
    EndBeforeStart { start: Timestamp, end: Timestamp },

    #[error("Invalid resolution {0}, expected a value between 1 and 4")]
    InvalidResolution(u8),

    #[error("Service error: {0}")]
    ServiceReported(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Deserialization error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Unable to geocode '{address}': {message}")]
    Geocoding { address: String, message: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Matrix request was cancelled")]
    Cancelled,
}

impl MatrixError {
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            MatrixError::UnresolvedLocation(_)
                | MatrixError::MatrixTooLarge { .. }
                | MatrixError::HistogramMatrixTooLarge { .. }
                | MatrixError::IncompatibleTravelMode(_)
                | MatrixError::MissingStartTime
                | MatrixError::TimeSpanTooLarge { .. }
                | MatrixError::EndBeforeStart { .. }
                | MatrixError::InvalidResolution(_)
        )
    }
}
