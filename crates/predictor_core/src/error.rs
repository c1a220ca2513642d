use reqwest::StatusCode;
use thiserror::Error;

/// Message shown for any failure of the upload/predict chain.
pub const GENERIC_ERROR_MESSAGE: &str =
    "An error occurred during prediction. Please check the console for details.";

/// Reasons a submit request is refused before anything is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("Please select an image file.")]
    NoFileSelected,
    #[error("a prediction request is already in flight")]
    InFlight,
}

/// Failure of a single call to the prediction server.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{endpoint} answered with status {status}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
    },
    #[error("{endpoint} returned a body that could not be parsed")]
    MalformedBody {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("upload response has no `images` field")]
    MissingImages,
}
