//! Upload-then-predict client logic for the car type predictor.
//!
//! Everything here is independent of the GUI: the front end feeds user
//! actions into a [`Session`] and draws whatever [`view::render`] returns.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod session;
pub mod state;
pub mod view;

pub use client::{HttpClient, PredictionService};
pub use config::ServerConfig;
pub use error::{ClientError, GENERIC_ERROR_MESSAGE, SubmitError};
pub use model::{Prediction, PredictionResult, SelectedFile, UploadReference};
pub use pipeline::Outcome;
pub use session::Session;
pub use state::{Event, UiState, reduce};
pub use view::View;
