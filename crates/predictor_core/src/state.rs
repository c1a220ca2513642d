//! View state and the reducer that drives it.
//!
//! The GUI never mutates [`UiState`] directly; every change goes through
//! [`reduce`], which keeps the upload/predict flow testable without a window.

use crate::error::GENERIC_ERROR_MESSAGE;
use crate::model::{PredictionResult, SelectedFile, UploadReference};

/// Everything the screen is drawn from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    pub selected_file: Option<SelectedFile>,
    pub results: Option<Vec<PredictionResult>>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    /// File the running pipeline was started for.
    pub submitted_file: Option<SelectedFile>,
}

impl UiState {
    /// Whether the submit control should accept a click.
    pub fn can_submit(&self) -> bool {
        !self.is_loading && self.selected_file.is_some()
    }

    /// Nothing selected, nothing shown: the screen shows its prompt.
    pub fn is_idle(&self) -> bool {
        self.selected_file.is_none()
            && self.results.is_none()
            && !self.is_loading
            && self.error_message.is_none()
    }

    // A file picked after submitting must not receive the older run's outcome.
    fn selection_changed_since_submit(&self) -> bool {
        self.submitted_file != self.selected_file
    }
}

/// User actions and pipeline milestones.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    FileSelected(SelectedFile),
    SubmitRequested,
    UploadSucceeded(UploadReference),
    UploadFailed(String),
    PredictSucceeded(Vec<PredictionResult>),
    PredictFailed(String),
}

impl Event {
    /// True for the events that end a pipeline run.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Event::UploadFailed(_) | Event::PredictFailed(_) | Event::PredictSucceeded(_)
        )
    }
}

pub fn reduce(state: &UiState, event: Event) -> UiState {
    match event {
        Event::FileSelected(file) => UiState {
            selected_file: Some(file),
            results: None,
            error_message: None,
            ..state.clone()
        },
        Event::SubmitRequested => {
            if !state.can_submit() {
                return state.clone();
            }
            UiState {
                is_loading: true,
                results: None,
                error_message: None,
                submitted_file: state.selected_file.clone(),
                ..state.clone()
            }
        }
        // The reference goes straight to the predict stage.
        Event::UploadSucceeded(_) => state.clone(),
        Event::UploadFailed(_) | Event::PredictFailed(_) => UiState {
            is_loading: false,
            results: None,
            error_message: (!state.selection_changed_since_submit())
                .then(|| GENERIC_ERROR_MESSAGE.to_string()),
            submitted_file: None,
            ..state.clone()
        },
        Event::PredictSucceeded(results) => UiState {
            is_loading: false,
            results: (!state.selection_changed_since_submit()).then_some(results),
            error_message: None,
            submitted_file: None,
            ..state.clone()
        },
    }
}
