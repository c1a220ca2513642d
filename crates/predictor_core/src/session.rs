//! Drives [`UiState`] from user actions and a background pipeline thread.

use crate::client::PredictionService;
use crate::error::SubmitError;
use crate::model::SelectedFile;
use crate::pipeline;
use crate::state::{Event, UiState, reduce};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};

type Waker = Arc<dyn Fn() + Send + Sync>;

/// Owner of the view state.
///
/// Only the thread holding the session changes the state. The pipeline
/// thread reports back over a channel that [`Session::poll`] drains.
#[derive(Default)]
pub struct Session {
    state: UiState,
    inbox: Option<Receiver<Event>>,
    waker: Option<Waker>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `waker` whenever the pipeline thread has something new.
    pub fn with_waker(waker: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            waker: Some(Arc::new(waker)),
            ..Self::default()
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn is_in_flight(&self) -> bool {
        self.inbox.is_some()
    }

    pub fn select_file(&mut self, file: SelectedFile) {
        tracing::debug!("Selected {}", file.path.display());
        self.apply(Event::FileSelected(file));
    }

    /// Start the upload/predict pipeline for the selected file.
    ///
    /// Refused without touching the state when no file is selected or a
    /// previous run has not finished yet.
    pub fn submit(&mut self, service: Arc<dyn PredictionService>) -> Result<(), SubmitError> {
        let Some(file) = self.state.selected_file.clone() else {
            tracing::warn!("Submit ignored: no file selected");
            return Err(SubmitError::NoFileSelected);
        };
        if self.is_in_flight() || self.state.is_loading {
            tracing::warn!("Submit ignored: a request is already running");
            return Err(SubmitError::InFlight);
        }

        tracing::info!("Submitting {} for prediction", file.file_name);
        self.apply(Event::SubmitRequested);

        let (tx, rx) = mpsc::channel();
        let waker = self.waker.clone();
        let spawned = std::thread::Builder::new()
            .name("predict-pipeline".into())
            .spawn(move || {
                pipeline::run(service.as_ref(), &file, |event| {
                    // The session may be gone already; nothing left to tell.
                    let _ = tx.send(event);
                    if let Some(wake) = &waker {
                        wake();
                    }
                });
            });

        match spawned {
            Ok(_) => self.inbox = Some(rx),
            Err(e) => {
                tracing::error!("Could not start prediction thread: {e}");
                self.apply(Event::UploadFailed(e.to_string()));
            }
        }
        Ok(())
    }

    /// Apply whatever the pipeline has reported so far. Returns true if the
    /// state changed.
    pub fn poll(&mut self) -> bool {
        let Some(rx) = self.inbox.take() else {
            return false;
        };
        let mut changed = false;
        loop {
            match rx.try_recv() {
                Ok(event) => {
                    changed = true;
                    if self.apply_pipeline_event(event) {
                        return true;
                    }
                }
                Err(TryRecvError::Empty) => {
                    self.inbox = Some(rx);
                    return changed;
                }
                Err(TryRecvError::Disconnected) => {
                    self.pipeline_vanished();
                    return true;
                }
            }
        }
    }

    /// Block until the running pipeline has finished and its result is applied.
    pub fn settle(&mut self) {
        let Some(rx) = self.inbox.take() else {
            return;
        };
        loop {
            match rx.recv() {
                Ok(event) => {
                    if self.apply_pipeline_event(event) {
                        return;
                    }
                }
                Err(_) => {
                    self.pipeline_vanished();
                    return;
                }
            }
        }
    }

    fn apply_pipeline_event(&mut self, event: Event) -> bool {
        let terminal = event.is_terminal();
        self.apply(event);
        terminal
    }

    // Sender dropped without a terminal event, e.g. the thread panicked.
    fn pipeline_vanished(&mut self) {
        tracing::error!("Prediction thread stopped without reporting a result");
        self.apply(Event::PredictFailed("pipeline thread stopped".into()));
    }

    fn apply(&mut self, event: Event) {
        self.state = reduce(&self.state, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GENERIC_ERROR_MESSAGE;
    use crate::model::{Prediction, PredictionResult};
    use crate::pipeline::fake::FakeService;
    use reqwest::StatusCode;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sedan() -> Vec<PredictionResult> {
        vec![PredictionResult {
            path: "imageA.png".into(),
            predictions: vec![Prediction {
                tag_name: "Sedan".into(),
                probability: 87.5,
            }],
            error: None,
        }]
    }

    #[test]
    fn submit_without_file_is_refused_untouched() {
        let mut session = Session::new();
        let service = Arc::new(FakeService::new(Ok(json!([])), Ok(Vec::new())));
        let before = session.state().clone();

        assert_eq!(session.submit(service.clone()), Err(SubmitError::NoFileSelected));
        assert_eq!(session.state(), &before);
        assert!(!session.is_in_flight());
        assert!(service.uploads.lock().unwrap().is_empty());
    }

    #[test]
    fn loading_is_set_on_submit_and_cleared_on_success() {
        let mut session = Session::new();
        session.select_file(SelectedFile::from_path("imageA.png"));
        let service = Arc::new(FakeService::new(Ok(json!(["imageA.png"])), Ok(sedan())));

        session.submit(service).unwrap();
        assert!(session.state().is_loading);

        session.settle();
        assert!(!session.state().is_loading);
        assert!(!session.is_in_flight());
        assert_eq!(session.state().results, Some(sedan()));
        assert_eq!(session.state().error_message, None);
    }

    #[test]
    fn loading_is_cleared_when_predict_fails_after_upload() {
        let mut session = Session::new();
        session.select_file(SelectedFile::from_path("x.png"));
        let service = Arc::new(FakeService::new(
            Ok(json!(["x.png"])),
            Err(StatusCode::INTERNAL_SERVER_ERROR),
        ));

        session.submit(service.clone()).unwrap();
        assert!(session.state().is_loading);
        session.settle();

        assert!(!session.state().is_loading);
        assert_eq!(
            session.state().error_message.as_deref(),
            Some(GENERIC_ERROR_MESSAGE)
        );
        assert_eq!(service.predicts.lock().unwrap().len(), 1);
    }

    #[test]
    fn second_submit_while_in_flight_is_refused() {
        let mut session = Session::new();
        session.select_file(SelectedFile::from_path("a.png"));
        let service = Arc::new(FakeService::new(Ok(json!(["a.png"])), Ok(sedan())));

        session.submit(service.clone()).unwrap();
        assert_eq!(session.submit(service.clone()), Err(SubmitError::InFlight));
        session.settle();
        assert_eq!(service.uploads.lock().unwrap().len(), 1);
    }

    #[test]
    fn poll_eventually_applies_the_result_and_wakes() {
        let wakes = Arc::new(AtomicUsize::new(0));
        let counter = wakes.clone();
        let mut session = Session::with_waker(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        session.select_file(SelectedFile::from_path("imageA.png"));
        let service = Arc::new(FakeService::new(Ok(json!(["imageA.png"])), Ok(sedan())));
        session.submit(service).unwrap();

        while session.is_in_flight() {
            session.poll();
            std::thread::yield_now();
        }
        assert!(!session.poll());
        assert_eq!(session.state().results, Some(sedan()));
        assert!(wakes.load(Ordering::SeqCst) >= 1);
    }

    struct PanickingService;

    impl PredictionService for PanickingService {
        fn upload(
            &self,
            _file: &SelectedFile,
        ) -> Result<crate::model::UploadReference, crate::error::ClientError> {
            panic!("server exploded");
        }

        fn predict(
            &self,
            _images: &crate::model::UploadReference,
        ) -> Result<Vec<PredictionResult>, crate::error::ClientError> {
            unreachable!()
        }

        fn fetch_image(&self, _path: &str) -> Result<Vec<u8>, crate::error::ClientError> {
            unreachable!()
        }
    }

    #[test]
    fn vanished_pipeline_still_releases_loading() {
        let mut session = Session::new();
        session.select_file(SelectedFile::from_path("a.png"));
        session.submit(Arc::new(PanickingService)).unwrap();
        session.settle();

        assert!(!session.state().is_loading);
        assert_eq!(
            session.state().error_message.as_deref(),
            Some(GENERIC_ERROR_MESSAGE)
        );
    }
}
