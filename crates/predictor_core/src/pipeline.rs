use crate::client::PredictionService;
use crate::model::{PredictionResult, SelectedFile};
use crate::state::Event;

/// How a pipeline run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(Vec<PredictionResult>),
    Failure(String),
}

/// Upload `file`, then ask for predictions on the returned reference.
///
/// Each milestone is passed to `emit` as it happens and exactly one terminal
/// event is emitted. The second call only starts once the first has finished.
pub fn run<S, F>(service: &S, file: &SelectedFile, mut emit: F) -> Outcome
where
    S: PredictionService + ?Sized,
    F: FnMut(Event),
{
    let reference = match service.upload(file) {
        Ok(reference) => reference,
        Err(err) => {
            tracing::error!("Upload of {} failed: {err}", file.file_name);
            let reason = err.to_string();
            emit(Event::UploadFailed(reason.clone()));
            return Outcome::Failure(reason);
        }
    };
    tracing::debug!("Upload of {} stored as {}", file.file_name, reference.0);
    emit(Event::UploadSucceeded(reference.clone()));

    match service.predict(&reference) {
        Ok(results) => {
            tracing::info!("Received {} prediction result(s)", results.len());
            emit(Event::PredictSucceeded(results.clone()));
            Outcome::Success(results)
        }
        Err(err) => {
            tracing::error!("Prediction for {} failed: {err}", file.file_name);
            let reason = err.to_string();
            emit(Event::PredictFailed(reason.clone()));
            Outcome::Failure(reason)
        }
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use crate::client::PredictionService;
    use crate::error::ClientError;
    use crate::model::{PredictionResult, SelectedFile, UploadReference};
    use reqwest::StatusCode;
    use std::sync::Mutex;

    /// Canned server that records what it was asked.
    pub struct FakeService {
        pub upload: Result<serde_json::Value, StatusCode>,
        pub predict: Result<Vec<PredictionResult>, StatusCode>,
        pub uploads: Mutex<Vec<String>>,
        pub predicts: Mutex<Vec<UploadReference>>,
    }

    impl FakeService {
        pub fn new(
            upload: Result<serde_json::Value, StatusCode>,
            predict: Result<Vec<PredictionResult>, StatusCode>,
        ) -> Self {
            Self {
                upload,
                predict,
                uploads: Mutex::new(Vec::new()),
                predicts: Mutex::new(Vec::new()),
            }
        }
    }

    impl PredictionService for FakeService {
        fn upload(&self, file: &SelectedFile) -> Result<UploadReference, ClientError> {
            self.uploads.lock().unwrap().push(file.file_name.clone());
            self.upload
                .clone()
                .map(UploadReference)
                .map_err(|status| ClientError::Status {
                    endpoint: "upload",
                    status,
                })
        }

        fn predict(
            &self,
            images: &UploadReference,
        ) -> Result<Vec<PredictionResult>, ClientError> {
            self.predicts.lock().unwrap().push(images.clone());
            self.predict.clone().map_err(|status| ClientError::Status {
                endpoint: "predict",
                status,
            })
        }

        fn fetch_image(&self, _path: &str) -> Result<Vec<u8>, ClientError> {
            Err(ClientError::Status {
                endpoint: "uploads",
                status: StatusCode::NOT_FOUND,
            })
        }
    }
}
