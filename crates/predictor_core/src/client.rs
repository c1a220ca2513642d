use crate::config::ServerConfig;
use crate::error::ClientError;
use crate::model::{PredictionResult, SelectedFile, UploadReference};
use reqwest::blocking::{Client, Response, multipart};
use serde::Deserialize;

/// The server calls the client depends on.
///
/// Implemented over HTTP by [`HttpClient`]; tests substitute a fake.
pub trait PredictionService: Send + Sync {
    /// Send the file as multipart field `file` and return the stored reference.
    fn upload(&self, file: &SelectedFile) -> Result<UploadReference, ClientError>;

    /// Ask for predictions on previously uploaded images.
    fn predict(&self, images: &UploadReference) -> Result<Vec<PredictionResult>, ClientError>;

    /// Download the stored image behind a result's `path`.
    fn fetch_image(&self, path: &str) -> Result<Vec<u8>, ClientError>;
}

/// Blocking reqwest client for the upload/predict server.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: Client,
    config: ServerConfig,
}

impl HttpClient {
    pub fn new(config: ServerConfig) -> Result<Self, ClientError> {
        // No request timeout: a silent server keeps the UI in its loading state.
        let http = Client::builder().timeout(None).build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

impl PredictionService for HttpClient {
    fn upload(&self, file: &SelectedFile) -> Result<UploadReference, ClientError> {
        let bytes = std::fs::read(&file.path).map_err(|source| ClientError::Io {
            path: file.path.display().to_string(),
            source,
        })?;
        let part = multipart::Part::bytes(bytes)
            .file_name(file.file_name.clone())
            .mime_str(&file.mime)?;
        let form = multipart::Form::new().part("file", part);

        tracing::debug!("Uploading {} ({})", file.file_name, file.mime);
        let resp = self
            .http
            .post(self.config.upload_url())
            .multipart(form)
            .send()?;
        let body = successful_body("upload", resp)?;
        parse_upload_response(&body)
    }

    fn predict(&self, images: &UploadReference) -> Result<Vec<PredictionResult>, ClientError> {
        let resp = self
            .http
            .post(self.config.predict_url())
            .json(&predict_body(images))
            .send()?;
        let body = successful_body("predict", resp)?;
        parse_predict_response(&body)
    }

    fn fetch_image(&self, path: &str) -> Result<Vec<u8>, ClientError> {
        let resp = self.http.get(self.config.asset_url(path)).send()?;
        successful_body("uploads", resp)
    }
}

fn successful_body(endpoint: &'static str, resp: Response) -> Result<Vec<u8>, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(ClientError::Status { endpoint, status });
    }
    Ok(resp.bytes()?.to_vec())
}

#[derive(Deserialize)]
struct UploadResponse {
    images: Option<serde_json::Value>,
}

/// Pull the `images` value out of an upload response body.
pub fn parse_upload_response(body: &[u8]) -> Result<UploadReference, ClientError> {
    let parsed: UploadResponse =
        serde_json::from_slice(body).map_err(|source| ClientError::MalformedBody {
            endpoint: "upload",
            source,
        })?;
    match parsed.images {
        Some(serde_json::Value::Null) | None => Err(ClientError::MissingImages),
        Some(images) => Ok(UploadReference(images)),
    }
}

/// JSON body for `/predict`.
pub fn predict_body(images: &UploadReference) -> serde_json::Value {
    serde_json::json!({ "images": images })
}

pub fn parse_predict_response(body: &[u8]) -> Result<Vec<PredictionResult>, ClientError> {
    serde_json::from_slice(body).map_err(|source| ClientError::MalformedBody {
        endpoint: "predict",
        source,
    })
}
