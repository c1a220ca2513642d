use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

/// Image picked by the user, waiting to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub file_name: String,
    pub mime: String,
}

impl SelectedFile {
    /// Describe a file on disk. The contents are read only when uploading.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self {
            path: path.to_path_buf(),
            mime: guess_mime(path).to_string(),
            file_name,
        }
    }
}

fn guess_mime(path: &Path) -> &'static str {
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "gif" => "image/gif",
            "bmp" => "image/bmp",
            "webp" => "image/webp",
            "tif" | "tiff" => "image/tiff",
            _ => "application/octet-stream",
        },
        None => "application/octet-stream",
    }
}

/// Server-assigned handle(s) for uploaded images.
///
/// This is the `images` value of the upload response, kept verbatim so it
/// can be echoed back to `/predict` whatever shape the server chose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadReference(pub serde_json::Value);

/// One label with its score.
///
/// `probability` is shown as the server sends it; no scaling is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub tag_name: String,
    pub probability: f64,
}

/// Classification outcome for one uploaded image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(default)]
    pub path: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub predictions: Vec<Prediction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// `"predictions": null` means the same as no predictions.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Prediction>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Prediction>>::deserialize(deserializer)?.unwrap_or_default())
}
