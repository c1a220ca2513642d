/// Address of the prediction server when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3002";

/// Where the upload, predict and static asset routes live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ServerConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn upload_url(&self) -> String {
        format!("{}/upload", self.base_url)
    }

    pub fn predict_url(&self) -> String {
        format!("{}/predict", self.base_url)
    }

    /// URL of the stored image behind a prediction result's `path`.
    pub fn asset_url(&self, path: &str) -> String {
        let encoded: Vec<String> = path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!("{}/uploads/{}", self.base_url, encoded.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn default_points_at_local_server() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.upload_url(), "http://localhost:3002/upload");
        assert_eq!(cfg.predict_url(), "http://localhost:3002/predict");
    }

    #[test]
    fn trailing_slash_is_dropped() {
        let cfg = ServerConfig::new("http://example.test:8080/");
        assert_eq!(cfg.upload_url(), "http://example.test:8080/upload");
    }

    #[rstest]
    #[case("imageA.png", "http://localhost:3002/uploads/imageA.png")]
    #[case("my car.png", "http://localhost:3002/uploads/my%20car.png")]
    #[case("2024/05/a.jpg", "http://localhost:3002/uploads/2024/05/a.jpg")]
    fn asset_url_encodes_each_segment(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(ServerConfig::default().asset_url(path), expected);
    }
}
