//! What the screen shows, as plain data.

use crate::config::ServerConfig;
use crate::model::{Prediction, PredictionResult};
use crate::state::UiState;
use std::fmt;

pub const TITLE: &str = "AI Car Type Predictor";
pub const SUBMIT_LABEL: &str = "Ask AI to Predict";
pub const SUBMIT_BUSY_LABEL: &str = "Processing...";
pub const RESULTS_HEADING: &str = "Prediction Results:";
pub const NO_PREDICTIONS: &str = "No predictions available.";
pub const IDLE_PROMPT: &str = "Please select an image file to let the AI predict the car type.";

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub title: &'static str,
    pub submit: SubmitControl,
    pub error: Option<String>,
    pub results: Vec<ResultCard>,
    pub idle_prompt: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitControl {
    pub enabled: bool,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultCard {
    /// Server reference of the image this card describes.
    pub path: String,
    pub heading: String,
    pub body: CardBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CardBody {
    /// The server could not classify this image.
    Error(String),
    Predictions {
        lines: Vec<PredictionLine>,
        image_url: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionLine {
    pub tag_name: String,
    pub probability: f64,
}

impl fmt::Display for PredictionLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}%", self.tag_name, self.probability)
    }
}

impl From<&Prediction> for PredictionLine {
    fn from(p: &Prediction) -> Self {
        Self {
            tag_name: p.tag_name.clone(),
            probability: p.probability,
        }
    }
}

pub fn render(state: &UiState, config: &ServerConfig) -> View {
    let results = match &state.results {
        Some(results) => results.iter().map(|r| card(r, config)).collect(),
        None => Vec::new(),
    };
    View {
        title: TITLE,
        submit: SubmitControl {
            enabled: state.can_submit(),
            label: if state.is_loading {
                SUBMIT_BUSY_LABEL
            } else {
                SUBMIT_LABEL
            },
        },
        error: state.error_message.clone(),
        results,
        idle_prompt: state.is_idle().then_some(IDLE_PROMPT),
    }
}

fn card(result: &PredictionResult, config: &ServerConfig) -> ResultCard {
    let body = match &result.error {
        Some(error) => CardBody::Error(error.clone()),
        None => CardBody::Predictions {
            lines: result.predictions.iter().map(PredictionLine::from).collect(),
            image_url: (!result.path.is_empty()).then(|| config.asset_url(&result.path)),
        },
    };
    ResultCard {
        path: result.path.clone(),
        heading: format!("Image Name: {}", result.path),
        body,
    }
}

impl View {
    /// The view as text, top to bottom.
    pub fn lines(&self) -> Vec<String> {
        let mut out = vec![self.title.to_string(), format!("[{}]", self.submit.label)];
        if let Some(error) = &self.error {
            out.push(error.clone());
        }
        if !self.results.is_empty() {
            out.push(RESULTS_HEADING.to_string());
        }
        for card in &self.results {
            out.push(card.heading.clone());
            match &card.body {
                CardBody::Error(error) => out.push(format!("Error: {error}")),
                CardBody::Predictions { lines, image_url } => {
                    if lines.is_empty() {
                        out.push(NO_PREDICTIONS.to_string());
                    }
                    out.extend(lines.iter().map(ToString::to_string));
                    if let Some(url) = image_url {
                        out.push(format!("<image {url}>"));
                    }
                }
            }
        }
        if let Some(prompt) = self.idle_prompt {
            out.push(prompt.to_string());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GENERIC_ERROR_MESSAGE;
    use crate::model::SelectedFile;

    fn result(path: &str, predictions: Vec<Prediction>, error: Option<&str>) -> PredictionResult {
        PredictionResult {
            path: path.into(),
            predictions,
            error: error.map(Into::into),
        }
    }

    #[test]
    fn idle_view_shows_only_prompt() {
        let view = render(&UiState::default(), &ServerConfig::default());
        assert_eq!(view.idle_prompt, Some(IDLE_PROMPT));
        assert_eq!(view.error, None);
        assert!(view.results.is_empty());
        assert_eq!(
            view.submit,
            SubmitControl {
                enabled: false,
                label: SUBMIT_LABEL
            }
        );
        assert_eq!(view.lines(), vec![TITLE, "[Ask AI to Predict]", IDLE_PROMPT]);
    }

    #[test]
    fn selected_file_enables_submit_and_hides_prompt() {
        let state = UiState {
            selected_file: Some(SelectedFile::from_path("a.png")),
            ..UiState::default()
        };
        let view = render(&state, &ServerConfig::default());
        assert!(view.submit.enabled);
        assert_eq!(view.idle_prompt, None);
    }

    #[test]
    fn loading_disables_submit_and_changes_label() {
        let state = UiState {
            selected_file: Some(SelectedFile::from_path("a.png")),
            is_loading: true,
            ..UiState::default()
        };
        let view = render(&state, &ServerConfig::default());
        assert_eq!(
            view.submit,
            SubmitControl {
                enabled: false,
                label: SUBMIT_BUSY_LABEL
            }
        );
    }

    #[test]
    fn error_message_is_rendered() {
        let state = UiState {
            error_message: Some(GENERIC_ERROR_MESSAGE.into()),
            ..UiState::default()
        };
        let view = render(&state, &ServerConfig::default());
        assert!(view.lines().contains(&GENERIC_ERROR_MESSAGE.to_string()));
        assert_eq!(view.idle_prompt, None);
    }

    #[test]
    fn cards_cover_predictions_errors_and_empty_lists() {
        let state = UiState {
            results: Some(vec![
                result(
                    "a.png",
                    vec![Prediction {
                        tag_name: "Sedan".into(),
                        probability: 87.5,
                    }],
                    None,
                ),
                result("b.png", Vec::new(), Some("unsupported format")),
                result("c.png", Vec::new(), None),
            ]),
            ..UiState::default()
        };
        let view = render(&state, &ServerConfig::default());

        assert_eq!(
            view.results[0].body,
            CardBody::Predictions {
                lines: vec![PredictionLine {
                    tag_name: "Sedan".into(),
                    probability: 87.5
                }],
                image_url: Some("http://localhost:3002/uploads/a.png".into()),
            }
        );
        assert_eq!(
            view.results[1].body,
            CardBody::Error("unsupported format".into())
        );

        let text = view.lines();
        assert!(text.contains(&"Sedan: 87.5%".to_string()));
        assert!(text.contains(&"Error: unsupported format".to_string()));
        assert!(text.contains(&"Image Name: c.png".to_string()));
        assert!(text.contains(&NO_PREDICTIONS.to_string()));
        assert!(!text.contains(&"<image http://localhost:3002/uploads/b.png>".to_string()));
    }

    #[test]
    fn empty_result_list_renders_nothing_and_no_prompt() {
        let state = UiState {
            results: Some(Vec::new()),
            ..UiState::default()
        };
        let view = render(&state, &ServerConfig::default());
        assert!(view.results.is_empty());
        assert_eq!(view.idle_prompt, None);
        assert!(!view.lines().contains(&RESULTS_HEADING.to_string()));
    }

    #[test]
    fn result_without_path_has_no_image() {
        let state = UiState {
            results: Some(vec![result("", Vec::new(), None)]),
            ..UiState::default()
        };
        let view = render(&state, &ServerConfig::default());
        assert!(matches!(
            view.results[0].body,
            CardBody::Predictions {
                image_url: None,
                ..
            }
        ));
    }
}
