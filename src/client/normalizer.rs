use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt::Debug;
use std::str::FromStr;

use crate::label::Label;

use super::PredictionError;

/// NudeNet detector classes treated as nsfw.
pub const DEFAULT_NSFW_LABELS: [&str; 5] = [
    "FEMALE_GENITALIA_EXPOSED",
    "BUTTOCKS_EXPOSED",
    "FEMALE_BREAST_EXPOSED",
    "MALE_GENITALIA_EXPOSED",
    "ANUS_EXPOSED",
];

/// Reduces a service's JSON body to a binary label.
pub trait ResponseNormalizer: Debug {
    fn normalize(&self, body: &Value) -> Result<Label, PredictionError>;
}

// -- config

fn default_label_field() -> String {
    "classification".to_string()
}

fn default_detections_field() -> String {
    "prediction".to_string()
}

fn default_threshold() -> f64 {
    0.5
}

fn default_positive_labels() -> Vec<String> {
    DEFAULT_NSFW_LABELS.iter().map(|s| s.to_string()).collect()
}

/// Response shape returned by an endpoint, selected per endpoint in config
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseSchema {
    /// `{"<field>": "normal" | "nsfw"}`
    DirectLabel {
        #[serde(default = "default_label_field")]
        field: String,
    },

    /// `{"<field>": [[{"class": .., "score": ..}, ..], ..]}`
    ScoredMultiLabel {
        #[serde(default = "default_detections_field")]
        field: String,

        #[serde(default = "default_threshold")]
        threshold: f64,

        #[serde(default = "default_positive_labels")]
        positive_labels: Vec<String>,
    },
}

impl Default for ResponseSchema {
    fn default() -> Self {
        ResponseSchema::DirectLabel {
            field: default_label_field(),
        }
    }
}

impl ResponseSchema {
    /// Scored schema with the default field, threshold and NudeNet labels.
    pub fn scored() -> Self {
        ResponseSchema::ScoredMultiLabel {
            field: default_detections_field(),
            threshold: default_threshold(),
            positive_labels: default_positive_labels(),
        }
    }

    pub fn normalizer(&self) -> Box<dyn ResponseNormalizer> {
        match self {
            ResponseSchema::DirectLabel { field } => Box::new(DirectLabelNormalizer::new(field)),
            ResponseSchema::ScoredMultiLabel {
                field,
                threshold,
                positive_labels,
            } => Box::new(ScoredMultiLabelNormalizer::new(
                field,
                *threshold,
                positive_labels.iter().cloned(),
            )),
        }
    }
}

// -- direct label

#[derive(Debug, Clone)]
pub struct DirectLabelNormalizer {
    field: String,
}

impl DirectLabelNormalizer {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

impl ResponseNormalizer for DirectLabelNormalizer {
    fn normalize(&self, body: &Value) -> Result<Label, PredictionError> {
        let value = body
            .get(&self.field)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                PredictionError::MalformedBody(format!("missing string field `{}`", self.field))
            })?;

        Label::from_str(value)
            .map_err(|_| PredictionError::MalformedBody(format!("unknown label `{value}`")))
    }
}

// -- scored multi-label

#[derive(Debug, Clone)]
pub struct ScoredMultiLabelNormalizer {
    field: String,
    threshold: f64,
    positive_labels: HashSet<String>,
}

impl ScoredMultiLabelNormalizer {
    pub fn new(
        field: impl Into<String>,
        threshold: f64,
        positive_labels: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            field: field.into(),
            threshold,
            positive_labels: positive_labels.into_iter().collect(),
        }
    }

    fn is_positive(&self, entry: &Value) -> bool {
        let (Some(class), Some(score)) = (
            entry.get("class").and_then(Value::as_str),
            entry.get("score").and_then(Value::as_f64),
        ) else {
            return false;
        };
        self.positive_labels.contains(class) && score > self.threshold
    }
}

impl ResponseNormalizer for ScoredMultiLabelNormalizer {
    fn normalize(&self, body: &Value) -> Result<Label, PredictionError> {
        if !body.is_object() {
            return Err(PredictionError::MalformedBody(
                "expected a JSON object".to_string(),
            ));
        }

        let detections = match body.get(&self.field) {
            None | Some(Value::Null) => return Ok(Label::Normal),
            Some(Value::Array(detections)) => detections,
            Some(_) => {
                return Err(PredictionError::MalformedBody(format!(
                    "field `{}` is not a list",
                    self.field
                )));
            }
        };

        // Only the first detection result is scored.
        let entries = match detections.first() {
            None | Some(Value::Null) => return Ok(Label::Normal),
            Some(Value::Array(entries)) => entries,
            Some(_) => {
                return Err(PredictionError::MalformedBody(
                    "detection result is not a list".to_string(),
                ));
            }
        };

        if entries.iter().any(|entry| self.is_positive(entry)) {
            Ok(Label::Nsfw)
        } else {
            Ok(Label::Normal)
        }
    }
}
