// -- submodules
mod http;
mod normalizer;

pub use http::HttpClassifier;
pub use normalizer::{
    DEFAULT_NSFW_LABELS, DirectLabelNormalizer, ResponseNormalizer, ResponseSchema,
    ScoredMultiLabelNormalizer,
};

// -- external imports
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::label::Label;

// -- errors

/// Why a single sample produced no prediction.
///
/// None of these abort a run: the evaluation loop logs them and leaves the
/// sample out of the confusion matrix.
#[derive(Error, Debug)]
pub enum PredictionError {
    #[error("failed to read {path:?}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("endpoint returned HTTP {0}")]
    Status(u16),

    #[error("malformed response body: {0}")]
    MalformedBody(String),
}

// -- traits

/// A classification service that maps one image file to a binary label.
pub trait Classifier {
    /// Name used in logs and reports.
    fn name(&self) -> &str;

    fn predict(&self, path: &Path) -> Result<Label, PredictionError>;
}

// -- config

fn default_field_name() -> String {
    "file".to_string()
}

/// One HTTP classification service under test
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EndpointConfig {
    /// Display name for logs and the report header
    pub name: String,

    /// Full URL receiving the multipart POST
    pub url: String,

    /// Multipart field name holding the file
    #[serde(default = "default_field_name")]
    pub field_name: String,

    /// MIME type attached to the file part, if the service needs one
    #[serde(default)]
    pub mime: Option<String>,

    /// Shape of the JSON the service answers with
    #[serde(default)]
    pub response: ResponseSchema,
}

impl EndpointConfig {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            field_name: default_field_name(),
            mime: None,
            response: ResponseSchema::default(),
        }
    }

    pub fn with_field_name(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = field_name.into();
        self
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    pub fn with_response(mut self, response: ResponseSchema) -> Self {
        self.response = response;
        self
    }
}
