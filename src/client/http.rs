use reqwest::blocking::Client;
use reqwest::blocking::multipart::{Form, Part};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::label::Label;

use super::{Classifier, EndpointConfig, PredictionError, ResponseNormalizer};

/// Classifier backed by a remote service taking one multipart file upload
/// per request.
#[derive(Debug)]
pub struct HttpClassifier {
    name: String,
    url: String,
    field_name: String,
    mime: Option<String>,
    normalizer: Box<dyn ResponseNormalizer>,
    client: Client,
}

impl HttpClassifier {
    /// Build a classifier for `config` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `AppError` if the configured MIME type does not parse or the
    /// HTTP client cannot be created.
    pub fn new(config: &EndpointConfig, timeout: Duration) -> Result<Self> {
        if let Some(mime) = &config.mime {
            Part::bytes(Vec::new()).mime_str(mime).map_err(|e| {
                AppError::Config(format!(
                    "Invalid MIME type {mime:?} for endpoint {}: {e}",
                    config.name
                ))
            })?;
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::HttpClient(e.to_string()))?;

        Ok(Self {
            name: config.name.clone(),
            url: config.url.clone(),
            field_name: config.field_name.clone(),
            mime: config.mime.clone(),
            normalizer: config.response.normalizer(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn build_form(&self, path: &Path) -> Result<Form, PredictionError> {
        let bytes = std::fs::read(path).map_err(|source| PredictionError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned();

        let mut part = Part::bytes(bytes).file_name(file_name);
        if let Some(mime) = &self.mime {
            part = part.mime_str(mime)?;
        }
        Ok(Form::new().part(self.field_name.clone(), part))
    }
}

impl Classifier for HttpClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, path: &Path) -> Result<Label, PredictionError> {
        let form = self.build_form(path)?;
        let response = self.client.post(&self.url).multipart(form).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(PredictionError::Status(status.as_u16()));
        }

        let text = response.text()?;
        let body: Value = serde_json::from_str(&text)
            .map_err(|e| PredictionError::MalformedBody(e.to_string()))?;
        self.normalizer.normalize(&body)
    }
}
