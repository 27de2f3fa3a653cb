mod client;
mod dataset;
mod error;
mod evaluate;
mod label;
mod logging;
mod metrics;
mod progress_bar;
mod toml_utils;

pub use client::{
    Classifier, DEFAULT_NSFW_LABELS, DirectLabelNormalizer, EndpointConfig, HttpClassifier,
    PredictionError, ResponseNormalizer, ResponseSchema, ScoredMultiLabelNormalizer,
};
pub use dataset::{DatasetArgs, DatasetWalker, FileFilter, Sample, Samples, is_image_file};
pub use error::{AppError, Result};
pub use label::Label;
pub use logging::init_logger;
pub use metrics::{ConfusionMatrix, EndpointReport, Metrics};
pub use progress_bar::progress_bar_style;
pub use toml_utils::parse_toml;

// Core evaluation function
pub use evaluate::{EvalArgs, FailurePolicy, evaluate_endpoint, run_evaluation};
