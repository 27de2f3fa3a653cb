use indicatif::{ProgressFinish, ProgressIterator};
use serde::Deserialize;
use std::str::FromStr;
use std::time::{Duration, Instant};
use strum::{Display, EnumString, VariantNames};

use crate::client::{Classifier, EndpointConfig, HttpClassifier, ResponseSchema};
use crate::dataset::{DatasetArgs, DatasetWalker};
use crate::error::{AppError, Result};
use crate::metrics::EndpointReport;
use crate::progress_bar::endpoint_progress_bar;

// -- enums

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, Deserialize, VariantNames)]
/// What a failed prediction counts toward. Failed samples never enter the
/// confusion matrix under either policy.
pub enum FailurePolicy {
    /// Drop the sample entirely
    #[strum(serialize = "Skip")]
    Skip,

    /// Count the sample as processed for its class, but not as scored
    #[strum(serialize = "CountProcessed")]
    CountProcessed,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        FailurePolicy::Skip
    }
}

/// Custom deserializer with helpful error message
pub fn deserialize_failure_policy<'de, D>(deserializer: D) -> Result<FailurePolicy, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    FailurePolicy::from_str(&value).map_err(|_| {
        let variants = FailurePolicy::VARIANTS;
        serde::de::Error::invalid_value(
            serde::de::Unexpected::Str(&value),
            &format!("one of {}", variants.join(", ")).as_str(),
        )
    })
}

// -- args

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EvalArgs {
    /// Labeled dataset to walk
    pub dataset: DatasetArgs,

    /// Endpoints evaluated in order, each against the full dataset
    pub endpoints: Vec<EndpointConfig>,

    /// How failed predictions are counted, for the whole run
    #[serde(default, deserialize_with = "deserialize_failure_policy")]
    pub failure_policy: FailurePolicy,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Log every prediction
    pub verbose: bool,
}

impl Default for EvalArgs {
    fn default() -> Self {
        Self {
            dataset: Default::default(),
            endpoints: Vec::new(),
            failure_policy: Default::default(),
            timeout_secs: 30,
            verbose: false,
        }
    }
}

impl EvalArgs {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check values serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` for a zero timeout, an unnamed endpoint or a
    /// score threshold outside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(AppError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        for endpoint in &self.endpoints {
            if endpoint.name.trim().is_empty() {
                return Err(AppError::Config(format!(
                    "Endpoint with url {:?} has an empty name",
                    endpoint.url
                )));
            }
            if let ResponseSchema::ScoredMultiLabel { threshold, .. } = &endpoint.response
                && !(0.0..=1.0).contains(threshold)
            {
                return Err(AppError::Config(format!(
                    "Threshold {threshold} for endpoint {} is outside [0, 1]",
                    endpoint.name
                )));
            }
        }
        Ok(())
    }
}

// -- evaluation

/// Score every sample of `walker` against one classifier.
///
/// Failed predictions are logged with the endpoint and file and handled per
/// `policy`; they never stop the loop.
pub fn evaluate_endpoint<C>(
    classifier: &C,
    walker: &DatasetWalker,
    policy: FailurePolicy,
    verbose: bool,
) -> EndpointReport
where
    C: Classifier + ?Sized,
{
    let name = classifier.name();
    let mut report = EndpointReport::new(name);

    report.missing_classes = walker.missing_classes();
    for label in &report.missing_classes {
        tracing::warn!(
            "{} folder not found in {:?}, it contributes no samples",
            label,
            walker.root()
        );
    }

    let total = walker.count_samples();
    tracing::info!("--- Evaluating {} endpoint ---", name);
    tracing::info!("Total samples to process: {}", total);

    for sample in walker
        .samples()
        .progress_with(endpoint_progress_bar(total, name))
        .with_finish(ProgressFinish::WithMessage("Finished".into()))
    {
        match classifier.predict(&sample.path) {
            Ok(predicted) => {
                if verbose {
                    tracing::debug!(
                        "Image: {}, True: {}, Predicted: {}",
                        sample.file_name(),
                        sample.label,
                        predicted
                    );
                }
                report.matrix.record(sample.label, predicted);
                report.processed[sample.label.index()] += 1;
            }
            Err(e) => {
                tracing::error!("Error calling {} with image {:?}: {}", name, sample.path, e);
                report.failed += 1;
                if policy == FailurePolicy::CountProcessed {
                    report.processed[sample.label.index()] += 1;
                }
            }
        }
    }

    report
}

/// Evaluate every configured endpoint in order, each with a fresh matrix.
///
/// An endpoint whose client cannot be built is logged and reported without
/// predictions; the remaining endpoints still run.
///
/// # Errors
///
/// Returns `AppError::Config` if the arguments are invalid or no endpoint is
/// configured.
pub fn run_evaluation(args: &EvalArgs) -> Result<Vec<EndpointReport>> {
    let start_time = Instant::now();
    args.validate()?;

    if args.endpoints.is_empty() {
        return Err(AppError::Config("No endpoints configured".to_string()));
    }

    let walker = DatasetWalker::new(&args.dataset);
    tracing::info!("[Dataset]: {:?}", walker.root());
    tracing::info!("[Failure policy]: {}", args.failure_policy);

    let mut reports = Vec::with_capacity(args.endpoints.len());
    for endpoint in &args.endpoints {
        let report = match HttpClassifier::new(endpoint, args.timeout()) {
            Ok(classifier) => {
                tracing::info!("[Endpoint]: {} -> {}", endpoint.name, classifier.url());
                evaluate_endpoint(&classifier, &walker, args.failure_policy, args.verbose)
            }
            Err(e) => {
                tracing::error!("Skipping endpoint {}: {}", endpoint.name, e);
                EndpointReport::new(endpoint.name.clone())
            }
        };
        reports.push(report);
    }

    let duration = start_time.elapsed();
    tracing::info!("Total evaluation time: {:.3?}", duration);

    Ok(reports)
}
