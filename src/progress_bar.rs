use indicatif::{ProgressBar, ProgressStyle};

/// Get a standardized progress bar style
pub fn progress_bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg}: {wide_bar:.cyan/blue} {pos}/{len} [{elapsed_precise}]")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

/// Progress bar sized for one endpoint's samples.
pub fn endpoint_progress_bar(total: usize, endpoint: &str) -> ProgressBar {
    ProgressBar::new(total as u64)
        .with_style(progress_bar_style())
        .with_message(format!("Evaluating {endpoint}"))
}
