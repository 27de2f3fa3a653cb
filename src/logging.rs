use tracing::Level;

/// Install the global fmt subscriber. Per-sample lines are emitted at debug
/// level, so `verbose` decides whether they reach the terminal.
pub fn init_logger(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .init();
}
