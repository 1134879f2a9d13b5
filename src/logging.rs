use tracing::Level;

/// Picks the log level: each `-v` raises the configured level one step.
pub fn level_for(configured: &str, verbosity: u8) -> Level {
    let base = configured.parse::<Level>().unwrap_or(Level::WARN);
    let steps = [Level::ERROR, Level::WARN, Level::INFO, Level::DEBUG, Level::TRACE];
    let position = steps.iter().position(|l| *l == base).unwrap_or(1);
    steps[(position + verbosity as usize).min(steps.len() - 1)]
}

/// Installs the stderr subscriber. Later calls are ignored.
pub fn init(configured: &str, verbosity: u8) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level_for(configured, verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
