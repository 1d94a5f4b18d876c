use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Environment variables consulted for a log filter, in priority order.
const LOG_ENV_VARS: [&str; 2] = ["VULOAD_LOG", "RUST_LOG"];

const fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

fn filter_from(directive: Option<&str>, verbose: bool) -> EnvFilter {
    let fallback = default_directive(verbose);
    directive.map_or_else(
        || EnvFilter::new(fallback),
        |value| EnvFilter::try_new(value).unwrap_or_else(|_err| EnvFilter::new(fallback)),
    )
}

/// Install the global subscriber. Logs go to stderr so the run summary on
/// stdout stays machine-readable.
pub fn init_logging(verbose: bool, no_color: bool) {
    let directive = LOG_ENV_VARS
        .iter()
        .find_map(|name| std::env::var(name).ok());
    let filter = filter_from(directive.as_deref(), verbose);

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_ansi(!no_color)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
}
