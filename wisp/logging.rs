use tracing_subscriber::EnvFilter;

/// Initializes the ambient `tracing` subscriber.
///
/// `RUST_LOG` always wins when set; otherwise `-v`/`--verbose` raises the
/// default level from `warn` to `debug`. Diagnostics and `print` output
/// never go through this subscriber — it is strictly for the structured
/// logs the pipeline stages emit as they run.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init();
}
