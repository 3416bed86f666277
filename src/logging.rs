//! Tracing setup for the CLI binaries.

use tracing_subscriber::{fmt, EnvFilter};

/// Default filter for our crates at `level`, with HTTP internals kept quiet.
pub fn default_filter(level: &str) -> String {
    format!("order_cleanse={level},order_cleanse_lib={level},dump_sheet={level},reqwest=warn,hyper=warn")
}

/// Install the stderr subscriber. `RUST_LOG` overrides `level` when set.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(level)));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .try_init();
}
