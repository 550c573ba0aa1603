//! Logging setup.
//!
//! Reports go to stdout; logs go to stderr so the two never interleave in
//! redirected output.

/// Set to `json` for JSON log lines.
pub const LOG_FORMAT_ENV: &str = "GRIDFIT_LOG_FORMAT";

pub fn logs_are_json() -> bool {
    matches!(std::env::var(LOG_FORMAT_ENV).as_deref(), Ok("json"))
}

/// Initialize tracing according to `RUST_LOG` and `GRIDFIT_LOG_FORMAT`.
///
/// - loads `.env` first, if present
/// - defaults to `info` if `RUST_LOG` is unset
/// - compact text by default, JSON when `GRIDFIT_LOG_FORMAT=json`
pub fn init_tracing() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{EnvFilter, fmt};

    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
    let builder = tracing_subscriber::registry().with(filter);

    if logs_are_json() {
        let _ = builder.with(fmt_layer.json().flatten_event(true)).try_init();
    } else {
        let _ = builder.with(fmt_layer.compact()).try_init();
    }
}
