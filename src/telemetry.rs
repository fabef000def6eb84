use std::env;

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Production emits JSON lines, everything
/// else human-readable output. `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = env::var("APP_ENV")
        .map(|env| env.eq_ignore_ascii_case("production"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
