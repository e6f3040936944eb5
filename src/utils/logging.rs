use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber. Call once at program start; `RUST_LOG`
/// overrides the default filter (crate at info, dependencies at warn).
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,skywatch=info"));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
