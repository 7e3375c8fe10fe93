//! Logger setup for the binary.

/// Initializes `env_logger`, defaulting to `info` when `RUST_LOG` is unset.
/// Calling it more than once is harmless.
pub fn init() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}
