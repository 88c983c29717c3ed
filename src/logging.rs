use env_logger::{Builder, Env};

/// `info` unless `RUST_LOG` says otherwise. Logs go to stderr so replay
/// output on stdout stays clean.
pub fn init() {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}
