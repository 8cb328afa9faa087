use env_logger::Env;

/// Install the global logger: `info` unless `RUST_LOG` says otherwise, e.g.
/// `RUST_LOG=colstore::cache=debug`.
pub fn setup_logging() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .format_target(false)
        .init();
}
