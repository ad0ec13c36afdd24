//! Global logger setup.

use std::sync::Once;

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Filter resolution order: explicit `filter` argument, then the `RUST_LOG`
/// environment variable, then an info-level default. Subsequent calls are
/// ignored; intended usage is early in `main`.
pub fn init(filter: Option<&str>) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = filter {
            builder.parse_filters(filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder.init();

        log::debug!("logging initialized");
    });
}
