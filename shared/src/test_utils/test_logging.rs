use env_logger::Builder;
use log::LevelFilter;
use std::str::FromStr;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize quiet logging for tests.
///
/// Only errors are printed unless `TEST_LOG_LEVEL` names another level
/// (`warn`, `info`, `debug`, `trace`). Safe to call from every test.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let level = std::env::var("TEST_LOG_LEVEL")
            .ok()
            .and_then(|level| LevelFilter::from_str(&level).ok())
            .unwrap_or(LevelFilter::Error);

        // try_init: another harness may already own the global logger
        let _ = Builder::new().filter_level(level).is_test(true).try_init();
    });
}
