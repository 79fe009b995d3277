//! Logging utilities and structured logging support
//!
//! The library only emits through the `log` facade; binaries install the
//! logger of their choice.

pub use log::{debug, info, warn, error, trace};

/// Initialize logging for tests, ignoring repeated initialization
pub fn init_for_tests() {
    let _ = env_logger::builder().is_test(true).try_init();
}
