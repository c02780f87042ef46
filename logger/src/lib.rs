//! Logger setup for BlockChat binaries and tests.
//!
//! All crates log through the `log` facade; this crate installs the
//! `env_logger` backend. `RUST_LOG` always overrides the filter passed in.

use env_logger::{Builder, Env};

/// Filter used by [`setup`].
pub const DEFAULT_FILTER: &str = "info";

/// Install the logger with `filter` unless `RUST_LOG` is set.
///
/// Only the first successful call takes effect.
pub fn setup_with_default(filter: &str) {
    let _ = Builder::from_env(Env::new().default_filter_or(filter))
        .format_timestamp_millis()
        .try_init();
}

/// Install the logger with [`DEFAULT_FILTER`] unless `RUST_LOG` is set.
pub fn setup() {
    setup_with_default(DEFAULT_FILTER);
}

/// Install the logger with exactly `filter`, ignoring `RUST_LOG`.
pub fn setup_with(filter: &str) {
    let _ = Builder::new()
        .parse_filters(filter)
        .format_timestamp_millis()
        .try_init();
}

/// Logger for `cargo test`: output is captured per test and the default
/// level is `warn` so passing tests stay quiet.
pub fn setup_for_tests() {
    let _ = Builder::from_env(Env::new().default_filter_or("warn"))
        .is_test(true)
        .try_init();
}
