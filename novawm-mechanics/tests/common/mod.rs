// novawm-mechanics/tests/common/mod.rs

use tracing_subscriber::EnvFilter;

/// Routes engine logs through the test harness; `RUST_LOG=trace` shows every
/// constraint pass.
pub fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
}
