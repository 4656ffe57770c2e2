//! Shared setup for the integration suites

use tracing_subscriber::EnvFilter;

/// Route solver logs through the test harness; `RUST_LOG=smoke_sim_core=debug`
/// shows authoring and tick traces for a failing test.
#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
