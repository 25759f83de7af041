//! Shared helpers for `parspec` integration tests.
//!
//! - [`builders`]: spec collections and hand-built stream results
//! - [`fakes`]: in-memory launcher, executor, plugins and event bus

pub mod builders;
pub mod fakes;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

/// Upper bound for any single coordinator run in tests.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
///
/// Captured output is only shown for failing tests. `PARSPEC_LOG` takes
/// precedence over `RUST_LOG` so the same directives work for the binary
/// and the tests.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = std::env::var("PARSPEC_LOG")
            .ok()
            .and_then(|s| EnvFilter::try_new(s).ok())
            .or_else(|| EnvFilter::try_from_default_env().ok())
            .unwrap_or_else(|| EnvFilter::new("warn,parspec=debug"));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Await `f`, panicking if it outlives [`TEST_TIMEOUT`].
///
/// A hung stream would otherwise hang the whole test binary.
pub async fn with_timeout<F: Future>(f: F) -> F::Output {
    match tokio::time::timeout(TEST_TIMEOUT, f).await {
        Ok(out) => out,
        Err(_) => panic!("test did not finish within {TEST_TIMEOUT:?}"),
    }
}
