use crate::{FileWorkerGuard, Tracer};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Tracer for tests.
///
/// Events are captured by the test harness. Nothing is logged unless `RUST_LOG` enables it, for
/// example `RUST_LOG=reconcile=debug`.
///
/// Installing fails silently if a subscriber is already set, so every test may call it.
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct TestTracer;

impl Tracer for TestTracer {
    fn init(self) -> eyre::Result<Option<FileWorkerGuard>> {
        let filter =
            EnvFilter::builder().with_default_directive(LevelFilter::OFF.into()).from_env_lossy();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_test_writer()
            .try_init();
        Ok(None)
    }
}
