use log::{debug, error, info, LevelFilter};
use std::error::Error;
use std::path::Path;
use std::sync::Once;
use std::time::Instant;

static LOGGER: Once = Once::new();

/// Install `env_logger`; later calls are no-ops.
///
/// Info for dependencies, Debug for this crate. `RUST_LOG` wins over both.
pub fn init_logger() {
    LOGGER.call_once(|| {
        let installed = env_logger::Builder::new()
            .filter_level(LevelFilter::Info)
            .filter_module(env!("CARGO_CRATE_NAME"), LevelFilter::Debug)
            .parse_default_env()
            .format_timestamp_millis()
            .format_target(false)
            .try_init();

        if installed.is_ok() {
            debug!("Logger ready");
        }
    });
}

/// One-line log records shared by every pipeline stage
pub struct LogContext;

impl LogContext {
    pub fn stage(stage: &str, status: &str) {
        info!(">>> {} {} <<<", stage, status);
    }

    pub fn dataset_shape(name: &str, rows: usize, columns: usize) {
        info!("{} shape: ({}, {})", name, rows, columns);
    }

    pub fn artifact_saved(kind: &str, path: &Path) {
        info!("Saved {} at {}", kind, path.display());
    }

    pub fn artifact_loaded(kind: &str, path: &Path) {
        debug!("Loaded {} from {}", kind, path.display());
    }

    /// `results` is `None` when the query starts, the row count once it ends
    pub fn recommendation(strategy: &str, query: &str, results: Option<usize>) {
        match results {
            None => debug!("{} recommendations for '{}'", strategy, query),
            Some(0) => info!("{} found nothing for '{}'", strategy, query),
            Some(n) => info!("{} recommended {} anime for '{}'", strategy, n, query),
        }
    }

    pub fn error_with_context(err: &dyn Error, context: &str) {
        error!("[{}] {}", context, err);
    }

    pub fn performance_metric(operation: &str, duration_ms: u64, detail: Option<&str>) {
        if let Some(detail) = detail {
            info!("{} finished in {} ms, {}", operation, duration_ms, detail);
        } else {
            info!("{} finished in {} ms", operation, duration_ms);
        }
    }
}

/// Wall-clock timer for a stage, logged when it finishes
pub struct TimedOperation {
    label: String,
    started: Instant,
}

impl TimedOperation {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            started: Instant::now(),
        }
    }

    fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Returns the elapsed milliseconds
    pub fn finish(self) -> u64 {
        let ms = self.elapsed_ms();
        LogContext::performance_metric(&self.label, ms, None);
        ms
    }

    pub fn finish_with_info(self, detail: &str) -> u64 {
        let ms = self.elapsed_ms();
        LogContext::performance_metric(&self.label, ms, Some(detail));
        ms
    }
}
