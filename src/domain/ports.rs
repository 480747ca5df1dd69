use crate::domain::model::PriceRecord;
use crate::utils::error::{FetchError, WriteError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Retrieves a competitor page body.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

pub trait Storage: Send + Sync {
    /// Replaces whatever is at `path` with `data`.
    fn write_file(
        &self,
        path: &Path,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<(), WriteError>> + Send;
}

#[derive(Debug, Clone, PartialEq)]
pub enum MonitorEvent {
    RunStarted { products: usize, competitors: usize },
    CheckStarted {
        product: String,
        competitor: String,
        url: String,
    },
    CheckFinished(PriceRecord),
    ReportWritten { path: PathBuf, rows: usize },
}

/// Sink for progress and failure events emitted during a run.
pub trait EventReporter: Send + Sync {
    fn emit(&self, event: &MonitorEvent);
}

impl<R: EventReporter + ?Sized> EventReporter for &R {
    fn emit(&self, event: &MonitorEvent) {
        (**self).emit(event)
    }
}
