use crate::domain::model::RecordStatus;
use crate::domain::ports::{EventReporter, MonitorEvent};
use std::sync::Mutex;

/// Logs every event through `tracing`; failed checks are warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl EventReporter for TracingReporter {
    fn emit(&self, event: &MonitorEvent) {
        match event {
            MonitorEvent::RunStarted {
                products,
                competitors,
            } => {
                tracing::info!(
                    "🚀 Starting competitor price monitoring: {} products, {} competitor pages",
                    products,
                    competitors
                );
            }
            MonitorEvent::CheckStarted {
                product,
                competitor,
                url,
            } => {
                tracing::debug!("Checking {} / {} at {}", product, competitor, url);
            }
            MonitorEvent::CheckFinished(record) => match record.status {
                RecordStatus::Ok => tracing::info!(
                    "✅ {} / {}: {}",
                    record.product_name,
                    record.competitor_name,
                    record
                        .price
                        .map(|p| p.to_string())
                        .unwrap_or_default()
                ),
                RecordStatus::FetchFailed | RecordStatus::ParseFailed => tracing::warn!(
                    "⚠️ {} / {}: {} ({})",
                    record.product_name,
                    record.competitor_name,
                    record.status,
                    record.detail.as_deref().unwrap_or("no detail")
                ),
            },
            MonitorEvent::ReportWritten { path, rows } => {
                tracing::info!("📁 Report with {} rows saved to: {}", rows, path.display());
            }
        }
    }
}

/// Keeps every event in memory, in emission order.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    events: Mutex<Vec<MonitorEvent>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<MonitorEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn failures(&self) -> Vec<MonitorEvent> {
        self.events()
            .into_iter()
            .filter(|event| {
                matches!(event, MonitorEvent::CheckFinished(record) if !record.is_ok())
            })
            .collect()
    }
}

impl EventReporter for CollectingReporter {
    fn emit(&self, event: &MonitorEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
