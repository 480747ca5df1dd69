pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{CollectingReporter, FetchSettings, HttpFetcher, LocalStorage, TracingReporter};
pub use config::MonitorConfig;
pub use self::core::{
    extract::{PageExtractor, SiteSelectors},
    monitor::PriceMonitor,
    report_writer::{ReportFormat, ReportWriter},
};
pub use domain::model::{Competitor, PriceRecord, Product, RecordStatus, Report};
pub use utils::error::{FetchError, MonitorError, ParseError, Result, WriteError};
