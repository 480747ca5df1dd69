pub mod extract;
pub mod monitor;
pub mod price;
pub mod report_writer;

pub use crate::domain::model::{Competitor, PriceRecord, Product, RecordStatus, Report};
pub use crate::domain::ports::{EventReporter, MonitorEvent, PageFetcher, Storage};
pub use crate::utils::error::Result;
