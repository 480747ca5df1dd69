// Adapters layer: concrete implementations of the domain ports (http, storage, event reporting).

pub mod http;
pub mod reporter;
pub mod storage;

pub use http::{FetchSettings, HttpFetcher};
pub use reporter::{CollectingReporter, TracingReporter};
pub use storage::LocalStorage;
