use crate::config::toml_config::MonitorConfig;
use crate::core::extract::PageExtractor;
use crate::core::report_writer::ReportWriter;
use crate::domain::model::{Competitor, PriceRecord, Product, RecordStatus, Report};
use crate::domain::ports::{EventReporter, MonitorEvent, PageFetcher, Storage};
use crate::utils::error::Result;
use std::path::Path;

/// Runs the fetch → extract → aggregate pass over a configuration.
///
/// Competitors are checked one at a time in configuration order. Fetch and
/// parse failures end up as row statuses; only writing the report can fail
/// the run.
pub struct PriceMonitor<F: PageFetcher, R: EventReporter> {
    fetcher: F,
    reporter: R,
}

impl<F: PageFetcher, R: EventReporter> PriceMonitor<F, R> {
    pub fn new(fetcher: F, reporter: R) -> Self {
        Self { fetcher, reporter }
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Checks one competitor page and always yields a record.
    pub async fn check(
        &self,
        config: &MonitorConfig,
        product: &Product,
        competitor: &Competitor,
    ) -> PriceRecord {
        self.reporter.emit(&MonitorEvent::CheckStarted {
            product: product.name.clone(),
            competitor: competitor.name.clone(),
            url: competitor.url.clone(),
        });

        let record = match self.fetcher.fetch(&competitor.url).await {
            Err(e) => PriceRecord::failed(
                product,
                competitor,
                RecordStatus::FetchFailed,
                e.to_string(),
            ),
            Ok(body) => {
                let extracted = PageExtractor::new(&config.selectors_for(competitor))
                    .and_then(|extractor| extractor.extract(&body));

                match extracted {
                    Ok(extraction) => PriceRecord::ok(product, competitor, extraction),
                    Err(e) => PriceRecord::failed(
                        product,
                        competitor,
                        RecordStatus::ParseFailed,
                        e.to_string(),
                    ),
                }
            }
        };

        self.reporter.emit(&MonitorEvent::CheckFinished(record.clone()));
        record
    }

    /// One record per (product, competitor) pair, in configuration order.
    pub async fn collect(&self, config: &MonitorConfig) -> Report {
        self.reporter.emit(&MonitorEvent::RunStarted {
            products: config.products.len(),
            competitors: config.competitor_count(),
        });

        let mut report = Report::with_capacity(config.competitor_count());
        for product in &config.products {
            for competitor in &product.competitors {
                report.push(self.check(config, product, competitor).await);
            }
        }

        let summary = report.summary();
        tracing::info!(
            "📊 Checked {} competitor pages: {} ok, {} fetch failed, {} parse failed",
            summary.total(),
            summary.ok,
            summary.fetch_failed,
            summary.parse_failed
        );
        if summary.ok == 0 && !report.is_empty() {
            tracing::warn!("📝 No prices were scraped; the report only contains failed rows");
        }

        report
    }

    /// Collects the report and writes it to `output_path`.
    pub async fn run<S: Storage>(
        &self,
        config: &MonitorConfig,
        writer: &ReportWriter<S>,
        output_path: &Path,
    ) -> Result<Report> {
        let report = self.collect(config).await;

        writer.write(&report, output_path).await?;

        self.reporter.emit(&MonitorEvent::ReportWritten {
            path: output_path.to_path_buf(),
            rows: report.len(),
        });

        Ok(report)
    }
}
