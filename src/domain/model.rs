use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-competitor override of the default CSS selectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectorOverrides {
    pub title: Option<String>,
    pub price: Option<String>,
    pub availability: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selectors: Option<SelectorOverrides>,
}

impl Competitor {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            selectors: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    #[serde(default)]
    pub competitors: Vec<Competitor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    Ok,
    FetchFailed,
    ParseFailed,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Ok => "OK",
            RecordStatus::FetchFailed => "FETCH_FAILED",
            RecordStatus::ParseFailed => "PARSE_FAILED",
        }
    }
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the extractor found on a successfully fetched page.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub title: Option<String>,
    pub price: f64,
    pub availability: Option<String>,
}

/// One row of the report: the outcome of checking one competitor for one product.
///
/// Field order is the column order of the written spreadsheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub product_name: String,
    pub competitor_name: String,
    pub url: String,
    pub title: Option<String>,
    pub price: Option<f64>,
    pub availability: Option<String>,
    pub status: RecordStatus,
    pub detail: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl PriceRecord {
    pub fn ok(product: &Product, competitor: &Competitor, extraction: Extraction) -> Self {
        Self {
            product_name: product.name.clone(),
            competitor_name: competitor.name.clone(),
            url: competitor.url.clone(),
            title: extraction.title,
            price: Some(extraction.price),
            availability: extraction.availability,
            status: RecordStatus::Ok,
            detail: None,
            checked_at: Utc::now(),
        }
    }

    pub fn failed(
        product: &Product,
        competitor: &Competitor,
        status: RecordStatus,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            product_name: product.name.clone(),
            competitor_name: competitor.name.clone(),
            url: competitor.url.clone(),
            title: None,
            price: None,
            availability: None,
            status,
            detail: Some(detail.into()),
            checked_at: Utc::now(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == RecordStatus::Ok
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub ok: usize,
    pub fetch_failed: usize,
    pub parse_failed: usize,
}

impl ReportSummary {
    pub fn total(&self) -> usize {
        self.ok + self.fetch_failed + self.parse_failed
    }
}

/// All records of a single run, in configuration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    records: Vec<PriceRecord>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, record: PriceRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn summary(&self) -> ReportSummary {
        self.records
            .iter()
            .fold(ReportSummary::default(), |mut acc, record| {
                match record.status {
                    RecordStatus::Ok => acc.ok += 1,
                    RecordStatus::FetchFailed => acc.fetch_failed += 1,
                    RecordStatus::ParseFailed => acc.parse_failed += 1,
                }
                acc
            })
    }
}

impl IntoIterator for Report {
    type Item = PriceRecord;
    type IntoIter = std::vec::IntoIter<PriceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
