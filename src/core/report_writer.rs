use crate::domain::model::{PriceRecord, Report};
use crate::domain::ports::Storage;
use crate::utils::error::WriteError;
use rust_xlsxwriter::{Format, Workbook};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Csv,
    Tsv,
    Json,
    Xlsx,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Tsv => "tsv",
            ReportFormat::Json => "json",
            ReportFormat::Xlsx => "xlsx",
        }
    }

    /// Guesses the format from a file extension, e.g. `report.tsv`.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ReportFormat::Csv),
            "tsv" => Ok(ReportFormat::Tsv),
            "json" => Ok(ReportFormat::Json),
            "xlsx" => Ok(ReportFormat::Xlsx),
            other => Err(format!(
                "unsupported report format '{}', expected csv, tsv, json or xlsx",
                other
            )),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

pub const COLUMNS: [&str; 9] = [
    "product_name",
    "competitor_name",
    "url",
    "title",
    "price",
    "availability",
    "status",
    "detail",
    "checked_at",
];

fn render_delimited(records: &[PriceRecord], delimiter: u8) -> Result<Vec<u8>, WriteError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_writer(Vec::new());

    // 失敗列也要有表頭，空報表同樣輸出欄位名稱
    writer.write_record(COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }

    writer
        .into_inner()
        .map_err(|e| WriteError::Csv(csv::Error::from(e.into_error())))
}

pub const SHEET_NAME: &str = "price_summary";

fn render_xlsx(records: &[PriceRecord]) -> Result<Vec<u8>, WriteError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, name) in (0u16..).zip(COLUMNS) {
        worksheet.write_string_with_format(0, col, name, &header)?;
    }

    for (row, record) in (1u32..).zip(records) {
        let text_cells = [
            (0, Some(record.product_name.as_str())),
            (1, Some(record.competitor_name.as_str())),
            (2, Some(record.url.as_str())),
            (3, record.title.as_deref()),
            (5, record.availability.as_deref()),
            (6, Some(record.status.as_str())),
            (7, record.detail.as_deref()),
        ];
        for (col, value) in text_cells {
            if let Some(value) = value {
                worksheet.write_string(row, col, value)?;
            }
        }

        // 價格寫成數值儲存格，失敗列留空
        if let Some(price) = record.price {
            worksheet.write_number(row, 4, price)?;
        }
        worksheet.write_string(row, 8, record.checked_at.to_rfc3339())?;
    }

    worksheet.autofit();
    Ok(workbook.save_to_buffer()?)
}

/// Renders the whole report in memory.
pub fn render(report: &Report, format: ReportFormat) -> Result<Vec<u8>, WriteError> {
    match format {
        ReportFormat::Csv => render_delimited(report.records(), b','),
        ReportFormat::Tsv => render_delimited(report.records(), b'\t'),
        ReportFormat::Json => Ok(serde_json::to_vec_pretty(report.records())?),
        ReportFormat::Xlsx => render_xlsx(report.records()),
    }
}

pub struct ReportWriter<S: Storage> {
    storage: S,
    format: ReportFormat,
}

impl<S: Storage> ReportWriter<S> {
    pub fn new(storage: S, format: ReportFormat) -> Self {
        Self { storage, format }
    }

    pub fn format(&self) -> ReportFormat {
        self.format
    }

    /// Overwrites `path` with one row per record.
    pub async fn write(&self, report: &Report, path: &Path) -> Result<(), WriteError> {
        let data = render(report, self.format)?;

        tracing::debug!(
            "Writing {} report ({} rows, {} bytes) to {}",
            self.format,
            report.len(),
            data.len(),
            path.display()
        );

        self.storage.write_file(path, &data).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Competitor, Extraction, Product, RecordStatus};

    fn sample_report() -> Report {
        let product = Product {
            name: "A Light in the Attic".to_string(),
            competitors: vec![
                Competitor::new("Amazon", "http://shop.test/a"),
                Competitor::new("Flipkart", "http://shop.test/b"),
            ],
        };

        let mut report = Report::new();
        report.push(PriceRecord::ok(
            &product,
            &product.competitors[0],
            Extraction {
                title: Some("A Light in the Attic".to_string()),
                price: 51.77,
                availability: Some("In stock (22 available)".to_string()),
            },
        ));
        report.push(PriceRecord::failed(
            &product,
            &product.competitors[1],
            RecordStatus::FetchFailed,
            "HTTP status 404",
        ));
        report
    }

    #[test]
    fn csv_has_header_and_one_row_per_record() {
        let data = render(&sample_report(), ReportFormat::Csv).unwrap();

        let mut reader = csv::Reader::from_reader(data.as_slice());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), COLUMNS.to_vec());

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);

        assert_eq!(&rows[0][0], "A Light in the Attic");
        assert_eq!(&rows[0][1], "Amazon");
        assert_eq!(&rows[0][4], "51.77");
        assert_eq!(&rows[0][6], "OK");
        assert_eq!(&rows[0][7], "");

        assert_eq!(&rows[1][1], "Flipkart");
        assert_eq!(&rows[1][4], "");
        assert_eq!(&rows[1][6], "FETCH_FAILED");
        assert_eq!(&rows[1][7], "HTTP status 404");
    }

    #[test]
    fn tsv_uses_tabs() {
        let data = render(&sample_report(), ReportFormat::Tsv).unwrap();
        let text = String::from_utf8(data).unwrap();
        let header = text.lines().next().unwrap();

        assert_eq!(header, COLUMNS.join("\t"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn json_is_an_array_of_rows() {
        let data = render(&sample_report(), ReportFormat::Json).unwrap();
        let rows: Vec<serde_json::Value> = serde_json::from_slice(&data).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["price"], serde_json::json!(51.77));
        assert_eq!(rows[1]["status"], "FETCH_FAILED");
        assert!(rows[1]["price"].is_null());
    }

    #[test]
    fn xlsx_has_one_sheet_row_per_record() {
        use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};

        let data = render(&sample_report(), ReportFormat::Xlsx).unwrap();
        let mut workbook: Xlsx<_> = open_workbook_from_rs(std::io::Cursor::new(data)).unwrap();
        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        let rows: Vec<&[Data]> = range.rows().collect();

        assert_eq!(rows.len(), 3);
        let header: Vec<String> = rows[0].iter().map(|cell| cell.to_string()).collect();
        assert_eq!(header, COLUMNS);

        assert_eq!(rows[1][1], Data::String("Amazon".to_string()));
        assert_eq!(rows[1][4], Data::Float(51.77));
        assert_eq!(rows[1][6], Data::String("OK".to_string()));

        assert_eq!(rows[2][1], Data::String("Flipkart".to_string()));
        assert_eq!(rows[2][4], Data::Empty);
        assert_eq!(rows[2][6], Data::String("FETCH_FAILED".to_string()));
        assert_eq!(rows[2][7], Data::String("HTTP status 404".to_string()));
    }

    #[test]
    fn empty_report_still_has_a_header() {
        let data = render(&Report::new(), ReportFormat::Csv).unwrap();
        let text = String::from_utf8(data).unwrap();
        assert_eq!(text.trim_end(), COLUMNS.join(","));
    }

    #[test]
    fn format_is_inferred_from_extension() {
        assert_eq!(
            ReportFormat::from_path(Path::new("out/report.TSV")),
            Some(ReportFormat::Tsv)
        );
        assert_eq!(
            ReportFormat::from_path(Path::new("report.json")),
            Some(ReportFormat::Json)
        );
        assert_eq!(
            ReportFormat::from_path(Path::new("report.xlsx")),
            Some(ReportFormat::Xlsx)
        );
        assert_eq!(ReportFormat::from_path(Path::new("report.ods")), None);
        assert_eq!(ReportFormat::from_path(Path::new("report")), None);
    }
}
