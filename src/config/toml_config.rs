use crate::adapters::http::{FetchSettings, DEFAULT_TIMEOUT_SECONDS, DEFAULT_USER_AGENT};
use crate::core::extract::SiteSelectors;
use crate::core::report_writer::ReportFormat;
use crate::domain::model::{Competitor, Product};
use crate::utils::error::{MonitorError, Result};
use crate::utils::validation::{
    validate_header, validate_non_empty_string, validate_path, validate_range, validate_selector,
    validate_url, Validate,
};
use chrono::{DateTime, Local};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

pub const DEFAULT_REPORT_DIRECTORY: &str = "report";
const SAMPLE_PAGE: &str = "http://books.toscrape.com/catalogue/a-light-in-the-attic_1000/index.html";

static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

/// Everything a run needs. Loaded once and passed down by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default)]
    pub monitor: MonitorSection,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub selectors: SiteSelectors,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitorSection {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
    pub retry_attempts: Option<u32>,
    pub retry_delay_seconds: Option<u64>,
    pub headers: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
    pub directory: Option<String>,
    pub format: Option<ReportFormat>,
}

impl Default for MonitorConfig {
    /// The built-in catalogue: one book checked against two shops.
    fn default() -> Self {
        Self {
            monitor: MonitorSection::default(),
            fetch: FetchConfig::default(),
            selectors: SiteSelectors::default(),
            output: OutputConfig::default(),
            products: vec![Product {
                name: "A Light in the Attic".to_string(),
                competitors: vec![
                    Competitor::new("Amazon", SAMPLE_PAGE),
                    Competitor::new("Flipkart", SAMPLE_PAGE),
                ],
            }],
        }
    }
}

impl MonitorConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MonitorError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| MonitorError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SHOP_URL})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn name(&self) -> &str {
        self.monitor
            .name
            .as_deref()
            .unwrap_or("competitor-price-monitor")
    }

    pub fn competitor_count(&self) -> usize {
        self.products.iter().map(|p| p.competitors.len()).sum()
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.fetch.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            timeout: Duration::from_secs(self.timeout_seconds()),
            user_agent: self
                .fetch
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            headers: self.fetch.headers.clone().unwrap_or_default(),
            retry_attempts: self.fetch.retry_attempts.unwrap_or(0),
            retry_delay: Duration::from_secs(self.fetch.retry_delay_seconds.unwrap_or(1)),
        }
    }

    /// Global selectors with the competitor's overrides applied.
    pub fn selectors_for(&self, competitor: &Competitor) -> SiteSelectors {
        self.selectors.with_overrides(competitor.selectors.as_ref())
    }

    pub fn output_format(&self) -> ReportFormat {
        self.output
            .format
            .or_else(|| {
                self.output
                    .path
                    .as_deref()
                    .and_then(|p| ReportFormat::from_path(Path::new(p)))
            })
            .unwrap_or_default()
    }

    /// Configured path, or `<directory>/price_summary_<YYYYmmdd_HHMM>.<ext>`.
    pub fn output_path(&self, now: DateTime<Local>) -> PathBuf {
        if let Some(path) = &self.output.path {
            return PathBuf::from(path);
        }

        let directory = self
            .output
            .directory
            .as_deref()
            .unwrap_or(DEFAULT_REPORT_DIRECTORY);

        Path::new(directory).join(format!(
            "price_summary_{}.{}",
            now.format("%Y%m%d_%H%M"),
            self.output_format().extension()
        ))
    }

    /// URL problems are not fatal: such competitors end up as FETCH_FAILED rows.
    pub fn url_warnings(&self) -> Vec<MonitorError> {
        self.products
            .iter()
            .enumerate()
            .flat_map(|(p, product)| {
                product
                    .competitors
                    .iter()
                    .enumerate()
                    .filter_map(move |(c, competitor)| {
                        validate_url(
                            &format!("products[{}].competitors[{}].url", p, c),
                            &competitor.url,
                        )
                        .err()
                    })
            })
            .collect()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if self.products.is_empty() {
            return Err(MonitorError::MissingConfigError {
                field: "products".to_string(),
            });
        }

        validate_range("fetch.timeout_seconds", self.timeout_seconds(), 1, 300)?;
        if let Some(attempts) = self.fetch.retry_attempts {
            validate_range("fetch.retry_attempts", attempts, 0, 10)?;
        }
        for (name, value) in self.fetch.headers.iter().flatten() {
            validate_header(&format!("fetch.headers.{}", name), name, value)?;
        }

        validate_selector("selectors.title", &self.selectors.title)?;
        validate_selector("selectors.price", &self.selectors.price)?;
        if let Some(availability) = &self.selectors.availability {
            validate_selector("selectors.availability", availability)?;
        }

        for (p, product) in self.products.iter().enumerate() {
            validate_non_empty_string(&format!("products[{}].name", p), &product.name)?;

            for (c, competitor) in product.competitors.iter().enumerate() {
                let field = format!("products[{}].competitors[{}]", p, c);
                validate_non_empty_string(&format!("{}.name", field), &competitor.name)?;

                if let Some(overrides) = &competitor.selectors {
                    let selectors = [
                        ("title", &overrides.title),
                        ("price", &overrides.price),
                        ("availability", &overrides.availability),
                    ];
                    for (key, selector) in selectors {
                        if let Some(selector) = selector {
                            validate_selector(&format!("{}.selectors.{}", field, key), selector)?;
                        }
                    }
                }
            }
        }

        if let Some(path) = &self.output.path {
            validate_path("output.path", path)?;
        }
        if let Some(directory) = &self.output.directory {
            validate_path("output.directory", directory)?;
        }

        Ok(())
    }
}

impl Validate for MonitorConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
