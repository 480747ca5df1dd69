use crate::config::toml_config::MonitorConfig;
use crate::core::report_writer::ReportFormat;
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "price-monitor")]
#[command(about = "Checks competitor prices for configured products and writes a spreadsheet report")]
pub struct CliConfig {
    /// Path to TOML configuration file (built-in sample catalogue when omitted)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Report file to write, overrides [output] from the config
    #[arg(short, long)]
    pub output: Option<String>,

    /// Report format: csv, tsv, json or xlsx
    #[arg(long)]
    pub format: Option<ReportFormat>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Dry run - show what would be checked without fetching anything
    #[arg(long)]
    pub dry_run: bool,
}

impl CliConfig {
    /// Loads the configuration file (or the built-in one) and applies command line overrides.
    pub fn load_monitor_config(&self) -> Result<MonitorConfig> {
        let mut config = match &self.config {
            Some(path) => MonitorConfig::from_file(path)?,
            None => MonitorConfig::default(),
        };

        if let Some(output) = &self.output {
            config.output.path = Some(output.clone());
        }
        if let Some(format) = self.format {
            config.output.format = Some(format);
        }
        if let Some(timeout) = self.timeout {
            config.fetch.timeout_seconds = Some(timeout);
        }

        Ok(config)
    }
}
