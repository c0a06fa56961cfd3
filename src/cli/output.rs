//! Output formatting for multiple formats
//!
//! JSON and YAML are the serde views of the reports; the human format is a
//! short text summary with check marks.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::PreflightConfig;
use crate::probe::ProbeReport;
use crate::socket::{Located, Platform};

const RULE_WIDTH: usize = 42;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

/// What `preflight socket` reports
#[derive(Debug, Clone, Serialize)]
pub struct SocketReport {
    pub platform: Platform,
    #[serde(flatten)]
    pub located: Located,
    /// `None` when no ping was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daemon_reachable: Option<bool>,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_socket(&self, report: &SocketReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report)
                .context("Failed to serialize socket report to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(report).context("Failed to serialize socket report to YAML")
            }
            OutputFormat::Human => Ok(self.format_socket_human(report)),
        }
    }

    pub fn format_probes(&self, reports: &[ProbeReport]) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(reports)
                .context("Failed to serialize probe reports to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(reports).context("Failed to serialize probe reports to YAML")
            }
            OutputFormat::Human => Ok(self.format_probes_human(reports)),
        }
    }

    pub fn format_config(&self, config: &PreflightConfig) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&config.to_display_map())
                .context("Failed to serialize config to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(&config.to_display_map())
                .context("Failed to serialize config to YAML"),
            OutputFormat::Human => Ok(config.to_string()),
        }
    }

    fn format_socket_human(&self, report: &SocketReport) -> String {
        let mut output = String::new();

        output.push_str("Container Runtime Socket\n");
        output.push_str(&rule());
        output.push_str(&format!("  Platform: {}\n", report.platform));
        output.push_str(&format!("  Path: {}\n", report.located.path));
        output.push_str(&format!("  Source: {:?}\n", report.located.source));

        if let Some(reachable) = report.daemon_reachable {
            output.push_str(&format!(
                "  Daemon: {} {}\n",
                status_symbol(reachable),
                if reachable { "responding" } else { "not responding" }
            ));
        }

        if !report.located.diagnostics.is_empty() {
            output.push_str("\nDiagnostics\n");
            for diagnostic in &report.located.diagnostics {
                output.push_str(&format!("  {}\n", diagnostic));
            }
        }

        output
    }

    fn format_probes_human(&self, reports: &[ProbeReport]) -> String {
        let mut output = String::new();

        output.push_str("Provider Availability\n");
        output.push_str(&rule());

        if reports.is_empty() {
            output.push_str("No providers configured\n");
            return output;
        }

        for report in reports {
            output.push_str(&format!(
                "{} {}\n",
                status_symbol(report.result.status),
                report.name
            ));
            output.push_str(&format!(
                "  Status: {}\n",
                if report.result.status {
                    "Available"
                } else {
                    "Unavailable"
                }
            ));
            output.push_str(&format!("  Wire Format: {}\n", report.wire_format));
            output.push_str(&format!("  Message: {}\n", report.result.message));
            output.push_str(&format!("  Elapsed: {}ms\n\n", report.elapsed_ms));
        }

        output
    }
}

fn rule() -> String {
    format!("{}\n\n", "\u{2501}".repeat(RULE_WIDTH))
}

fn status_symbol(ok: bool) -> &'static str {
    if ok {
        "\u{2713}"
    } else {
        "\u{2717}"
    }
}
