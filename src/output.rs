//! Report printing.

use crate::model::{CheckReport, Verdict};
use anyhow::Result;

/// Output format for check reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable evidence lines
    Text,
    /// JSON format for programmatic use
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use 'text' or 'json'", s)),
        }
    }
}

pub fn print_report(report: &CheckReport, format: OutputFormat) -> Result<()> {
    print!("{}", format_report(report, format)?);
    Ok(())
}

/// Renders a report to a string, for stdout or file output.
pub fn format_report(report: &CheckReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(report)?)),
        OutputFormat::Text => {
            let mut out = String::new();
            out.push_str(&format!(
                "Checked {} for {} (fixed in {}) at {}\n",
                report.repo_url,
                report.package,
                report.fixed_version,
                report.checked_at.format("%Y-%m-%d %H:%M:%S UTC")
            ));
            for line in &report.evidence {
                out.push_str(line);
                out.push('\n');
            }
            let marker = match report.verdict {
                Verdict::Inconclusive => "[INCONCLUSIVE]",
                v if v.is_vulnerable() => "[VULNERABLE]",
                _ => "[SAFE]",
            };
            out.push_str(&format!("Verdict: {} {}\n", marker, report.verdict));
            Ok(out)
        }
    }
}
