//! Plain-text audit certificate rendered from a finished report

use std::fmt;

use chrono::{DateTime, Utc};
use shared::AnalysisReport;

/// Attachment name for a certificate issued at `issued_at`
pub fn certificate_filename(issued_at: DateTime<Utc>) -> String {
    format!("audit_certificate_{}.txt", issued_at.format("%Y%m%d_%H%M%S"))
}

/// Render the certificate text. Only `report` and `issued_at` are read.
pub fn render_certificate(report: &AnalysisReport, issued_at: DateTime<Utc>) -> String {
    Certificate { report, issued_at }.to_string()
}

struct Certificate<'a> {
    report: &'a AnalysisReport,
    issued_at: DateTime<Utc>,
}

fn heading(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "\n{}\n{}", title, "-".repeat(title.len()))
}

impl fmt::Display for Certificate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        let request = &report.request;
        let assessment = &report.assessment;
        let sources = &report.sources;

        writeln!(f, "ENVIRONMENTAL AUDIT CERTIFICATE")?;
        writeln!(f, "===============================\n")?;
        writeln!(f, "Issue:            {}", request.title)?;
        writeln!(f, "Category:         {}", request.category)?;
        writeln!(f, "Location:         {}", request.location)?;
        writeln!(
            f,
            "Analysis Period:  {} to {}",
            report.summary.first_date.format("%Y-%m-%d"),
            report.summary.latest_date.format("%Y-%m-%d")
        )?;
        writeln!(f, "Issued:           {}", self.issued_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
        writeln!(f, "Report ID:        {}", report.id)?;

        heading(f, "RISK ASSESSMENT")?;
        writeln!(
            f,
            "Risk Level:             {}",
            assessment.risk_level.as_str().to_uppercase()
        )?;
        writeln!(
            f,
            "Deforestation Detected: {}",
            if assessment.deforestation_detected { "Yes" } else { "No" }
        )?;
        writeln!(f, "Vegetation Health:      {}", assessment.vegetation_health)?;
        writeln!(f, "Confidence Score:       {:.0}%", assessment.confidence * 100.0)?;

        heading(f, "SUMMARY")?;
        writeln!(f, "{}", assessment.summary)?;

        heading(f, "RECOMMENDATIONS")?;
        if assessment.recommendations.is_empty() {
            writeln!(f, "None")?;
        }
        for (i, rec) in assessment.recommendations.iter().enumerate() {
            writeln!(f, "{}. {}", i + 1, rec)?;
        }

        heading(f, "DATA SOURCES")?;
        writeln!(f, "Imagery:          {}", sources.imagery)?;
        writeln!(f, "Assessment:       {}", sources.assessment)?;
        writeln!(
            f,
            "Weather:          {}",
            if sources.live_weather { "Live conditions" } else { "Unavailable" }
        )?;
        writeln!(f, "Nearby disasters: {}", sources.disaster_count)?;

        if !report.advisories.is_empty() {
            heading(f, "NOTICES")?;
            for advisory in &report.advisories {
                writeln!(f, "- [{}] {}", advisory.provider, advisory.message)?;
            }
        }
        Ok(())
    }
}
