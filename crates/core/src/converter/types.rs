//! Types for the converter module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Report format, named after the nbconvert exporter that produces it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// PDF through LaTeX
    #[default]
    Pdf,
    /// PDF through a headless browser
    Webpdf,
    Html,
    /// LaTeX source
    Latex,
    Markdown,
    /// reStructuredText
    Rst,
}

impl ReportFormat {
    /// Value passed to `nbconvert --to`.
    pub fn exporter(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Webpdf => "webpdf",
            Self::Html => "html",
            Self::Latex => "latex",
            Self::Markdown => "markdown",
            Self::Rst => "rst",
        }
    }

    /// Returns the file extension nbconvert gives the report.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf | Self::Webpdf => "pdf",
            Self::Html => "html",
            Self::Latex => "tex",
            Self::Markdown => "md",
            Self::Rst => "rst",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.exporter())
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "webpdf" => Ok(Self::Webpdf),
            "html" => Ok(Self::Html),
            "latex" => Ok(Self::Latex),
            "markdown" => Ok(Self::Markdown),
            "rst" => Ok(Self::Rst),
            other => Err(format!(
                "unsupported report format '{}' (expected pdf, webpdf, html, latex, markdown or rst)",
                other
            )),
        }
    }
}

/// A notebook-to-report conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionJob {
    /// Executed notebook to convert.
    pub input_path: PathBuf,
    pub format: ReportFormat,
}

impl ConversionJob {
    pub fn new(input_path: PathBuf, format: ReportFormat) -> Self {
        Self { input_path, format }
    }

    /// Where nbconvert writes the report.
    pub fn output_path(&self) -> PathBuf {
        report_path_for(&self.input_path, self.format)
    }
}

/// Path of the report rendered from `notebook` in `format`.
pub fn report_path_for(notebook: &Path, format: ReportFormat) -> PathBuf {
    notebook.with_extension(format.extension())
}

/// Result of a successful conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    /// Path to the report.
    pub output_path: PathBuf,
    /// Size of the report in bytes.
    pub output_size_bytes: u64,
    /// Wall-clock time spent converting.
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_replaces_extension() {
        let job = ConversionJob::new(
            PathBuf::from("/out/cross_correlation_foo/output_foo_vv_OPERA_RTC_Cross_Correlation.ipynb"),
            ReportFormat::Pdf,
        );
        assert_eq!(
            job.output_path(),
            PathBuf::from("/out/cross_correlation_foo/output_foo_vv_OPERA_RTC_Cross_Correlation.pdf")
        );
    }

    #[test]
    fn test_output_path_uses_exporter_extension() {
        let nb = Path::new("report.ipynb");
        assert_eq!(report_path_for(nb, ReportFormat::Html), PathBuf::from("report.html"));
        assert_eq!(report_path_for(nb, ReportFormat::Latex), PathBuf::from("report.tex"));
        assert_eq!(report_path_for(nb, ReportFormat::Markdown), PathBuf::from("report.md"));
        assert_eq!(report_path_for(nb, ReportFormat::Webpdf), PathBuf::from("report.pdf"));
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("latex".parse::<ReportFormat>().unwrap(), ReportFormat::Latex);
        assert_eq!("WebPDF".parse::<ReportFormat>().unwrap(), ReportFormat::Webpdf);
        assert!("script".parse::<ReportFormat>().is_err());
        assert!("".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_format_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            format: ReportFormat,
        }
        let w: Wrapper = toml::from_str(r#"format = "webpdf""#).unwrap();
        assert_eq!(w.format, ReportFormat::Webpdf);
        assert!(toml::from_str::<Wrapper>(r#"format = "notebook""#).is_err());
    }
}
