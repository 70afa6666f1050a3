//! File exports
//!
//! Pure projections of already-loaded records into CSV or PDF bytes. Nothing
//! here touches the database; the export service gathers the rows first.

pub mod csv_export;
pub mod pdf_export;

use chrono::{DateTime, FixedOffset, Utc};

pub use csv_export::CsvExporter;
pub use pdf_export::PdfExporter;

/// Output kind of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Pdf => "pdf",
        }
    }

    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv; charset=utf-8",
            Self::Pdf => "application/pdf",
        }
    }
}

/// Rendered file, ready to be streamed as an attachment
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename: String,
}

impl ExportFile {
    /// File named `{stem}_{YYYYmmdd_HHMMSS}.{ext}`
    pub fn timestamped(bytes: Vec<u8>, format: ExportFormat, stem: &str, at: DateTime<Utc>) -> Self {
        Self {
            bytes,
            content_type: format.content_type(),
            filename: format!(
                "{stem}_{}.{}",
                at.format("%Y%m%d_%H%M%S"),
                format.extension()
            ),
        }
    }

    /// File with a caller-chosen stem, no timestamp
    pub fn named(bytes: Vec<u8>, format: ExportFormat, stem: &str) -> Self {
        Self {
            bytes,
            content_type: format.content_type(),
            filename: format!("{stem}.{}", format.extension()),
        }
    }
}

/// Rendering failures. Both map to a 500 `EXPORT_ERROR`.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("export buffer failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF rendering failed: {0}")]
    Pdf(String),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Timestamps as shown to people, shifted into the configured offset
#[derive(Debug, Clone, Copy)]
pub struct DisplayDates {
    offset: FixedOffset,
}

impl DisplayDates {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// `dd/mm/YYYY HH:MM`
    pub fn datetime(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.offset)
            .format("%d/%m/%Y %H:%M")
            .to_string()
    }

    /// `dd/mm/YYYY`
    pub fn date(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.offset).format("%d/%m/%Y").to_string()
    }
}

/// Hours without a trailing `.0` for whole values
pub(crate) fn format_hours(hours: f64) -> String {
    hours.to_string()
}
