//! Output formatter trait for CLI results.

use crate::cli::ArchiveFormat;
use anyhow::Result;
use dirpack_core::MemorySink;
use dirpack_core::SelectionReport;
use serde::Serialize;
use std::path::Path;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format the entries a dry-run selection produced
    fn format_selection(&self, root: &Path, sink: &MemorySink, report: &SelectionReport)
    -> Result<()>;

    /// Format archive creation result
    fn format_creation_result(
        &self,
        output_path: &Path,
        format: ArchiveFormat,
        report: &SelectionReport,
    ) -> Result<()>;
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
        }
    }
}
