//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use crate::cli::ArchiveFormat;
use anyhow::Result;
use dirpack_core::MemorySink;
use dirpack_core::SelectionReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct EntryOutput {
    name: String,
    directory: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<u64>,
}

#[derive(Debug, Serialize)]
struct SelectionOutput {
    root: String,
    entries: Vec<EntryOutput>,
    files_added: usize,
    directories_added: usize,
    bytes_read: u64,
    entries_skipped: usize,
    duration_ms: u128,
    warnings: Vec<String>,
}

fn selection_output(root: &Path, sink: &MemorySink, report: &SelectionReport) -> SelectionOutput {
    let entries = report
        .local_names
        .iter()
        .map(|name| EntryOutput {
            name: name.clone(),
            directory: sink.is_directory(name),
            size: sink.get(name).map(|content| content.len() as u64),
        })
        .collect();

    SelectionOutput {
        root: root.display().to_string(),
        entries,
        files_added: report.files_added,
        directories_added: report.directories_added,
        bytes_read: report.bytes_read,
        entries_skipped: report.entries_skipped,
        duration_ms: report.duration.as_millis(),
        warnings: report.warnings.clone(),
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_selection(
        &self,
        root: &Path,
        sink: &MemorySink,
        report: &SelectionReport,
    ) -> Result<()> {
        let output = JsonOutput::success("list", selection_output(root, sink, report));
        Self::output(&output)
    }

    fn format_creation_result(
        &self,
        output_path: &Path,
        format: ArchiveFormat,
        report: &SelectionReport,
    ) -> Result<()> {
        #[derive(Serialize)]
        struct CreationOutput {
            output_path: String,
            format: &'static str,
            files_added: usize,
            directories_added: usize,
            bytes_read: u64,
            entries_skipped: usize,
            duration_ms: u128,
            warnings: Vec<String>,
        }

        let data = CreationOutput {
            output_path: output_path.display().to_string(),
            format: format.as_str(),
            files_added: report.files_added,
            directories_added: report.directories_added,
            bytes_read: report.bytes_read,
            entries_skipped: report.entries_skipped,
            duration_ms: report.duration.as_millis(),
            warnings: report.warnings.clone(),
        };

        let output = JsonOutput::success("create", data);
        Self::output(&output)
    }
}
