//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use crate::cli::ArchiveFormat;
use anyhow::Result;
use console::Term;
use console::style;
use dirpack_core::MemorySink;
use dirpack_core::SelectionReport;
use std::path::Path;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn format_number(n: usize) -> String {
        let digits = n.to_string();
        let mut result = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                result.push(',');
            }
            result.push(c);
        }
        result
    }

    fn write_summary(&self, report: &SelectionReport) {
        let _ = self.term.write_line(&format!(
            "  Files:            {}",
            Self::format_number(report.files_added)
        ));
        let _ = self.term.write_line(&format!(
            "  Directories:      {}",
            Self::format_number(report.directories_added)
        ));
        let _ = self.term.write_line(&format!(
            "  Total size:       {}",
            Self::format_size(report.bytes_read)
        ));

        if report.entries_skipped > 0 {
            let _ = self.term.write_line(&format!(
                "  Skipped:          {}",
                Self::format_number(report.entries_skipped)
            ));
        }

        if self.verbose {
            let _ = self
                .term
                .write_line(&format!("  Duration:         {:?}", report.duration));
        }
    }

    fn write_warnings(&self, report: &SelectionReport) {
        if !report.has_warnings() {
            return;
        }

        let _ = self.term.write_line("");
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{}", style("Warnings:").yellow().bold()));
        } else {
            let _ = self.term.write_line("Warnings:");
        }
        for warning in &report.warnings {
            let _ = self.term.write_line(&format!("  - {warning}"));
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_selection(
        &self,
        root: &Path,
        sink: &MemorySink,
        report: &SelectionReport,
    ) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for name in &report.local_names {
            if self.verbose {
                let size = sink
                    .get(name)
                    .map_or_else(|| "-".to_string(), |content| Self::format_size(content.len() as u64));
                let _ = self.term.write_line(&format!("{size:>10}  {name}"));
            } else if self.use_colors && sink.is_directory(name) {
                let _ = self.term.write_line(&format!("{}", style(name).blue().bold()));
            } else {
                let _ = self.term.write_line(name);
            }
        }

        if self.verbose {
            let _ = self.term.write_line("");
            let _ = self
                .term
                .write_line(&format!("Selected from {}", root.display()));
            self.write_summary(report);
        }
        self.write_warnings(report);

        Ok(())
    }

    fn format_creation_result(
        &self,
        output_path: &Path,
        format: ArchiveFormat,
        report: &SelectionReport,
    ) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if self.use_colors {
            let _ = self.term.write_line(&format!(
                "{} Archive created: {} ({format})",
                style("✓").green().bold(),
                output_path.display()
            ));
        } else {
            let _ = self.term.write_line(&format!(
                "Archive created: {} ({format})",
                output_path.display()
            ));
        }

        let _ = self.term.write_line("");
        self.write_summary(report);
        self.write_warnings(report);

        Ok(())
    }
}
