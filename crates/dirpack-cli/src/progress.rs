//! Progress spinner for archive creation.

use console::Term;
use dirpack_core::EntrySink;
use dirpack_core::Result;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use std::time::Duration;

/// Checks if we should show progress (TTY detection).
#[must_use]
pub fn should_show() -> bool {
    Term::stderr().is_term()
}

/// Sink decorator that ticks a spinner for every entry passed through.
///
/// The total is unknown while a walk is running, so this shows a spinner
/// with running entry and byte counts instead of a bounded bar.
pub struct ProgressSink<S> {
    inner: S,
    bar: ProgressBar,
    label: String,
    bytes: u64,
}

impl<S: EntrySink> ProgressSink<S> {
    /// Wraps `inner`, drawing a spinner labelled `message`.
    pub fn new(inner: S, message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self::with_bar(inner, bar, message)
    }

    /// Wraps `inner` without drawing anything.
    pub fn hidden(inner: S) -> Self {
        Self::with_bar(inner, ProgressBar::hidden(), "")
    }

    fn with_bar(inner: S, bar: ProgressBar, label: &str) -> Self {
        Self {
            inner,
            bar,
            label: label.to_string(),
            bytes: 0,
        }
    }

    /// Stops the spinner and returns the wrapped sink.
    pub fn into_inner(self) -> S {
        self.bar.finish_and_clear();
        self.inner
    }

    fn advance(&mut self, local_name: &str, bytes: u64) {
        self.bytes = self.bytes.saturating_add(bytes);
        self.bar.inc(1);
        self.bar.set_message(format!(
            "{} {} entries ({}) {local_name}",
            self.label,
            self.bar.position(),
            humanize_bytes(self.bytes)
        ));
    }
}

impl<S: EntrySink> EntrySink for ProgressSink<S> {
    fn add_file(&mut self, local_name: &str, content: Vec<u8>) -> Result<()> {
        let size = content.len() as u64;
        self.inner.add_file(local_name, content)?;
        self.advance(local_name, size);
        Ok(())
    }

    fn add_empty_directory(&mut self, local_name: &str) -> Result<()> {
        self.inner.add_empty_directory(local_name)?;
        self.advance(local_name, 0);
        Ok(())
    }
}

/// Converts bytes to human-readable format (KB, MB, GB, TB).
fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.1} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
