//! Create command implementation.

use crate::cli::ArchiveFormat;
use crate::cli::CreateArgs;
use crate::commands::run_selection;
use crate::output::OutputFormatter;
use crate::progress;
use crate::progress::ProgressSink;
use anyhow::Context;
use anyhow::Result;
use anyhow::anyhow;
use anyhow::bail;
use dirpack_core::EntrySink;
use dirpack_core::SelectionConfig;
use dirpack_core::SelectionReport;
use dirpack_core::Selector;
use dirpack_core::TarSink;
use dirpack_core::ZipSink;
use std::fs;
use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

const DEFAULT_COMPRESSION_LEVEL: u8 = 6;

pub fn execute(args: &CreateArgs, formatter: &dyn OutputFormatter, show_progress: bool) -> Result<()> {
    let format = resolve_format(args)?;

    if args.output.exists() && !args.force {
        bail!(
            "Output file '{}' already exists\n\
             HINT: Use --force to overwrite.",
            args.output.display()
        );
    }

    let result = write_archive(args, format, show_progress && progress::should_show());
    let report = match result {
        Ok(report) => report,
        Err(err) => {
            // A failed selection leaves a truncated archive behind.
            let _ = fs::remove_file(&args.output);
            return Err(err);
        }
    };

    tracing::debug!(
        output = %args.output.display(),
        %format,
        entries = report.total_entries(),
        "archive written"
    );
    formatter.format_creation_result(&args.output, format, &report)?;

    Ok(())
}

fn resolve_format(args: &CreateArgs) -> Result<ArchiveFormat> {
    args.format
        .or_else(|| ArchiveFormat::from_path(&args.output))
        .ok_or_else(|| {
            anyhow!(
                "Cannot determine archive format from '{}'\n\
                 HINT: Use an extension of .zip, .tar, .tar.gz or .tgz, or pass --format.",
                args.output.display()
            )
        })
}

fn write_archive(args: &CreateArgs, format: ArchiveFormat, show_progress: bool) -> Result<SelectionReport> {
    let file = File::create(&args.output)
        .with_context(|| format!("failed to create '{}'", args.output.display()))?;
    let writer = BufWriter::new(file);
    let config = selection_config(args);
    let level = args.compression_level.unwrap_or(DEFAULT_COMPRESSION_LEVEL);

    match format {
        ArchiveFormat::Zip => {
            let sink = ZipSink::new(writer).with_compression_level(level)?;
            let (sink, report) = select_into(args, config, sink, show_progress)?;
            let writer = sink.finish()?;
            flush(writer, &args.output)?;
            Ok(report)
        }
        ArchiveFormat::Tar => {
            let (sink, report) = select_into(args, config, TarSink::new(writer), show_progress)?;
            let writer = sink.finish()?;
            flush(writer, &args.output)?;
            Ok(report)
        }
        ArchiveFormat::TarGz => {
            let sink = TarSink::gzip(writer, level)?;
            let (sink, report) = select_into(args, config, sink, show_progress)?;
            let writer = sink.finish_gzip()?;
            flush(writer, &args.output)?;
            Ok(report)
        }
    }
}

fn select_into<S: EntrySink>(
    args: &CreateArgs,
    config: SelectionConfig,
    sink: S,
    show_progress: bool,
) -> Result<(S, SelectionReport)> {
    let sink = if show_progress {
        ProgressSink::new(sink, "Adding")
    } else {
        ProgressSink::hidden(sink)
    };

    let mut selector = Selector::new(sink).with_config(config);
    let report = run_selection(&args.selection, &mut selector)?;
    Ok((selector.into_sink().into_inner(), report))
}

/// Keeps the archive being written out of its own selection.
fn selection_config(args: &CreateArgs) -> SelectionConfig {
    let config = args.selection.config();
    match archive_inside_root(&args.output, &args.selection.root) {
        Some(walked) => {
            tracing::debug!(path = %walked.display(), "excluding output archive from selection");
            config.with_excluded(walked)
        }
        None => config,
    }
}

/// Path under which a walk of `root` meets `output`, if it lies inside it.
fn archive_inside_root(output: &Path, root: &Path) -> Option<PathBuf> {
    let output = output.canonicalize().ok()?;
    let canonical_root = root.canonicalize().ok()?;
    let relative = output.strip_prefix(&canonical_root).ok()?;
    Some(root.join(relative))
}

fn flush(mut writer: BufWriter<File>, output: &Path) -> Result<()> {
    writer
        .flush()
        .with_context(|| format!("failed to write '{}'", output.display()))
}
