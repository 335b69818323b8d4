//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use clap_complete::Shell;
use dirpack_core::DirectoryPolicy;
use dirpack_core::IgnoreMatch;
use dirpack_core::IgnoreSet;
use dirpack_core::SelectionConfig;
use dirpack_core::SymlinkPolicy;
use std::path::Path;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dirpack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show which entries a selection would add, without writing anything
    List(ListArgs),
    /// Create an archive from a directory selection
    Create(CreateArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

/// Selection flags shared by `list` and `create`.
#[derive(clap::Args)]
pub struct SelectionArgs {
    /// Directory to select entries from
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Descend into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Only select entries whose relative path matches this glob
    #[arg(short, long, value_name = "PATTERN", conflicts_with = "regex")]
    pub glob: Option<String>,

    /// Only select entries whose relative path contains a match of this regex
    #[arg(short = 'e', long, value_name = "PATTERN")]
    pub regex: Option<String>,

    /// Leave out an entry and everything below it (can be repeated)
    #[arg(
        short = 'x',
        long = "ignore",
        value_name = "PATH",
        conflicts_with_all = ["glob", "regex"]
    )]
    pub ignore: Vec<String>,

    /// Let ignore entries also match at the end of deeper paths
    #[arg(long, requires = "ignore")]
    pub ignore_suffix: bool,

    /// Prefix prepended to every name in the archive
    #[arg(short, long, value_name = "PREFIX", default_value = "")]
    pub prefix: String,

    /// Only register directories that are empty on disk
    #[arg(long)]
    pub empty_dirs_only: bool,

    /// Follow symbolic links
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Maximum depth of a recursive walk
    #[arg(long, value_name = "DEPTH")]
    pub max_depth: Option<usize>,
}

impl SelectionArgs {
    /// Builds the core configuration from the flags.
    pub fn config(&self) -> SelectionConfig {
        let directories = if self.empty_dirs_only {
            DirectoryPolicy::EmptyOnly
        } else {
            DirectoryPolicy::All
        };
        let symlinks = if self.follow_symlinks {
            SymlinkPolicy::Follow
        } else {
            SymlinkPolicy::Skip
        };
        SelectionConfig::default()
            .with_directories(directories)
            .with_symlinks(symlinks)
            .with_max_depth(self.max_depth)
    }

    /// Builds the ignore set, or `None` when nothing is ignored.
    pub fn ignore_set(&self) -> Option<IgnoreSet> {
        if self.ignore.is_empty() {
            return None;
        }
        let mode = if self.ignore_suffix {
            IgnoreMatch::PathSuffix
        } else {
            IgnoreMatch::Exact
        };
        Some(IgnoreSet::new(&self.ignore).with_match(mode))
    }
}

#[derive(clap::Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,
}

#[derive(clap::Args)]
pub struct CreateArgs {
    /// Output archive file path
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Archive format (default: detected from the output extension)
    #[arg(short, long, value_enum)]
    pub format: Option<ArchiveFormat>,

    /// Compression level (0-9, 0 stores without compression)
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u8).range(0..=9))]
    pub compression_level: Option<u8>,

    /// Overwrite output file if exists
    #[arg(long)]
    pub force: bool,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Container formats `create` can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ArchiveFormat {
    /// ZIP archive
    Zip,
    /// Uncompressed TAR archive
    Tar,
    /// Gzip-compressed TAR archive
    #[value(name = "tar.gz")]
    TarGz,
}

impl ArchiveFormat {
    /// Detects the format from a file name.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_ascii_lowercase();
        if name.ends_with(".zip") {
            Some(Self::Zip)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(Self::TarGz)
        } else if name.ends_with(".tar") {
            Some(Self::Tar)
        } else {
            None
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::Tar => "tar",
            Self::TarGz => "tar.gz",
        }
    }
}

impl std::fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
