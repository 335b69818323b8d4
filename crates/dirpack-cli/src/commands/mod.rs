//! Subcommand implementations.

pub mod completion;
pub mod create;
pub mod list;

use crate::cli::SelectionArgs;
use crate::error::add_selection_context;
use anyhow::Result;
use dirpack_core::DirectoryWalker;
use dirpack_core::EntrySink;
use dirpack_core::SelectionReport;
use dirpack_core::Selector;
use dirpack_core::WalkMode;

/// Runs the entry-point the selection flags describe.
pub fn run_selection<S: EntrySink>(
    args: &SelectionArgs,
    selector: &mut Selector<S>,
) -> Result<SelectionReport> {
    let root = args.root.as_path();
    let prefix = args.prefix.as_str();

    let result = if let Some(glob) = &args.glob {
        if args.recursive {
            selector.add_files_from_glob_recursive(root, glob, prefix)
        } else {
            selector.add_files_from_glob(root, glob, prefix)
        }
    } else if let Some(regex) = &args.regex {
        if args.recursive {
            selector.add_files_from_regex_recursive(root, regex, prefix)
        } else {
            selector.add_files_from_regex(root, regex, prefix)
        }
    } else if let Some(ignore) = args.ignore_set() {
        let mode = if args.recursive {
            WalkMode::Recursive
        } else {
            WalkMode::Flat
        };
        DirectoryWalker::new(root, mode)
            .with_config(selector.config())
            .walk()
            .and_then(|walk| selector.add_files_from_iter(walk.ignoring(ignore), prefix))
    } else if args.recursive {
        selector.add_dir_recursive(root, prefix)
    } else {
        selector.add_dir(root, prefix)
    };

    add_selection_context(result, root)
}
