//! List command implementation

use crate::cli::ListArgs;
use crate::commands::run_selection;
use crate::output::OutputFormatter;
use anyhow::Result;
use dirpack_core::MemorySink;
use dirpack_core::Selector;

pub fn execute(args: &ListArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let mut selector = Selector::new(MemorySink::new()).with_config(args.selection.config());
    let report = run_selection(&args.selection, &mut selector)?;

    formatter.format_selection(&args.selection.root, selector.sink(), &report)?;

    Ok(())
}
