//! Explore command: hands off to the TUI.

use anyhow::Result;

use crate::cli::ExploreArgs;
use crate::config::Config;

/// Run the interactive explorer.
pub fn run(args: ExploreArgs, config: &Config) -> Result<()> {
    let root = args.path.canonicalize()?;
    crate::tui::run(root, config)?;
    Ok(())
}
