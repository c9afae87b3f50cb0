//! Trash command implementation.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::{anyhow, Result};
use humansize::{format_size, BINARY};
use indicatif::ProgressBar;

use crate::classifier;
use crate::cli::TrashArgs;
use crate::config::Config;
use crate::explorer::Explorer;

/// Run the trash command.
pub fn run(args: TrashArgs, config: &Config) -> Result<()> {
    let path = args
        .path
        .canonicalize()
        .unwrap_or_else(|_| args.path.clone());

    let explorer = Explorer::new(config)?;

    // Show what is about to go, with a live measurement
    let total = explorer.overview(&path)?;
    println!("{}  {}", format_size(total, BINARY), path.display());

    let path_str = path.to_string_lossy();
    if classifier::is_handled_by_mo_clean(&path_str) {
        println!("Note: this path is managed by the deep-clean routine.");
    } else if classifier::is_cleanable_dir(&path_str) {
        println!("Note: this looks like a build-artifact directory; the purge flow can also reclaim it.");
    }

    if !args.force {
        print!("\nMove to trash? [y/N] ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    let counter = AtomicU64::new(0);
    let files = std::thread::scope(|scope| {
        let worker = scope.spawn(|| explorer.trash(&path, &counter));

        let bar = ProgressBar::new_spinner();
        while !worker.is_finished() {
            bar.set_message(format!("{} files", counter.load(Ordering::Relaxed)));
            bar.tick();
            std::thread::sleep(Duration::from_millis(100));
        }
        bar.finish_and_clear();

        worker.join().map_err(|_| anyhow!("trash worker panicked"))
    })??;

    println!(
        "Moved {} file{} ({}) to the trash.",
        files,
        if files == 1 { "" } else { "s" },
        format_size(total, BINARY)
    );

    Ok(())
}
