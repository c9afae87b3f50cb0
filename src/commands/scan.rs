//! Scan command implementation

use std::time::Duration;

use anyhow::{anyhow, Result};
use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::ScanArgs;
use crate::config::Config;
use crate::explorer::{CacheStatus, Explorer};
use crate::scanner::ScanResult;

/// Run the scan command
pub fn run(args: ScanArgs, config: &Config) -> Result<()> {
    let mut config = config.clone();
    if let Some(jobs) = args.jobs {
        config.scanner.fan_out = jobs;
    }
    let top = args.top.unwrap_or(config.explorer.top);

    let explorer = Explorer::new(&config)?;
    let progress = explorer.progress();

    tracing::info!(path = %args.path.display(), fresh = args.fresh, "Scanning directory");

    let (result, status) = std::thread::scope(|scope| {
        let worker = scope.spawn(|| {
            if args.fresh {
                explorer.scan(&args.path).map(|r| (r, CacheStatus::Miss))
            } else {
                explorer.cached_scan(&args.path)
            }
        });

        let bar = (!args.json).then(|| {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{spinner} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar
        });

        while !worker.is_finished() {
            if let Some(bar) = &bar {
                bar.set_message(format!(
                    "{} files, {} dirs, {}",
                    progress.files(),
                    progress.dirs(),
                    format_size(progress.bytes(), BINARY)
                ));
                bar.tick();
            }
            std::thread::sleep(Duration::from_millis(100));
        }
        if let Some(bar) = bar {
            bar.finish_and_clear();
        }

        worker.join().map_err(|_| anyhow!("scan worker panicked"))
    })??;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    print_listing(&result, top);

    println!();
    match status {
        // Counters only ran if a live scan did
        CacheStatus::Miss => println!(
            "Total: {} in {} files, {} directories",
            format_size(result.total_size, BINARY),
            progress.files(),
            progress.dirs(),
        ),
        CacheStatus::Hit => println!(
            "Total: {} (cached)",
            format_size(result.total_size, BINARY)
        ),
    }
    if progress.errors() > 0 {
        println!(
            "Note: {} entries could not be read and contribute nothing",
            progress.errors()
        );
    }

    Ok(())
}

fn print_listing(result: &ScanResult, top: usize) {
    for entry in result.entries.iter().take(top) {
        println!(
            "{:>12}  {}",
            format_size(entry.size, BINARY),
            entry.display_name()
        );
    }
    if result.entries.len() > top {
        println!("  ... and {} more entries", result.entries.len() - top);
    }

    if !result.large_files.is_empty() {
        println!();
        println!("Largest files:");
        for file in result.large_files.iter().take(top) {
            println!(
                "{:>12}  {}",
                format_size(file.size, BINARY),
                file.path.display()
            );
        }
    }
}
