use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Spelunk - a disk usage explorer with safe trash-based deletion
#[derive(Parser, Debug)]
#[command(name = "spelunk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze disk usage of a directory
    Scan(ScanArgs),

    /// Move a file or directory to the recoverable trash
    Trash(TrashArgs),

    /// Launch the interactive explorer
    Explore(ExploreArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Directory to analyze
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Show top N entries and largest files
    #[arg(short = 'n', long, value_name = "N")]
    pub top: Option<usize>,

    /// Bypass the result cache and force a fresh scan
    #[arg(short, long)]
    pub fresh: bool,

    /// Concurrent subtree limit
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct TrashArgs {
    /// Path to move to the trash
    pub path: PathBuf,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ExploreArgs {
    /// Starting directory
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        // Validates the CLI definition is correct
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_scan_command() {
        let cli = Cli::parse_from(["spelunk", "scan", "/home"]);
        match cli.command {
            Command::Scan(args) => {
                assert_eq!(args.path, PathBuf::from("/home"));
                assert!(!args.fresh);
            }
            _ => panic!("Expected Scan command"),
        }
    }

    #[test]
    fn parse_scan_with_options() {
        let cli = Cli::parse_from(["spelunk", "scan", "--fresh", "-n", "5", "--json", "/data"]);
        match cli.command {
            Command::Scan(args) => {
                assert!(args.fresh);
                assert!(args.json);
                assert_eq!(args.top, Some(5));
            }
            _ => panic!("Expected Scan command"),
        }
    }

    #[test]
    fn parse_trash_requires_path() {
        assert!(Cli::try_parse_from(["spelunk", "trash"]).is_err());

        let cli = Cli::parse_from(["spelunk", "trash", "--force", "/tmp/junk"]);
        match cli.command {
            Command::Trash(args) => {
                assert!(args.force);
                assert_eq!(args.path, PathBuf::from("/tmp/junk"));
            }
            _ => panic!("Expected Trash command"),
        }
    }

    #[test]
    fn global_verbose_flag() {
        let cli = Cli::parse_from(["spelunk", "-vvv", "scan"]);
        assert_eq!(cli.verbose, 3);
    }
}
