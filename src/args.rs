//! Code to parse the command line using `clap`, and definitions of the parsed
//! result

use clap::{ArgAction, Parser, ValueEnum};
use std::num::NonZeroUsize;
use std::path::PathBuf;

use crate::index::FileId;
use crate::partition::Policy;
use crate::styles::ColorChoice;

/// Returns the parsed command line. Usage errors are reported by `clap` and
/// exit with status 1; `--help` and `--version` exit with status 0.
#[must_use]
pub fn parsed() -> Args {
    match CliArgs::try_parse() {
        Ok(parsed) => Args::from_cli(parsed),
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    }
}

/// The settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// `files` is the list of files from the command line
    pub files: Vec<PathBuf>,
    /// The file to preserve, if chosen on the command line
    pub preserve: Option<FileId>,
    /// What to do with duplicates the preserved file lacks, if chosen on the
    /// command line
    pub policy: Option<Policy>,
    /// Skip the confirmation prompt
    pub assume_yes: bool,
    /// Report, but never write
    pub dry_run: bool,
    /// When to color the output
    pub color: ColorChoice,
    /// How many times `-v` was given
    pub verbose: u8,
    /// Log errors only
    pub quiet: bool,
}

impl Args {
    fn from_cli(parsed: CliArgs) -> Self {
        let policy = parsed.missing.map(|name| match name {
            CliPolicy::Add => Policy::AddToAuthoritative,
            CliPolicy::Keep => Policy::LeaveUnchanged,
            CliPolicy::Remove => Policy::RemoveFromAll,
        });
        Args {
            files: parsed.files,
            preserve: parsed.preserve.map(|n| n.get() - 1),
            policy,
            assume_yes: parsed.yes,
            dry_run: parsed.dry_run,
            color: parsed.color,
            verbose: parsed.verbose,
            quiet: parsed.quiet,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "lindup", version)]
/// Find lines that occur in more than one file, and keep a single copy of each
struct CliArgs {
    #[arg(value_name = "FILE", required = true, num_args = 2..)]
    /// The files to deduplicate (at least two)
    files: Vec<PathBuf>,
    #[arg(short, long, value_name = "N")]
    /// Number of the file whose copies of duplicate lines are preserved
    preserve: Option<NonZeroUsize>,
    #[arg(short, long, value_enum, value_name = "POLICY")]
    /// What to do with duplicate lines the preserved file doesn't have
    missing: Option<CliPolicy>,
    #[arg(short, long)]
    /// Don't ask for confirmation before rewriting files
    yes: bool,
    #[arg(short = 'n', long)]
    /// Show what would change, but change nothing
    dry_run: bool,
    #[arg(long, value_enum, value_name = "WHEN", default_value_t = ColorChoice::Auto)]
    /// When to color the output
    color: ColorChoice,
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    /// Log more (repeat for even more)
    verbose: u8,
    #[arg(short, long)]
    /// Log errors only
    quiet: bool,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy, ValueEnum)]
/// Name of a policy for duplicates the preserved file lacks
enum CliPolicy {
    /// Add them to the preserved file and remove them from the others
    Add,
    /// Leave them where they are
    Keep,
    /// Remove them from every file
    Remove,
}

#[allow(clippy::pedantic)]
#[cfg(test)]
mod test {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        CliArgs::try_parse_from(std::iter::once("lindup").chain(args.iter().copied())).map(Args::from_cli)
    }

    #[test]
    fn two_files_are_required() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["a"]).is_err());
        let args = parse(&["a", "b", "c"]).unwrap();
        assert_eq!(args.files, vec![PathBuf::from("a"), PathBuf::from("b"), PathBuf::from("c")]);
    }

    #[test]
    fn defaults_leave_every_choice_to_the_user() {
        let args = parse(&["a", "b"]).unwrap();
        assert_eq!(args.preserve, None);
        assert_eq!(args.policy, None);
        assert!(!args.assume_yes);
        assert!(!args.dry_run);
        assert_eq!(args.color, ColorChoice::Auto);
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
    }

    #[test]
    fn preserve_is_one_based_on_the_command_line() {
        assert_eq!(parse(&["-p", "2", "a", "b"]).unwrap().preserve, Some(1));
        assert!(parse(&["-p", "0", "a", "b"]).is_err());
    }

    #[test]
    fn missing_names_a_policy() {
        assert_eq!(parse(&["-m", "add", "a", "b"]).unwrap().policy, Some(Policy::AddToAuthoritative));
        assert_eq!(parse(&["-m", "keep", "a", "b"]).unwrap().policy, Some(Policy::LeaveUnchanged));
        assert_eq!(parse(&["--missing", "remove", "a", "b"]).unwrap().policy, Some(Policy::RemoveFromAll));
        assert!(parse(&["-m", "shred", "a", "b"]).is_err());
    }

    #[test]
    fn verbose_counts_and_conflicts_with_quiet() {
        assert_eq!(parse(&["-vv", "a", "b"]).unwrap().verbose, 2);
        assert!(parse(&["-v", "-q", "a", "b"]).is_err());
    }
}
