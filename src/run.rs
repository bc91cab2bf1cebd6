//! Houses the `run` function, which takes one invocation from reading the
//! operands to rewriting them:
//!
//! read operands → index → report duplicates → choose the preserved file →
//! choose a policy (only if some duplicates are missing from that file) →
//! confirm → rewrite.
//!
//! Every question may be declined, which ends the run with nothing written.
//! All decisions are made before the first file is touched.
use anyhow::Result;
use bstr::ByteSlice;
use std::io::{BufRead, Write};

use crate::args::Args;
use crate::fingerprint::Fingerprint;
use crate::index::{build_index, FileId, Membership, MembershipIndex};
use crate::operands::{read_operands, Operand};
use crate::partition::{partition, split, Policy};
use crate::prompt::{Answer, Prompter};
use crate::rewrite::{commit, plan_rewrites, Rewrite};
use crate::signal::ShutdownHandler;
use crate::text::Text;

/// How a run ended
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Outcome {
    /// No line occurs in more than one file
    NoDuplicates,
    /// There are duplicates, but the decisions made change no file
    NothingToChange,
    /// The user declined to answer at `Checkpoint`; nothing was written
    Cancelled(Checkpoint),
    /// The plan was shown and nothing was written, as asked
    DryRun,
    /// This many files were rewritten
    Rewritten(usize),
    /// An interrupt stopped the rewrite after this many files
    Interrupted(usize),
}

/// The questions a run may ask
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Checkpoint {
    /// Which file keeps its copy of the duplicates
    PreservedFile,
    /// What to do with duplicates the preserved file lacks
    Policy,
    /// Whether to go ahead with the planned changes
    Confirmation,
}

/// Runs the whole dialogue. Choices already made in `args` are not asked
/// again. Interrupts are deferred by `shutdown` while files are rewritten.
pub fn run<R: BufRead, W: Write>(
    args: &Args,
    prompter: &mut Prompter<R, W>,
    shutdown: &ShutdownHandler,
) -> Result<Outcome> {
    log::debug!("Reading {} operands", args.files.len());
    let operands = read_operands(&args.files)?;
    let texts: Vec<Text> = operands.iter().map(|operand| Text::new(&operand.contents)).collect();
    let before: Vec<Fingerprint> = operands.iter().map(|operand| operand.fingerprint).collect();
    report_fingerprints(prompter, "before", &operands, &before)?;

    log::debug!("Building the membership index");
    let index = build_index(&texts);
    log::info!("{} distinct lines in {} files", index.len(), index.file_count());
    if !index.has_duplicates() {
        writeln!(prompter.out(), "No line occurs in more than one file.")?;
        return Ok(Outcome::NoDuplicates);
    }
    report_duplicates(prompter, &operands, index.duplicates())?;

    let authoritative = match args.preserve {
        Some(file) => file,
        None => match prompter.choose_file(operands.len())? {
            Answer::Chosen(file) => file,
            Answer::Declined => return cancelled(prompter, Checkpoint::PreservedFile),
        },
    };
    let missing = split(&index, authoritative)?.not_in_authoritative;
    log::debug!("Preserving file {}; {} duplicates missing from it", authoritative + 1, missing.len());

    let policy = if missing.is_empty() {
        Policy::LeaveUnchanged
    } else if let Some(policy) = args.policy {
        policy
    } else {
        let heading = format!("Duplicate lines missing from {}:", operands[authoritative].path.display());
        report_lines(prompter, &heading, &index, &missing)?;
        match prompter.choose_policy()? {
            Answer::Chosen(policy) => policy,
            Answer::Declined => return cancelled(prompter, Checkpoint::Policy),
        }
    };

    let plan = partition(&index, authoritative, policy)?;
    let rewrites = plan_rewrites(&operands, &texts, &plan);
    if rewrites.is_empty() {
        writeln!(prompter.out(), "Nothing to change.")?;
        return Ok(Outcome::NothingToChange);
    }
    report_rewrites(prompter, &rewrites)?;
    if args.dry_run {
        writeln!(prompter.out(), "Dry run: no file was changed.")?;
        return Ok(Outcome::DryRun);
    }
    if !args.assume_yes {
        let question = format!("Rewrite {} file(s)?", rewrites.len());
        if !prompter.confirm(&question)? {
            return cancelled(prompter, Checkpoint::Confirmation);
        }
    }

    log::debug!("Rewriting {} files", rewrites.len());
    let written = shutdown.defer(|| commit(&rewrites, shutdown))?;
    let rewritten = &rewrites[..written];
    let after = fingerprints_after(&operands)?;
    for file in unexpected_changes(&operands, rewritten, &after) {
        let message = format!("{} changed while lindup was running", operands[file].path.display());
        log::warn!("{message}");
        let palette = prompter.palette();
        writeln!(prompter.out(), "{}", palette.warning(format!("Warning: {message}")))?;
    }
    report_fingerprints(prompter, "after", &operands, &after)?;
    if written < rewrites.len() {
        writeln!(prompter.out(), "Interrupted: {written} of {} file(s) rewritten.", rewrites.len())?;
        return Ok(Outcome::Interrupted(written));
    }
    Ok(Outcome::Rewritten(written))
}

fn cancelled<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>, at: Checkpoint) -> Result<Outcome> {
    log::debug!("Cancelled at {at:?}");
    writeln!(prompter.out(), "Cancelled: no file was changed.")?;
    Ok(Outcome::Cancelled(at))
}

fn fingerprints_after(operands: &[Operand]) -> Result<Vec<Fingerprint>> {
    operands.iter().map(|operand| Fingerprint::of_file(&operand.path)).collect()
}

/// The files whose fingerprint in `after` is a surprise. A file we didn't
/// rewrite must be exactly as we found it, and a file we did rewrite must hold
/// what we wrote.
fn unexpected_changes(operands: &[Operand], rewritten: &[Rewrite], after: &[Fingerprint]) -> Vec<FileId> {
    let mut changed = Vec::new();
    for (file, (operand, actual)) in operands.iter().zip(after).enumerate() {
        let expected = rewritten
            .iter()
            .find(|rewrite| rewrite.file == file)
            .map_or(operand.fingerprint, |rewrite| Fingerprint::of(&rewrite.contents));
        if *actual != expected {
            changed.push(file);
        }
    }
    changed
}

fn report_fingerprints<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    when: &str,
    operands: &[Operand],
    fingerprints: &[Fingerprint],
) -> Result<()> {
    let palette = prompter.palette();
    let out = prompter.out();
    writeln!(out, "{}", palette.title(format!("BLAKE3 fingerprints {when}:")))?;
    for (file, (operand, fingerprint)) in operands.iter().zip(fingerprints).enumerate() {
        writeln!(out, "  {}) {fingerprint}  {}", file + 1, palette.file(operand.path.display()))?;
    }
    Ok(())
}

fn report_duplicates<'a, 'b, R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    operands: &[Operand],
    duplicates: impl Iterator<Item = (&'a [u8], &'b Membership)>,
) -> Result<()> {
    let palette = prompter.palette();
    let out = prompter.out();
    writeln!(out, "{}", palette.title("Lines found in more than one file:"))?;
    let mut count = 0_usize;
    for (line, membership) in duplicates {
        writeln!(out, "  {}  in {}", palette.line(line.as_bstr()), file_numbers(membership.files()))?;
        count += 1;
    }
    writeln!(out, "{count} duplicate line(s)")?;
    writeln!(out, "{}", palette.title("Files:"))?;
    for (file, operand) in operands.iter().enumerate() {
        writeln!(out, "  {}) {}", file + 1, palette.file(operand.path.display()))?;
    }
    Ok(())
}

fn report_lines<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    heading: &str,
    index: &MembershipIndex,
    lines: &[&[u8]],
) -> Result<()> {
    let palette = prompter.palette();
    let out = prompter.out();
    writeln!(out, "{}", palette.title(heading))?;
    for line in lines {
        let files = index.membership(line).map_or_else(String::new, |m| file_numbers(m.files()));
        writeln!(out, "  {}  in {files}", palette.line(line.as_bstr()))?;
    }
    Ok(())
}

fn report_rewrites<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>, rewrites: &[Rewrite]) -> Result<()> {
    let palette = prompter.palette();
    let out = prompter.out();
    writeln!(out, "{}", palette.title("Planned changes:"))?;
    for rewrite in rewrites {
        let path = palette.file(rewrite.path.display());
        if rewrite.added > 0 {
            writeln!(out, "  {path}: append {} line(s)", rewrite.added)?;
        }
        if rewrite.removed > 0 {
            writeln!(out, "  {path}: remove {} line(s)", rewrite.removed)?;
        }
    }
    Ok(())
}

/// `[0, 2]` is shown as `1, 3`
fn file_numbers(files: &[FileId]) -> String {
    files.iter().map(|file| (file + 1).to_string()).collect::<Vec<_>>().join(", ")
}
