//! Carries out a `Plan`. The new contents of every file are computed in memory
//! first; then each file that actually changes is replaced atomically, by
//! writing a scratch file beside it and renaming the scratch file over it.
use anyhow::{Context, Result};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

use crate::index::FileId;
use crate::operands::Operand;
use crate::partition::{LineSet, Plan};
use crate::signal::ShutdownHandler;
use crate::text::Text;

/// The new contents for one file.
#[derive(Debug)]
pub struct Rewrite {
    /// Which operand this is
    pub file: FileId,
    /// The operand's path, as given
    pub path: PathBuf,
    /// Everything the file will hold, Byte Order Mark included
    pub contents: Vec<u8>,
    /// Lines filtered out (every occurrence counts)
    pub removed: usize,
    /// Lines appended
    pub added: usize,
}

/// Returns the contents of `text` without the lines in `to_delete`, along with
/// the number of lines dropped. Every other line keeps its bytes, its
/// terminator, and its position relative to the lines around it; a kept line
/// that occurs three times still occurs three times.
#[must_use]
pub fn filtered(text: &Text, to_delete: &LineSet) -> (Vec<u8>, usize) {
    let mut contents = text.bom().to_vec();
    let mut removed = 0;
    for line in text.lines() {
        if !line.is_empty() && to_delete.contains(line.content) {
            removed += 1;
        } else {
            contents.extend_from_slice(line.raw);
        }
    }
    (contents, removed)
}

/// Returns `contents` (whose lines are `text`) with each line of `to_add`
/// appended, using the text's own line terminator.
#[must_use]
pub fn appended(contents: &[u8], text: &Text, to_add: &LineSet) -> Vec<u8> {
    let terminator = text.line_terminator();
    let mut result = contents.to_vec();
    if !text.is_terminated() {
        terminate(&mut result, terminator);
    }
    for line in to_add {
        result.extend_from_slice(line);
        terminate(&mut result, terminator);
    }
    result
}

/// A line ending in a lone `\r` keeps it as content only if a full `\r\n`
/// follows.
fn terminate(result: &mut Vec<u8>, terminator: &[u8]) {
    if result.ends_with(b"\r") {
        result.extend_from_slice(b"\r\n");
    } else {
        result.extend_from_slice(terminator);
    }
}

/// Computes the new contents of every file that `plan` would change. Files
/// that would come out identical are left out.
#[must_use]
pub fn plan_rewrites(operands: &[Operand], texts: &[Text], plan: &Plan) -> Vec<Rewrite> {
    let mut rewrites = Vec::new();
    for (file, (operand, text)) in operands.iter().zip(texts).enumerate() {
        let path = operand.path.clone();
        if file == plan.authoritative {
            if !plan.to_add.is_empty() {
                let contents = appended(&operand.contents, text, &plan.to_add);
                rewrites.push(Rewrite { file, path, contents, removed: 0, added: plan.to_add.len() });
            }
        } else {
            let (contents, removed) = filtered(text, &plan.to_delete);
            if removed > 0 {
                rewrites.push(Rewrite { file, path, contents, removed, added: 0 });
            }
        }
    }
    rewrites
}

/// Writes every rewrite to disk, one file at a time, and returns how many were
/// written. Once `shutdown` has seen an interrupt no further file is replaced,
/// so the count falls short of `rewrites.len()`.
pub fn commit(rewrites: &[Rewrite], shutdown: &ShutdownHandler) -> Result<usize> {
    for (written, rewrite) in rewrites.iter().enumerate() {
        if !replace_atomically(&rewrite.path, &rewrite.contents, shutdown)? {
            log::warn!("Interrupted: {written} of {} file(s) rewritten", rewrites.len());
            return Ok(written);
        }
        log::info!(
            "Rewrote {}: {} line(s) removed, {} added",
            rewrite.path.display(),
            rewrite.removed,
            rewrite.added
        );
    }
    Ok(rewrites.len())
}

/// Replaces the file at `path` with `contents`. The scratch file lives in the
/// same directory as the target so the final rename never crosses file
/// systems; if anything fails before the rename, or an interrupt has arrived,
/// dropping the scratch file deletes it and `false` is returned. A symbolic
/// link is followed, so the link survives.
fn replace_atomically(path: &Path, contents: &[u8], shutdown: &ShutdownHandler) -> Result<bool> {
    if shutdown.is_shutdown_requested() {
        return Ok(false);
    }
    let target =
        fs::canonicalize(path).with_context(|| format!("Can't resolve path: {}", path.display()))?;
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let permissions = fs::metadata(&target)
        .with_context(|| format!("Can't read file: {}", path.display()))?
        .permissions();

    let mut scratch = NamedTempFile::new_in(dir)
        .with_context(|| format!("Can't create a scratch file in {}", dir.display()))?;
    log::debug!("Writing {} via {}", path.display(), scratch.path().display());
    scratch
        .write_all(contents)
        .and_then(|()| scratch.as_file().sync_all())
        .with_context(|| format!("Can't write scratch file: {}", scratch.path().display()))?;
    fs::set_permissions(scratch.path(), permissions)
        .with_context(|| format!("Can't set permissions on {}", scratch.path().display()))?;
    if shutdown.is_shutdown_requested() {
        return Ok(false);
    }
    scratch.persist(&target).with_context(|| format!("Can't replace file: {}", path.display()))?;
    Ok(true)
}
