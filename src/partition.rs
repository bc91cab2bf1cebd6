//! Sorts the duplicate lines into the lines to delete and the lines to add,
//! given the authoritative file and what to do with duplicates it lacks.
use anyhow::{bail, Result};
use fxhash::FxBuildHasher;
use indexmap::IndexSet;

use crate::index::{FileId, MembershipIndex};

/// An ordered set of lines, borrowed from the operands' contents.
pub type LineSet<'data> = IndexSet<&'data [u8], FxBuildHasher>;

/// What to do with a duplicate line that the authoritative file doesn't have
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Policy {
    /// Append the line to the authoritative file and delete it everywhere else
    AddToAuthoritative,
    /// Leave every copy of the line where it is
    LeaveUnchanged,
    /// Delete the line from every file that has it
    RemoveFromAll,
}

/// The duplicate lines, split by whether the authoritative file contains them.
/// Both lists are in index order.
#[derive(Debug, Default)]
pub struct Split<'data> {
    /// Duplicates the authoritative file has
    pub in_authoritative: Vec<&'data [u8]>,
    /// Duplicates the authoritative file lacks
    pub not_in_authoritative: Vec<&'data [u8]>,
}

/// Splits the duplicates of `index` on membership of `authoritative`.
pub fn split<'data>(index: &MembershipIndex<'data>, authoritative: FileId) -> Result<Split<'data>> {
    check_file_id(index, authoritative)?;
    let mut split = Split::default();
    for (line, membership) in index.duplicates() {
        if membership.contains(authoritative) {
            split.in_authoritative.push(line);
        } else {
            split.not_in_authoritative.push(line);
        }
    }
    Ok(split)
}

/// The changes to make. Lines in `to_delete` are filtered out of every file but
/// the authoritative one; lines in `to_add` are appended to the authoritative
/// file. The authoritative file itself never loses a line.
#[derive(Debug)]
pub struct Plan<'data> {
    /// The file whose copy of each duplicate survives
    pub authoritative: FileId,
    /// Lines to filter out of the other files
    pub to_delete: LineSet<'data>,
    /// Lines to append to the authoritative file
    pub to_add: LineSet<'data>,
}

impl Plan<'_> {
    /// True if carrying out the plan would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_delete.is_empty() && self.to_add.is_empty()
    }
}

/// Builds the `Plan` for keeping duplicates in `authoritative`, treating the
/// duplicates it lacks according to `policy`.
///
/// * Duplicates in the authoritative file are always deleted from the others.
/// * `Policy::AddToAuthoritative` adds the others to the authoritative file and
///   deletes them elsewhere, so they end up living only there.
/// * `Policy::LeaveUnchanged` touches none of them.
/// * `Policy::RemoveFromAll` deletes them everywhere and adds them nowhere.
pub fn partition<'data>(
    index: &MembershipIndex<'data>,
    authoritative: FileId,
    policy: Policy,
) -> Result<Plan<'data>> {
    let Split { in_authoritative, not_in_authoritative } = split(index, authoritative)?;
    let mut to_delete: LineSet = in_authoritative.into_iter().collect();
    let mut to_add = LineSet::default();
    match policy {
        Policy::AddToAuthoritative => {
            to_add.extend(not_in_authoritative.iter().copied());
            to_delete.extend(not_in_authoritative);
        }
        Policy::LeaveUnchanged => {}
        Policy::RemoveFromAll => to_delete.extend(not_in_authoritative),
    }
    log::info!(
        "Plan for file {}: delete {} line(s), add {} line(s)",
        authoritative + 1,
        to_delete.len(),
        to_add.len()
    );
    Ok(Plan { authoritative, to_delete, to_add })
}

fn check_file_id(index: &MembershipIndex, file: FileId) -> Result<()> {
    if file >= index.file_count() {
        bail!("There is no file number {}; there are {} files", file + 1, index.file_count());
    }
    Ok(())
}
