//! Builds the membership index: for each distinct non-empty line, the set of
//! files containing it.
use fxhash::FxBuildHasher;
use indexmap::IndexMap;

use crate::text::Text;

/// Position of a file on the command line, starting at 0.
pub type FileId = usize;

/// The files a line occurs in, in ascending order, each at most once. A line
/// that occurs several times in one file is still a member of that file once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Membership {
    files: Vec<FileId>,
}

impl Membership {
    fn new(file: FileId) -> Self {
        Membership { files: vec![file] }
    }

    /// Files are visited in ascending order, so `file` is new exactly when it
    /// differs from the last file recorded.
    fn update_with(&mut self, file: FileId) {
        if self.files.last() != Some(&file) {
            self.files.push(file);
        }
    }

    /// Does file `file` contain the line?
    #[must_use]
    pub fn contains(&self, file: FileId) -> bool {
        self.files.binary_search(&file).is_ok()
    }

    /// The files containing the line, ascending.
    #[must_use]
    pub fn files(&self) -> &[FileId] {
        &self.files
    }

    /// Number of files containing the line; never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// True when the line occurs in more than one file.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        self.files.len() > 1
    }
}

// Keys are borrowed from the operands' contents, which outlive the index.
type LineMap<'data> = IndexMap<&'data [u8], Membership, FxBuildHasher>;

/// Every distinct non-empty line of the input files, in order of first
/// appearance (file order, then line order), with its `Membership`.
#[derive(Debug)]
pub struct MembershipIndex<'data> {
    lines: LineMap<'data>,
    file_count: usize,
}

/// Indexes `texts`; the file id of each text is its position in the slice.
#[must_use]
pub fn build_index<'data>(texts: &[Text<'data>]) -> MembershipIndex<'data> {
    let mut lines = LineMap::default();
    for (file, text) in texts.iter().enumerate() {
        for line in text.lines().filter(|line| !line.is_empty()) {
            lines
                .entry(line.content)
                .and_modify(|membership| membership.update_with(file))
                .or_insert_with(|| Membership::new(file));
        }
    }
    MembershipIndex { lines, file_count: texts.len() }
}

impl<'data> MembershipIndex<'data> {
    /// The number of files indexed, including files with no lines.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.file_count
    }

    /// The number of distinct non-empty lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when no file has a non-empty line.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The files containing `line`, or `None` if no file does.
    #[must_use]
    pub fn membership(&self, line: &[u8]) -> Option<&Membership> {
        self.lines.get(line)
    }

    /// Lines found in two or more files, in index order.
    pub fn duplicates(&self) -> impl Iterator<Item = (&'data [u8], &Membership)> + '_ {
        self.lines.iter().filter(|(_, membership)| membership.is_duplicate()).map(|(line, m)| (*line, m))
    }

    /// Is any line found in two or more files?
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.duplicates().next().is_some()
    }
}

#[allow(clippy::pedantic)]
#[cfg(test)]
mod test {
    use super::*;
    use itertools::Itertools;
    use std::collections::{BTreeMap, BTreeSet};

    fn index_of<'a>(files: &[&'a str]) -> MembershipIndex<'a> {
        let texts: Vec<Text> = files.iter().map(|f| Text::new(f.as_bytes())).collect();
        build_index(&texts)
    }

    fn duplicates(index: &MembershipIndex) -> Vec<(String, Vec<FileId>)> {
        index
            .duplicates()
            .map(|(line, m)| (String::from_utf8(line.to_vec()).unwrap(), m.files().to_vec()))
            .collect()
    }

    #[test]
    fn lines_in_two_or_more_files_are_duplicates() {
        let index = index_of(&["a\nb\nc\n", "b\nc\nd\n"]);
        assert_eq!(duplicates(&index), vec![("b".to_string(), vec![0, 1]), ("c".to_string(), vec![0, 1])]);
        assert_eq!(index.len(), 4);
        assert_eq!(index.file_count(), 2);
    }

    #[test]
    fn repeats_within_one_file_count_once() {
        let index = index_of(&["x\nx\nx\n", "y\n"]);
        assert!(!index.has_duplicates());
        assert_eq!(index.membership(b"x").unwrap().files(), &[0]);
    }

    #[test]
    fn membership_is_ascending_and_without_repeats() {
        let index = index_of(&["a\n", "a\na\n", "x\n", "a\n"]);
        let a = index.membership(b"a").unwrap();
        assert_eq!(a.files(), &[0, 1, 3]);
        assert!(a.contains(3));
        assert!(!a.contains(2));
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn empty_lines_are_never_indexed() {
        let index = index_of(&["\n\na\n", "\r\n\nb\n", "\n"]);
        assert!(index.membership(b"").is_none());
        assert!(!index.has_duplicates());
        assert_eq!(index.file_count(), 3);
    }

    #[test]
    fn line_terminators_do_not_affect_matching() {
        let index = index_of(&["a\r\nb\r\n", "a\nb"]);
        assert_eq!(duplicates(&index).len(), 2);
    }

    #[test]
    fn index_keeps_first_appearance_order() {
        let index = index_of(&["z\ny\n", "x\ny\nz\n", "x\n"]);
        let order: Vec<&[u8]> = index.duplicates().map(|(line, _)| line).collect();
        assert_eq!(order, vec![&b"z"[..], b"y", b"x"]);
    }

    #[test]
    fn duplicates_do_not_depend_on_file_order() {
        let files: Vec<(&str, &str)> = vec![
            ("f1", "a\nb\nshared\n"),
            ("f2", "b\nc\nshared\n\n"),
            ("f3", "c\nd\nshared\na\n"),
            ("f4", "lonely\n"),
        ];
        let by_name = |order: &[&(&str, &str)]| -> BTreeMap<Vec<u8>, BTreeSet<String>> {
            let contents: Vec<&str> = order.iter().map(|(_, c)| *c).collect();
            let index = index_of(&contents);
            index
                .duplicates()
                .map(|(line, m)| {
                    let names = m.files().iter().map(|&f| order[f].0.to_string()).collect();
                    (line.to_vec(), names)
                })
                .collect()
        };
        let expected = by_name(&files.iter().collect::<Vec<_>>());
        assert_eq!(expected.len(), 4);
        for order in files.iter().permutations(files.len()) {
            assert_eq!(by_name(&order), expected);
        }
    }
}
