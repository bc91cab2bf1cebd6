//! Provides the `Text` structure, a view of a file's contents as lines.
//!
//! A `Text` also keeps information about whether the file began with a Unicode
//! Byte Order Mark, and what line terminator was used on the file's first line,
//! so that a rewritten file keeps the look of the original.
use memchr::memchr;

/// The contents of one input file, split into lines on demand.
/// * The Byte Order Mark, if any, is not part of the first line
/// * `line_terminator` is `\r\n` if the first line ends with `\r\n`, and `\n`
///   otherwise (including when the file has no terminated line at all)
#[derive(Clone, Copy, Debug)]
pub struct Text<'data> {
    bom: &'static [u8],             // Byte Order Mark or empty
    line_terminator: &'static [u8], // \n or \r\n
    body: &'data [u8],
}

/// A single line of a `Text`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Line<'data> {
    /// The line without its terminator. Lines are compared by `content`.
    pub content: &'data [u8],
    /// The line exactly as it appears in the file, terminator included.
    pub raw: &'data [u8],
}

impl Line<'_> {
    /// Empty lines never take part in matching.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl<'data> Text<'data> {
    /// Wraps `contents`, noting its Byte Order Mark and line terminator.
    #[must_use]
    pub fn new(contents: &'data [u8]) -> Self {
        let (bom, line_terminator) = output_info(contents);
        Text { bom, line_terminator, body: &contents[bom.len()..] }
    }

    /// The (UTF-8) Byte Order Mark, or the empty slice.
    #[must_use]
    pub fn bom(&self) -> &'static [u8] {
        self.bom
    }

    /// The terminator to use for lines added to this text.
    #[must_use]
    pub fn line_terminator(&self) -> &'static [u8] {
        self.line_terminator
    }

    /// True when the last line has a terminator, or there are no lines.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.body.is_empty() || self.body.ends_with(b"\n")
    }

    /// Every line, in file order, duplicates and empty lines included.
    #[must_use]
    pub fn lines(&self) -> Lines<'data> {
        Lines { rest: self.body }
    }
}

/// Iterator over the lines of a `Text`.
pub struct Lines<'data> {
    rest: &'data [u8],
}

impl<'data> Iterator for Lines<'data> {
    type Item = Line<'data>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let Some(end) = memchr(b'\n', self.rest) else {
            // Last line, no terminator
            let raw = self.rest;
            self.rest = &raw[raw.len()..];
            return Some(Line { content: raw, raw });
        };
        let (raw, rest) = self.rest.split_at(end + 1);
        self.rest = rest;
        let mut content = &raw[..end];
        if let Some(&maybe_cr) = content.last() {
            if maybe_cr == b'\r' {
                content = &content[..content.len() - 1];
            }
        }
        Some(Line { content, raw })
    }
}

/// Returns `(bom, line_terminator)`, where `bom` is the (UTF-8) Byte Order
/// Mark, or the empty string if `slice` has none, and `line_terminator` is
/// `\r\n` if the first line of `slice` ends with `\r\n`, and `\n` if the first
/// line ends just with `\n` (or is the only line in the file and has no line
/// terminator).
fn output_info(slice: &[u8]) -> (&'static [u8], &'static [u8]) {
    let mut bom: &'static [u8] = b"";
    let mut line_terminator: &'static [u8] = b"\n";
    if has_bom(slice) {
        bom = BOM_BYTES;
    }
    if let Some(n) = memchr(b'\n', slice) {
        if n > 0 && slice[n - 1] == b'\r' {
            line_terminator = b"\r\n";
        }
    }
    (bom, line_terminator)
}

const BOM_0: u8 = b'\xEF';
const BOM_1: u8 = b'\xBB';
const BOM_2: u8 = b'\xBF';
const BOM_BYTES: &[u8] = b"\xEF\xBB\xBF";
/// Does `contents` begin with a (UTF-8) Byte Order Mark?
fn has_bom(contents: &[u8]) -> bool {
    contents.len() >= 3 && contents[0] == BOM_0 && contents[1] == BOM_1 && contents[2] == BOM_2
}
