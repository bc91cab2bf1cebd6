//! Provides the `read_operands` function, which reads every file named on the
//! command line into memory. Nothing is indexed, and nothing is written, until
//! every operand has been read successfully.
use anyhow::{bail, Context, Result};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::fingerprint::Fingerprint;

/// An input file, read in its entirety.
#[derive(Debug, Clone)]
pub struct Operand {
    /// The path as given on the command line
    pub path: PathBuf,
    /// The file's contents, translated to UTF-8 if the file was UTF-16
    pub contents: Vec<u8>,
    /// Fingerprint of the bytes actually on disk
    pub fingerprint: Fingerprint,
}

impl Operand {
    /// Reads the regular file at `path`.
    pub fn read(path: &Path) -> Result<Operand> {
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => bail!("No such file: {}", path.display()),
            Err(e) => return Err(e).with_context(|| format!("Can't read file: {}", path.display())),
        };
        if !metadata.is_file() {
            bail!("Not a regular file: {}", path.display());
        }
        let bytes = fs::read(path).with_context(|| format!("Can't read file: {}", path.display()))?;
        let fingerprint = Fingerprint::of(&bytes);
        Ok(Operand { path: path.to_owned(), contents: decode_if_utf16(bytes), fingerprint })
    }
}

/// Reads every file in `paths`, failing on the first one that is missing,
/// unreadable, or not a regular file. Naming the same file twice is an
/// error too: both copies of every line would look like duplicates.
pub fn read_operands(paths: &[PathBuf]) -> Result<Vec<Operand>> {
    if paths.len() < 2 {
        bail!("At least two files are needed, but {} given", paths.len());
    }
    let mut canonical_paths: Vec<PathBuf> = Vec::with_capacity(paths.len());
    let mut operands = Vec::with_capacity(paths.len());
    for path in paths {
        let operand = Operand::read(path)?;
        let canonical = fs::canonicalize(path)
            .with_context(|| format!("Can't resolve path: {}", path.display()))?;
        if let Some(earlier) = canonical_paths.iter().position(|seen| *seen == canonical) {
            bail!("{} and {} are the same file", paths[earlier].display(), path.display());
        }
        log::debug!("Read {} ({} bytes)", path.display(), operand.contents.len());
        canonical_paths.push(canonical);
        operands.push(operand);
    }
    Ok(operands)
}

/// Decode UTF-16 to UTF-8 if we see a UTF-16 Byte Order Mark at the beginning of `candidate`.
/// Otherwise return `candidate` unchanged
fn decode_if_utf16(candidate: Vec<u8>) -> Vec<u8> {
    // "without BOM handling" means that the UTF-16 BOM is translated to a UTF-8 BOM.
    // Malformed sequences become the Unicode REPLACEMENT CHARACTER.
    if let Some((enc, _)) = encoding_rs::Encoding::for_bom(&candidate) {
        if [encoding_rs::UTF_16LE, encoding_rs::UTF_16BE].contains(&enc) {
            let (translated, _had_malformed_sequences) =
                enc.decode_without_bom_handling(&candidate);
            return translated.into_owned().into_bytes();
        }
    }
    return candidate;
}
