//! BLAKE3 fingerprints of file contents, printed before and after a run so a
//! user can see which files changed.
use anyhow::{Context, Result};
use std::{fmt, fs, path::Path};

/// The BLAKE3 hash of a file's bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fingerprint(blake3::Hash);

impl Fingerprint {
    /// Fingerprint of `bytes`.
    #[must_use]
    pub fn of(bytes: &[u8]) -> Self {
        Fingerprint(blake3::hash(bytes))
    }

    /// Fingerprint of the file currently at `path`.
    pub fn of_file(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("Can't read file: {}", path.display()))?;
        Ok(Fingerprint::of(&bytes))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}
