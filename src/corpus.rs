//! Regulation corpus: loaded once, read-only afterwards

use crate::error::CorpusError;
use crate::types::RegulationEntry;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Ordered, immutable collection of regulation entries.
///
/// Cloning shares the underlying slice; concurrent readers need no locking.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    entries: Arc<[RegulationEntry]>,
}

impl Corpus {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a JSON array of entry objects
    pub fn from_json_str(json: &str) -> Result<Self, CorpusError> {
        let entries: Vec<RegulationEntry> = serde_json::from_str(json)
            .map_err(|source| CorpusError::Malformed { path: None, source })?;
        Ok(Self::from(entries))
    }

    /// Load the corpus from a JSON file.
    ///
    /// A file that cannot be read yields an empty corpus (queries then find
    /// nothing). Content that does not parse is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CorpusError> {
        let path = path.as_ref();

        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Regulation corpus unavailable at {}: {}", path.display(), e);
                return Ok(Self::empty());
            }
        };

        let entries: Vec<RegulationEntry> =
            serde_json::from_str(&raw).map_err(|source| CorpusError::Malformed {
                path: Some(path.to_path_buf()),
                source,
            })?;

        info!("Regulation corpus loaded: {} entries from {}", entries.len(), path.display());
        Ok(Self::from(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[RegulationEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RegulationEntry> {
        self.entries.iter()
    }
}

impl From<Vec<RegulationEntry>> for Corpus {
    fn from(entries: Vec<RegulationEntry>) -> Self {
        Self {
            entries: entries.into(),
        }
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a RegulationEntry;
    type IntoIter = std::slice::Iter<'a, RegulationEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
