//! Chemical identifiers and their validation
//!
//! Two kinds are accepted:
//! - InChIKey: `XXXXXXXXXXXXXX-XXXXXXXXXX-X` (uppercase letters), normalized
//!   to carry the `InChIKey=` prefix
//! - SMILES: any non-empty string; the remote service decides whether the
//!   structure itself is valid
//!
//! An InChIKey and the SMILES of the same compound are distinct identifiers
//! and distinct cache keys.

use crate::error::{ClassyFireError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical InChIKey prefix
pub const INCHIKEY_PREFIX: &str = "InChIKey=";

/// Lengths of the three hyphen-separated InChIKey blocks
const INCHIKEY_BLOCKS: [usize; 3] = [14, 10, 1];

/// Identifier kind, also the cache key namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierKind {
    InchiKey,
    Smiles,
}

impl IdentifierKind {
    /// Storage/display tag
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierKind::InchiKey => "inchikey",
            IdentifierKind::Smiles => "smiles",
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated, normalized chemical identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    kind: IdentifierKind,
    value: String,
}

impl Identifier {
    /// Validate and normalize an InChIKey
    ///
    /// Accepts the key with or without the `InChIKey=` prefix.
    pub fn inchikey(raw: &str) -> Result<Self> {
        if !is_valid_inchikey(raw) {
            return Err(ClassyFireError::InvalidInchiKey(raw.to_string()));
        }
        Ok(Self {
            kind: IdentifierKind::InchiKey,
            value: normalize_inchikey(raw),
        })
    }

    /// Validate a SMILES string (non-empty after trimming)
    pub fn smiles(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ClassyFireError::InvalidSmiles(raw.to_string()));
        }
        Ok(Self {
            kind: IdentifierKind::Smiles,
            value: trimmed.to_string(),
        })
    }

    /// Validate `raw` as the given kind
    pub fn parse(raw: &str, kind: IdentifierKind) -> Result<Self> {
        match kind {
            IdentifierKind::InchiKey => Self::inchikey(raw),
            IdentifierKind::Smiles => Self::smiles(raw),
        }
    }

    /// InChIKey if it looks like one, SMILES otherwise
    pub fn detect(raw: &str) -> Result<Self> {
        if is_valid_inchikey(raw) {
            Self::inchikey(raw)
        } else {
            Self::smiles(raw)
        }
    }

    pub fn kind(&self) -> IdentifierKind {
        self.kind
    }

    /// Normalized value (`InChIKey=...` for InChIKeys)
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Value without the InChIKey prefix, as used in request URLs
    pub fn bare(&self) -> &str {
        self.value
            .strip_prefix(INCHIKEY_PREFIX)
            .unwrap_or(&self.value)
    }

    /// Kind-specific error raised for an empty classification
    pub fn empty_classification_error(&self) -> ClassyFireError {
        match self.kind {
            IdentifierKind::InchiKey => {
                ClassyFireError::EmptyInchikeyClassification(self.value.clone())
            }
            IdentifierKind::Smiles => ClassyFireError::EmptySmilesClassification(self.value.clone()),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Returns whether `raw` is a well-formed InChIKey (prefix optional)
pub fn is_valid_inchikey(raw: &str) -> bool {
    let key = strip_inchikey_prefix(raw.trim());
    let blocks: Vec<&str> = key.split('-').collect();

    blocks.len() == INCHIKEY_BLOCKS.len()
        && blocks
            .iter()
            .zip(INCHIKEY_BLOCKS)
            .all(|(block, len)| block.len() == len && block.bytes().all(|b| b.is_ascii_uppercase()))
}

/// Normalize an InChIKey to its prefixed form
pub fn normalize_inchikey(raw: &str) -> String {
    format!("{}{}", INCHIKEY_PREFIX, strip_inchikey_prefix(raw.trim()))
}

fn strip_inchikey_prefix(raw: &str) -> &str {
    raw.strip_prefix(INCHIKEY_PREFIX).unwrap_or(raw)
}
