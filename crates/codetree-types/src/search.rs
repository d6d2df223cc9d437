//! Search match records.

use crate::CodeId;

/// A code matched by a search provider.
///
/// Only the id and the ancestor path are consumed; the engine never
/// recomputes paths for matches.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchMatch {
    /// Matched code id.
    pub id: CodeId,
    /// Ancestor ids from the root, ending with `id`.
    pub path: Vec<CodeId>,
}

impl SearchMatch {
    /// Creates a match record.
    pub fn new(id: CodeId, path: Vec<CodeId>) -> Self {
        Self { id, path }
    }

    /// Ancestors of the match, excluding the match itself.
    pub fn ancestors(&self) -> &[CodeId] {
        match self.path.split_last() {
            Some((_, ancestors)) => ancestors,
            None => &[],
        }
    }
}

impl From<&crate::Code> for SearchMatch {
    fn from(code: &crate::Code) -> Self {
        Self {
            id: code.id,
            path: code.path.clone(),
        }
    }
}
