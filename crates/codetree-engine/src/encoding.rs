//! Nested-interval tree encoding checks.
//!
//! The filter engine skips a subtree by advancing its scan index by
//! `last_descendant_id - id`. That is only sound when:
//!
//! - ids are strictly ascending in array order,
//! - every subtree is the contiguous id run `id ..= last_descendant_id`
//!   laid out directly after its root,
//! - subtrees nest (a child never ends after its parent),
//! - `path` is the ancestor chain ending with the code's own id.
//!
//! [`validate`] checks all of these in one pass. [`ValidatedCodes`] is the
//! witness that a code array passed the check.

use std::ops::Deref;
use std::sync::Arc;

use codetree_types::{Code, CodeId};

use crate::types::{TreeError, TreeResult};

/// Checks the pre-order nested-interval invariants of `codes`.
///
/// Runs in O(n + total path length). An empty array is valid.
pub fn validate(codes: &[Code]) -> TreeResult<()> {
    for (index, pair) in codes.windows(2).enumerate() {
        if pair[0].id >= pair[1].id {
            return Err(TreeError::UnsortedIds {
                index: index + 1,
                previous: pair[0].id,
                id: pair[1].id,
            });
        }
    }

    // (id, last_descendant_id) of the ancestors enclosing the current index.
    let mut open: Vec<(CodeId, CodeId)> = Vec::new();

    for (index, code) in codes.iter().enumerate() {
        if code.last_descendant_id < code.id {
            return Err(invalid_range(code));
        }
        // Ids are strictly ascending, so matching the last id at the end
        // position means the run in between is gap free.
        let end = index
            .checked_add(code.descendant_count())
            .filter(|end| *end < codes.len())
            .ok_or_else(|| invalid_range(code))?;
        if codes[end].id != code.last_descendant_id {
            return Err(TreeError::NonContiguous {
                id: code.id,
                expected: code.last_descendant_id,
                found: codes[end].id,
            });
        }

        while open.last().is_some_and(|(_, last)| *last < code.id) {
            open.pop();
        }
        if let Some(&(parent, parent_last)) = open.last() {
            if code.last_descendant_id > parent_last {
                return Err(TreeError::EscapesParent {
                    id: code.id,
                    last_descendant_id: code.last_descendant_id,
                    parent,
                    parent_last,
                });
            }
        }

        check_path(code, &open)?;

        if let Some(&child) = code.children_ids.iter().find(|c| !code.contains(**c)) {
            return Err(TreeError::ChildOutOfRange { id: code.id, child });
        }

        open.push((code.id, code.last_descendant_id));
    }

    Ok(())
}

fn invalid_range(code: &Code) -> TreeError {
    TreeError::InvalidRange {
        id: code.id,
        last_descendant_id: code.last_descendant_id,
    }
}

fn check_path(code: &Code, open: &[(CodeId, CodeId)]) -> TreeResult<()> {
    let mismatch = |reason: String| TreeError::PathMismatch {
        id: code.id,
        reason,
    };

    if code.path.last() != Some(&code.id) {
        return Err(mismatch("path does not end with the code's own id".to_string()));
    }
    if code.depth() != open.len() {
        return Err(mismatch(format!(
            "path has {} ancestors but the code is nested {} deep",
            code.depth(),
            open.len()
        )));
    }
    for (ancestor, (expected, _)) in code.ancestors().iter().zip(open) {
        if ancestor != expected {
            return Err(mismatch(format!(
                "ancestor {} should be {}",
                ancestor, expected
            )));
        }
    }
    Ok(())
}

/// A code array that passed [`validate`].
///
/// Cheap to clone; the codes are shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ValidatedCodes {
    codes: Arc<[Code]>,
}

impl ValidatedCodes {
    /// Validates `codes` and wraps them.
    pub fn new(codes: impl Into<Arc<[Code]>>) -> TreeResult<Self> {
        let codes = codes.into();
        validate(&codes)?;
        Ok(Self { codes })
    }

    /// The shared code array.
    pub fn shared(&self) -> Arc<[Code]> {
        Arc::clone(&self.codes)
    }
}

impl Deref for ValidatedCodes {
    type Target = [Code];

    fn deref(&self) -> &[Code] {
        &self.codes
    }
}
