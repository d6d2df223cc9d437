//! Engine-wide error, configuration and statistics types.

use std::time::Duration;

use codetree_types::CodeId;
use thiserror::Error;

/// Errors raised while loading, validating or filtering code trees.
#[derive(Error, Debug)]
pub enum TreeError {
    /// I/O error reading an ontology file.
    #[error("IO error reading ontology file: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error.
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid code id.
    #[error("Invalid code id: {value}")]
    InvalidId {
        /// The invalid value that was encountered.
        value: String,
    },

    /// Invalid header - too few columns.
    #[error("Invalid header: expected {expected} columns, found {found}")]
    InvalidHeader {
        /// Expected column count.
        expected: usize,
        /// Found column count.
        found: usize,
    },

    /// Unexpected column name.
    #[error("Unexpected column '{found}' at position {position}, expected '{expected}'")]
    UnexpectedColumn {
        /// The column position.
        position: usize,
        /// Expected column name.
        expected: String,
        /// Found column name.
        found: String,
    },

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Directory not found.
    #[error("Directory not found: {path}")]
    DirectoryNotFound {
        /// The path that was not found.
        path: String,
    },

    /// No ontology with this name has been loaded.
    #[error("Unknown ontology: {name}")]
    UnknownOntology {
        /// The requested ontology name.
        name: String,
    },

    /// Search pattern is not a valid regular expression.
    #[error("Invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Ids are not strictly ascending.
    #[error("Code ids not ascending at index {index}: {id} follows {previous}")]
    UnsortedIds {
        /// Array index of the offending code.
        index: usize,
        /// Id of the preceding code.
        previous: CodeId,
        /// Id of the offending code.
        id: CodeId,
    },

    /// `last_descendant_id` lies before the code or past the end of the array.
    #[error("Code {id} has invalid descendant range ending at {last_descendant_id}")]
    InvalidRange {
        /// The code id.
        id: CodeId,
        /// Its declared last descendant.
        last_descendant_id: CodeId,
    },

    /// A subtree does not occupy a contiguous id range.
    #[error("Subtree of code {id} is not contiguous: expected id {expected}, found {found}")]
    NonContiguous {
        /// Root of the broken subtree.
        id: CodeId,
        /// Id required at this position.
        expected: CodeId,
        /// Id actually found.
        found: CodeId,
    },

    /// A subtree extends past the end of its parent's range.
    #[error("Code {id} ends at {last_descendant_id}, outside parent {parent} ending at {parent_last}")]
    EscapesParent {
        /// The code id.
        id: CodeId,
        /// Its declared last descendant.
        last_descendant_id: CodeId,
        /// The enclosing code.
        parent: CodeId,
        /// End of the enclosing range.
        parent_last: CodeId,
    },

    /// The path does not match the code's position in the tree.
    #[error("Code {id} has inconsistent path: {reason}")]
    PathMismatch {
        /// The code id.
        id: CodeId,
        /// What is wrong with the path.
        reason: String,
    },

    /// A listed child lies outside the code's descendant range.
    #[error("Code {id} lists child {child} outside its descendant range")]
    ChildOutOfRange {
        /// The code id.
        id: CodeId,
        /// The misplaced child.
        child: CodeId,
    },
}

impl TreeError {
    /// Returns true for faults in the tree encoding itself.
    pub fn is_integrity_fault(&self) -> bool {
        matches!(
            self,
            Self::UnsortedIds { .. }
                | Self::InvalidRange { .. }
                | Self::NonContiguous { .. }
                | Self::EscapesParent { .. }
                | Self::PathMismatch { .. }
                | Self::ChildOutOfRange { .. }
        )
    }
}

/// Result type for engine operations.
pub type TreeResult<T> = Result<T, TreeError>;

/// Configuration for loading ontology files.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Field delimiter; `None` picks tab for `.tsv` and comma otherwise.
    pub delimiter: Option<u8>,
    /// Whether to validate the tree encoding after loading.
    pub validate: bool,
    /// Whether to fill `children_ids` from paths when a file omits them.
    pub derive_children: bool,
    /// Records per batch for [`CodeParser::parse_batched`](crate::CodeParser::parse_batched).
    pub batch_size: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            validate: true,
            derive_children: true,
            batch_size: 10_000,
        }
    }
}

/// Statistics from a single filter pass.
#[derive(Debug, Clone, Default)]
pub struct FilterStats {
    /// Codes inspected by the scan.
    pub scanned: usize,
    /// Nodes emitted.
    pub emitted: usize,
    /// Subtrees dropped by the search restriction.
    pub pruned_by_search: usize,
    /// Subtrees dropped by an enabled filter.
    pub pruned_by_filter: usize,
    /// Emitted nodes whose children were skipped because they are closed.
    pub pruned_by_collapse: usize,
    /// Wall time of the pass.
    pub elapsed: Duration,
}

impl FilterStats {
    /// Returns the percentage of the ontology that was actually inspected.
    pub fn scan_rate(&self, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (self.scanned as f64 / total as f64) * 100.0
        }
    }

    /// Wall time of the pass in microseconds, saturating at `u64::MAX`.
    pub fn elapsed_us(&self) -> u64 {
        u64::try_from(self.elapsed.as_micros()).unwrap_or(u64::MAX)
    }
}
