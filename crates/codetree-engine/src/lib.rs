//! # codetree-engine
//!
//! Filtering engine for hierarchical code ontologies stored as flat
//! pre-order arrays.
//!
//! Given an ontology, the selections of the codelists being compared, the
//! pane's filter flags and the set of expanded nodes, [`filter`] produces the
//! exact ordered list of nodes a tree view should render, each annotated with
//! how every codelist covers its descendants. The scan is a single pass that
//! skips hidden subtrees in O(1) via `last_descendant_id`.
//!
//! The crate also provides:
//! - [`classify`]: per-code descendant coverage.
//! - [`partition`]: tab strip overflow with a visible active tab.
//! - [`SearchRestriction`] and [`TermSearch`]: search narrowing.
//! - [`CodeParser`], [`discover_ontology_files`] and [`OntologyStore`]:
//!   loading ontologies from delimited or JSON files.
//!
//! ## Features
//!
//! - `parallel` (default): Enables [`OntologyStore::load_dir_parallel`],
//!   which parses ontology files concurrently with rayon.
//!
//! ## Usage
//!
//! ```rust
//! use codetree_engine::{filter, FilterOptions, SelectionSets};
//! use codetree_types::{Code, FilterFlag, PaneFilters};
//!
//! let code = |id: u32, path: Vec<u32>, last: u32| Code {
//!     id,
//!     code: format!("C{}", id),
//!     ontology_id: "demo".to_string(),
//!     description: String::new(),
//!     path,
//!     children_ids: vec![],
//!     last_descendant_id: last,
//! };
//! let codes = vec![code(1, vec![1], 3), code(2, vec![1, 2], 2), code(3, vec![1, 3], 3)];
//!
//! let mut sets = SelectionSets::new();
//! sets.insert("mc1", [3]);
//!
//! let options = FilterOptions::new(PaneFilters::only(FilterFlag::ShowOnlySelected)).open([1]);
//! let nodes = filter(&codes, &sets, &options)?;
//!
//! let ids: Vec<_> = nodes.iter().map(|n| n.id()).collect();
//! assert_eq!(ids, vec![1, 3]);
//! # Ok::<(), codetree_engine::TreeError>(())
//! ```

#![warn(missing_docs)]

mod classify;
mod encoding;
mod filter;
mod loader;
mod parser;
mod search;
mod selection;
mod store;
mod tabs;
mod types;

#[cfg(test)]
mod fixtures;

pub use classify::{classify, classify_all};
pub use encoding::{validate, ValidatedCodes};
pub use filter::{filter, filter_validated, filter_with_stats, FilterOptions};
pub use loader::{
    derive_children, discover_ontology_files, format_bytes, load_codes, FileFormat, OntologyFile,
};
pub use parser::{parse, CodeParser, EXPECTED_COLUMNS};
pub use search::{topmost_matches, MatchMode, SearchProvider, SearchRestriction, TermSearch};
pub use selection::{SelectionAlgebra, SelectionSets, SetView};
pub use store::{CodeStore, OntologyStore};
pub use tabs::{capacity_for_width, partition, Keyed, DROPDOWN_WIDTH, TAB_WIDTH};
pub use types::{FilterStats, LoaderConfig, TreeError, TreeResult};

// Re-export codetree-types for convenience
pub use codetree_types;
