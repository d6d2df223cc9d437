//! Single-pass tree filter.
//!
//! Produces the ordered, annotated node list a tree view renders. The scan
//! walks the pre-order array once. Whenever a code is rejected (by the
//! search restriction or an enabled filter) or is closed, its whole subtree
//! is skipped by jumping the index past `last_descendant_id`, so hidden
//! subtrees cost O(1) regardless of size.
//!
//! ```ignore
//! let sets = SelectionSets::from_iter([("mc1", ids)]);
//! let options = FilterOptions::new(PaneFilters::only(FilterFlag::ShowOnlySelected))
//!     .open([1, 6, 10]);
//! let nodes = filter(&codes, &sets, &options)?;
//! ```

use std::collections::HashSet;
use std::time::Instant;

use codetree_types::{Code, CodeId, PaneFilters, TreeNode};
use tracing::{debug, debug_span};

use crate::classify::classify_all;
use crate::encoding::{validate, ValidatedCodes};
use crate::search::SearchRestriction;
use crate::selection::{SelectionAlgebra, SelectionSets, SetView};
use crate::types::{FilterStats, TreeResult};

/// Everything besides codes and selections that shapes one filter pass.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    /// Enabled pane filters, combined with AND.
    pub filters: PaneFilters,
    /// Codes whose children are shown; all others are collapsed.
    pub open_nodes: HashSet<CodeId>,
    /// Optional search restriction.
    pub search: Option<SearchRestriction>,
}

impl FilterOptions {
    /// Options with the given filters, nothing open and no search.
    pub fn new(filters: PaneFilters) -> Self {
        Self {
            filters,
            ..Self::default()
        }
    }

    /// Adds open codes.
    pub fn open(mut self, ids: impl IntoIterator<Item = CodeId>) -> Self {
        self.open_nodes.extend(ids);
        self
    }

    /// Restricts the pass to search results.
    pub fn restrict(mut self, search: SearchRestriction) -> Self {
        self.search = Some(search);
        self
    }
}

/// Filters `codes` after checking the tree encoding.
///
/// Returns an integrity error instead of output if `codes` is not a valid
/// nested-interval encoding.
pub fn filter(
    codes: &[Code],
    sets: &SelectionSets,
    options: &FilterOptions,
) -> TreeResult<Vec<TreeNode>> {
    validate(codes)?;
    Ok(scan(codes, sets, options).0)
}

/// Filters codes that were validated when loaded.
pub fn filter_validated(
    codes: &ValidatedCodes,
    sets: &SelectionSets,
    options: &FilterOptions,
) -> Vec<TreeNode> {
    scan(codes, sets, options).0
}

/// Like [`filter_validated`], also reporting what the pass did.
pub fn filter_with_stats(
    codes: &ValidatedCodes,
    sets: &SelectionSets,
    options: &FilterOptions,
) -> (Vec<TreeNode>, FilterStats) {
    scan(codes, sets, options)
}

fn scan(
    codes: &[Code],
    sets: &SelectionSets,
    options: &FilterOptions,
) -> (Vec<TreeNode>, FilterStats) {
    let span = debug_span!("filter_ontology", codes = codes.len(), codelists = sets.len());
    let _enter = span.enter();
    let start = Instant::now();

    let algebra = SelectionAlgebra::derive_for(codes, sets, &options.filters);
    let views: Vec<&SetView> = options
        .filters
        .enabled()
        .map(|flag| algebra.view(flag))
        .collect();

    let mut nodes = Vec::new();
    let mut stats = FilterStats::default();
    let mut last_depth = 0;
    let mut i = 0;

    while i < codes.len() {
        let code = &codes[i];
        stats.scanned += 1;
        // Index of the first code after this subtree.
        let after_subtree = i + code.descendant_count() + 1;

        if let Some(search) = &options.search {
            if !search.admits(code.id) {
                stats.pruned_by_search += 1;
                i = after_subtree;
                continue;
            }
        }

        // Every enabled filter judges the same code before any skip happens.
        if !views.iter().all(|view| view.admits(code.id)) {
            stats.pruned_by_filter += 1;
            i = after_subtree;
            continue;
        }

        let depth = code.depth();
        nodes.push(TreeNode {
            code: code.clone(),
            i: classify_all(code, sets),
            fd: depth > last_depth,
        });
        last_depth = depth;

        if options.open_nodes.contains(&code.id) {
            i += 1;
        } else {
            if !code.is_leaf() {
                stats.pruned_by_collapse += 1;
            }
            i = after_subtree;
        }
    }

    stats.emitted = nodes.len();
    stats.elapsed = start.elapsed();
    debug!(
        scanned = stats.scanned,
        emitted = stats.emitted,
        elapsed_us = stats.elapsed_us(),
        "filtered ontology"
    );
    (nodes, stats)
}
