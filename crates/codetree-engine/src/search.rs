//! Search restriction of the visible tree.
//!
//! A search provider returns match records (id plus ancestor path). The
//! filter engine only needs two sets from them: the matched ids and the
//! ancestors of matches, which stay visible so the matches are reachable.
//!
//! The real search backend is external; [`TermSearch`] is a simple
//! in-memory provider over code labels and descriptions.

use std::borrow::Borrow;
use std::collections::HashSet;

use codetree_types::{Code, CodeId, SearchMatch};
use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::types::TreeResult;

/// Ids admitted by a search: the matches and their ancestors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRestriction {
    /// Ids of the matched codes.
    pub matched_ids: HashSet<CodeId>,
    /// Ancestors of matched codes.
    pub matched_ancestors: HashSet<CodeId>,
}

impl SearchRestriction {
    /// Derives the restriction from match records.
    ///
    /// # Examples
    ///
    /// ```
    /// use codetree_engine::SearchRestriction;
    /// use codetree_types::SearchMatch;
    ///
    /// let restriction = SearchRestriction::from_matches(&[SearchMatch::new(9, vec![1, 6, 9])]);
    /// assert!(restriction.admits(9));
    /// assert!(restriction.admits(6));
    /// assert!(!restriction.admits(2));
    /// ```
    pub fn from_matches<I>(matches: I) -> Self
    where
        I: IntoIterator,
        I::Item: Borrow<SearchMatch>,
    {
        let mut restriction = Self::default();
        for m in matches {
            let m = m.borrow();
            restriction.matched_ids.insert(m.id);
            restriction
                .matched_ancestors
                .extend(m.ancestors().iter().copied());
        }
        restriction
    }

    /// Derives the restriction from the topmost matches only.
    ///
    /// See [`topmost_matches`].
    pub fn from_topmost(matches: &[SearchMatch]) -> Self {
        Self::from_matches(topmost_matches(matches))
    }

    /// Returns true if `id` is a match or an ancestor of one.
    pub fn admits(&self, id: CodeId) -> bool {
        self.matched_ids.contains(&id) || self.matched_ancestors.contains(&id)
    }

    /// Returns true if nothing matched.
    pub fn is_empty(&self) -> bool {
        self.matched_ids.is_empty()
    }
}

/// Drops matches nested below another kept match.
///
/// Matches are considered shallowest first; a match is kept only if none of
/// its ancestors was kept. The result is ordered by depth, stable within a
/// depth.
pub fn topmost_matches(matches: &[SearchMatch]) -> Vec<SearchMatch> {
    let mut ordered: Vec<&SearchMatch> = matches.iter().collect();
    ordered.sort_by_key(|m| m.path.len());

    let mut kept_ids = HashSet::new();
    let mut kept = Vec::new();
    for m in ordered {
        if m.ancestors().iter().all(|a| !kept_ids.contains(a)) {
            kept_ids.insert(m.id);
            kept.push(m.clone());
        }
    }
    kept
}

/// Source of search matches for a query.
pub trait SearchProvider {
    /// Returns the codes of `codes` matching `query`.
    fn search(&self, codes: &[Code], query: &str) -> TreeResult<Vec<SearchMatch>>;
}

/// How [`TermSearch`] interprets a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Case-insensitive substring.
    #[default]
    Substring,
    /// Case-insensitive regular expression.
    Regex,
}

/// Linear search over code labels and descriptions.
#[derive(Debug, Clone, Default)]
pub struct TermSearch {
    /// Query interpretation.
    pub mode: MatchMode,
    /// Maximum number of matches; `None` for all.
    pub limit: Option<usize>,
}

impl TermSearch {
    /// Creates a provider with the given mode and no limit.
    pub fn new(mode: MatchMode) -> Self {
        Self { mode, limit: None }
    }

    /// Caps the number of matches returned.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn pattern(&self, query: &str) -> TreeResult<Regex> {
        let source = match self.mode {
            MatchMode::Substring => regex::escape(query),
            MatchMode::Regex => query.to_string(),
        };
        Ok(RegexBuilder::new(&source).case_insensitive(true).build()?)
    }
}

impl SearchProvider for TermSearch {
    fn search(&self, codes: &[Code], query: &str) -> TreeResult<Vec<SearchMatch>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let pattern = self.pattern(query)?;
        let limit = self.limit.unwrap_or(usize::MAX);
        let matches: Vec<SearchMatch> = codes
            .iter()
            .filter(|c| pattern.is_match(&c.code) || pattern.is_match(&c.description))
            .take(limit)
            .map(SearchMatch::from)
            .collect();

        debug!(query, matches = matches.len(), "term search");
        Ok(matches)
    }
}
