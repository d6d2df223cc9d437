//! Request and response messages of the JSON-lines protocol.

use std::collections::HashSet;

use codetree_engine::{FilterStats, SelectionSets};
use codetree_types::{CodeId, PaneFilters, TreeNode};
use serde::{Deserialize, Serialize};

/// Ids selected in one codelist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionEntry {
    /// Codelist key.
    pub key: String,
    /// Selected code ids.
    #[serde(default)]
    pub ids: Vec<CodeId>,
}

/// A request to render one tree pane.
///
/// ```json
/// {"ontology": "ICD-10",
///  "selection": [{"key": "mc1", "ids": [9, 13, 20]}],
///  "filters": {"showOnlySelected": true},
///  "openNodes": [1, 6, 10],
///  "search": "cholera"}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    /// Ontology to render.
    pub ontology: String,
    /// Codelists under comparison, in display order.
    #[serde(default)]
    pub selection: Vec<SelectionEntry>,
    /// Pane filter flags.
    #[serde(default)]
    pub filters: PaneFilters,
    /// Expanded node ids.
    #[serde(default)]
    pub open_nodes: Vec<CodeId>,
    /// Search query restricting the tree, if any.
    #[serde(default)]
    pub search: Option<String>,
    /// Interpret `search` as a regular expression.
    #[serde(default)]
    pub regex: bool,
    /// Keep only the shallowest of nested search matches.
    ///
    /// With `true`, a match nested below another match is hidden, as the
    /// browser tree pane does. The default shows every match.
    #[serde(default)]
    pub topmost_only: bool,
}

impl FilterRequest {
    /// Creates a request for `ontology` with no selections or filters.
    pub fn new(ontology: impl Into<String>) -> Self {
        Self {
            ontology: ontology.into(),
            ..Default::default()
        }
    }

    /// The selection entries as engine selection sets.
    ///
    /// Later entries with a repeated key replace earlier ones in place.
    pub fn selection_sets(&self) -> SelectionSets {
        self.selection
            .iter()
            .map(|entry| {
                let ids: HashSet<CodeId> = entry.ids.iter().copied().collect();
                (entry.key.clone(), ids)
            })
            .collect()
    }

    /// The trimmed search query, or `None` if blank.
    pub fn query(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }
}

/// Counters of one filter pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseStats {
    /// Codes inspected.
    pub scanned: usize,
    /// Nodes emitted.
    pub emitted: usize,
    /// Subtrees dropped by the search restriction.
    pub pruned_by_search: usize,
    /// Subtrees dropped by filters.
    pub pruned_by_filter: usize,
    /// Closed nodes whose children were skipped.
    pub pruned_by_collapse: usize,
    /// Search matches found, if a search ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_matches: Option<usize>,
    /// Time spent in the filter pass, in microseconds.
    pub elapsed_us: u64,
}

impl From<&FilterStats> for ResponseStats {
    fn from(stats: &FilterStats) -> Self {
        Self {
            scanned: stats.scanned,
            emitted: stats.emitted,
            pruned_by_search: stats.pruned_by_search,
            pruned_by_filter: stats.pruned_by_filter,
            pruned_by_collapse: stats.pruned_by_collapse,
            search_matches: None,
            elapsed_us: stats.elapsed_us(),
        }
    }
}

/// The rendered node list of one pane.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterResponse {
    /// Nodes to render, in pre-order.
    pub nodes: Vec<TreeNode>,
    /// What the pass did.
    pub stats: ResponseStats,
}

/// Error reply written in place of a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReply {
    /// Error message.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use codetree_types::FilterFlag;
    use std::time::Duration;

    #[test]
    fn test_request_defaults() {
        let request: FilterRequest = serde_json::from_str(r#"{"ontology": "ICD-10"}"#).unwrap();
        assert_eq!(request, FilterRequest::new("ICD-10"));
        assert!(request.filters.is_empty());
        assert!(request.query().is_none());
    }

    #[test]
    fn test_request_wire_names() {
        let request: FilterRequest = serde_json::from_str(
            r#"{
                "ontology": "ICD-10",
                "selection": [{"key": "mc1", "ids": [9, 13]}, {"key": "mc2"}],
                "filters": {"showOnlyOverlapping": true},
                "openNodes": [1, 6],
                "search": "  cholera ",
                "regex": true,
                "topmostOnly": true
            }"#,
        )
        .unwrap();

        assert!(request.filters.is_enabled(FilterFlag::ShowOnlyOverlapping));
        assert_eq!(request.open_nodes, vec![1, 6]);
        assert_eq!(request.query(), Some("cholera"));
        assert!(request.regex && request.topmost_only);

        let sets = request.selection_sets();
        assert_eq!(sets.keys().collect::<Vec<_>>(), vec!["mc1", "mc2"]);
        assert!(sets.get("mc2").map_or(false, |ids| ids.is_empty()));
    }

    #[test]
    fn test_blank_search_is_no_search() {
        let mut request = FilterRequest::new("o");
        request.search = Some("   ".to_string());
        assert!(request.query().is_none());
    }

    #[test]
    fn test_stats_conversion() {
        let stats = FilterStats {
            scanned: 7,
            emitted: 3,
            elapsed: Duration::from_millis(2),
            ..Default::default()
        };
        let converted = ResponseStats::from(&stats);
        assert_eq!(converted.scanned, 7);
        assert_eq!(converted.elapsed_us, 2000);

        let json = serde_json::to_value(&converted).unwrap();
        assert_eq!(json["prunedByCollapse"], 0);
        assert!(json.get("searchMatches").is_none());
    }
}
