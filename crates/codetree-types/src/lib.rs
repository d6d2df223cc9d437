//! # codetree-types
//!
//! Type definitions for hierarchical medical code ontologies stored as flat
//! pre-order arrays.
//!
//! Each [`Code`] carries its ancestor `path` and the id of the last code in
//! its subtree, so a whole subtree is the contiguous id range
//! `(id, last_descendant_id]`. The filter engine in `codetree-engine` relies
//! on this to skip subtrees in O(1).
//!
//! ## Features
//!
//! - `serde` (default): Enables serialization/deserialization support via serde.
//!   Disable this feature for zero-dependency usage.
//!
//! ## Usage
//!
//! ```rust
//! use codetree_types::{Classification, Code, CodeId, FilterFlag, PaneFilters};
//!
//! let root = Code {
//!     id: 1,
//!     code: "A00".to_string(),
//!     ontology_id: "ICD-10".to_string(),
//!     description: "Cholera".to_string(),
//!     path: vec![1],
//!     children_ids: vec![2],
//!     last_descendant_id: 2,
//! };
//!
//! assert_eq!(root.depth(), 0);
//! assert_eq!(root.descendant_count(), 1);
//!
//! let filters = PaneFilters::only(FilterFlag::ShowOnlySelected);
//! assert!(filters.is_enabled(FilterFlag::ShowOnlySelected));
//!
//! let id: CodeId = root.last_descendant_id;
//! assert_eq!(Classification::default(), Classification::None);
//! # let _ = id;
//! ```

#![warn(missing_docs)]

mod code;
mod code_id;
mod enums;
mod filters;
mod node;
mod search;
mod tab;

// Re-export all public types at crate root
pub use code::{Code, Ontology};
pub use code_id::CodeId;
pub use enums::{Classification, FilterFlag};
pub use filters::PaneFilters;
pub use node::{Intersections, TreeNode};
pub use search::SearchMatch;
pub use tab::{TabItem, TabKind};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_types_are_exported() {
        // Verify all types are accessible from crate root
        let _id: CodeId = 1;
        let _classification = Classification::Partial;
        let _flag = FilterFlag::ShowDiffering;
        let _filters = PaneFilters::default();
        let _intersections = Intersections::new();
        let _tab = TabItem::new("t", TabKind::Phenotype);
        let _m = SearchMatch::new(1, vec![1]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let code = Code {
            id: 14,
            code: "c-14".to_string(),
            ontology_id: "o".to_string(),
            description: "d-14".to_string(),
            path: vec![14],
            children_ids: vec![15, 19],
            last_descendant_id: 20,
        };

        let json = serde_json::to_string(&code).unwrap();
        let parsed: Code = serde_json::from_str(&json).unwrap();
        assert_eq!(code, parsed);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_pane_filters_wire_names() {
        let filters: PaneFilters =
            serde_json::from_str(r#"{"showOnlySelected": true}"#).unwrap();
        assert!(filters.show_only_selected);
        assert!(!filters.show_differing);

        let flag: FilterFlag = serde_json::from_str(r#""showDiffering""#).unwrap();
        assert_eq!(flag, FilterFlag::ShowDiffering);
    }
}
