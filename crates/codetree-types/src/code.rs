//! Flat pre-order code records and ontologies.
//!
//! A `Code` carries its own position in the tree instead of pointers: the
//! ancestor chain in `path` and the end of its subtree in
//! `last_descendant_id`. Every descendant of a code has an id in
//! `(id, last_descendant_id]` and sits directly after it in the ontology array.

use std::sync::Arc;

use crate::CodeId;

/// A single node of a code ontology.
///
/// # Examples
///
/// ```
/// use codetree_types::Code;
///
/// let code = Code {
///     id: 2,
///     code: "A00.0".to_string(),
///     ontology_id: "ICD-10".to_string(),
///     description: "Cholera due to Vibrio cholerae 01".to_string(),
///     path: vec![1, 2],
///     children_ids: vec![3, 4],
///     last_descendant_id: 4,
/// };
///
/// assert_eq!(code.descendant_count(), 2);
/// assert_eq!(code.parent_id(), Some(1));
/// assert!(code.contains(4));
/// assert!(!code.contains(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Code {
    /// Pre-order id, unique within the ontology.
    pub id: CodeId,
    /// Display label (e.g. `A00.0`).
    pub code: String,
    /// Name of the ontology this code belongs to.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ontology_id: String,
    /// Human readable description.
    pub description: String,
    /// Ancestor ids from the root down, ending with this code's own id.
    pub path: Vec<CodeId>,
    /// Direct children, informational only.
    #[cfg_attr(feature = "serde", serde(default))]
    pub children_ids: Vec<CodeId>,
    /// Id of the last code in this subtree; equals `id` for leaves.
    pub last_descendant_id: CodeId,
}

impl Code {
    /// Number of strict descendants.
    pub fn descendant_count(&self) -> usize {
        self.last_descendant_id.saturating_sub(self.id) as usize
    }

    /// Returns true if the code has no descendants.
    pub fn is_leaf(&self) -> bool {
        self.last_descendant_id == self.id
    }

    /// The ancestor chain root to parent, excluding this code.
    pub fn ancestors(&self) -> &[CodeId] {
        match self.path.split_last() {
            Some((_, ancestors)) => ancestors,
            None => &[],
        }
    }

    /// Number of ancestors; roots have depth 0.
    pub fn depth(&self) -> usize {
        self.ancestors().len()
    }

    /// Direct parent, `None` for roots.
    pub fn parent_id(&self) -> Option<CodeId> {
        self.ancestors().last().copied()
    }

    /// Returns true if `id` lies in this code's strict descendant range.
    pub fn contains(&self, id: CodeId) -> bool {
        id > self.id && id <= self.last_descendant_id
    }
}

/// A named forest of codes in pre-order.
///
/// The code array is shared and never mutated once loaded.
#[derive(Debug, Clone)]
pub struct Ontology {
    /// Ontology name (e.g. `ICD-10`).
    pub name: String,
    /// Codes sorted ascending by id in pre-order.
    pub codes: Arc<[Code]>,
}

impl Ontology {
    /// Creates an ontology from its name and codes.
    pub fn new(name: impl Into<String>, codes: impl Into<Arc<[Code]>>) -> Self {
        Self {
            name: name.into(),
            codes: codes.into(),
        }
    }

    /// Number of codes in the ontology.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Returns true if the ontology has no codes.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Iterates the root codes.
    pub fn roots(&self) -> impl Iterator<Item = &Code> {
        self.codes.iter().filter(|c| c.depth() == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_code(id: CodeId, path: Vec<CodeId>, last_descendant_id: CodeId) -> Code {
        Code {
            id,
            code: format!("c-{}", id),
            ontology_id: "o".to_string(),
            description: format!("d-{}", id),
            path,
            children_ids: vec![],
            last_descendant_id,
        }
    }

    #[test]
    fn test_leaf_helpers() {
        let leaf = make_code(3, vec![1, 2, 3], 3);
        assert!(leaf.is_leaf());
        assert_eq!(leaf.descendant_count(), 0);
        assert_eq!(leaf.ancestors(), &[1, 2]);
        assert_eq!(leaf.depth(), 2);
        assert_eq!(leaf.parent_id(), Some(2));
    }

    #[test]
    fn test_root_helpers() {
        let root = make_code(1, vec![1], 13);
        assert!(!root.is_leaf());
        assert_eq!(root.descendant_count(), 12);
        assert_eq!(root.depth(), 0);
        assert_eq!(root.parent_id(), None);
        assert!(root.contains(13));
        assert!(!root.contains(14));
        assert!(!root.contains(1));
    }

    #[test]
    fn test_empty_path_has_no_ancestors() {
        let code = make_code(5, vec![], 5);
        assert!(code.ancestors().is_empty());
        assert_eq!(code.depth(), 0);
    }

    #[test]
    fn test_ontology_roots() {
        let ontology = Ontology::new(
            "o",
            vec![
                make_code(1, vec![1], 2),
                make_code(2, vec![1, 2], 2),
                make_code(3, vec![3], 3),
            ],
        );
        let roots: Vec<_> = ontology.roots().map(|c| c.id).collect();
        assert_eq!(roots, vec![1, 3]);
        assert_eq!(ontology.len(), 3);
        assert!(!ontology.is_empty());
    }
}
