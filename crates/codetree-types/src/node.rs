//! Annotated output nodes.
//!
//! The filter engine emits one `TreeNode` per visible code, in pre-order.
//! Renderers consume the list positionally and use `fd` to draw nesting
//! transitions without parent pointers.

use crate::{Classification, Code};

/// Per-codelist classification of a node, in codelist insertion order.
///
/// Serialises as a map keyed by codelist.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Intersections(Vec<(String, Classification)>);

impl Intersections {
    /// Creates an empty annotation map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an annotation map with room for `capacity` codelists.
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Appends a codelist classification, replacing an existing entry for `key`.
    pub fn insert(&mut self, key: impl Into<String>, classification: Classification) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = classification,
            None => self.0.push((key, classification)),
        }
    }

    /// Looks up the classification for `key`.
    pub fn get(&self, key: &str) -> Option<Classification> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, c)| *c)
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Classification)> {
        self.0.iter().map(|(k, c)| (k.as_str(), *c))
    }

    /// Number of codelists.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no codelists.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Classification)> for Intersections {
    fn from_iter<T: IntoIterator<Item = (String, Classification)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (key, classification) in iter {
            map.insert(key, classification);
        }
        map
    }
}

/// A visible code with its render annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeNode {
    /// The underlying code.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub code: Code,
    /// Descendant intersection per codelist.
    pub i: Intersections,
    /// First descendant: this node is deeper than the previously emitted one.
    pub fd: bool,
}

impl TreeNode {
    /// The code id.
    pub fn id(&self) -> crate::CodeId {
        self.code.id
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use std::fmt;

    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::Intersections;
    use crate::Classification;

    impl Serialize for Intersections {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.0.len()))?;
            for (key, classification) in &self.0 {
                map.serialize_entry(key, classification)?;
            }
            map.end()
        }
    }

    struct IntersectionsVisitor;

    impl<'de> Visitor<'de> for IntersectionsVisitor {
        type Value = Intersections;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of codelist keys to classifications")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut map = Intersections::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((key, value)) = access.next_entry::<String, Classification>()? {
                map.insert(key, value);
            }
            Ok(map)
        }
    }

    impl<'de> Deserialize<'de> for Intersections {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_map(IntersectionsVisitor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersections_keep_insertion_order() {
        let mut map = Intersections::new();
        map.insert("mc2", Classification::Full);
        map.insert("mc1", Classification::None);
        map.insert("mc2", Classification::Partial);

        let keys: Vec<_> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["mc2", "mc1"]);
        assert_eq!(map.get("mc2"), Some(Classification::Partial));
        assert_eq!(map.get("mc3"), None);
        assert_eq!(map.len(), 2);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_tree_node_serializes_flat() {
        let node = TreeNode {
            code: Code {
                id: 6,
                code: "c-6".to_string(),
                ontology_id: "o".to_string(),
                description: "d-6".to_string(),
                path: vec![1, 6],
                children_ids: vec![7, 8, 9],
                last_descendant_id: 9,
            },
            i: [("mc1".to_string(), Classification::Partial)]
                .into_iter()
                .collect(),
            fd: true,
        };

        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["id"], 6);
        assert_eq!(json["last_descendant_id"], 9);
        assert_eq!(json["i"]["mc1"], "PARTIAL");
        assert_eq!(json["fd"], true);

        let parsed: TreeNode = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, node);
    }
}
