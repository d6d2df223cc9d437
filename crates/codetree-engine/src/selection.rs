//! Selection sets and the algebra derived from them.
//!
//! Each codelist under comparison contributes one id set. From the
//! collection we derive the union (`selected`), the intersection
//! (`overlap`) and their difference (`differing`), each with its ancestor
//! closure so that ancestors of qualifying codes stay navigable.

use std::collections::HashSet;

use codetree_types::{Code, CodeId, FilterFlag, PaneFilters};
use tracing::trace;

/// Codelist key to selected ids, in insertion order.
///
/// # Examples
///
/// ```
/// use codetree_engine::SelectionSets;
///
/// let mut sets = SelectionSets::new();
/// sets.insert("mc1", [9, 13, 20]);
/// sets.insert("mc2", [9, 11, 16]);
///
/// assert_eq!(sets.keys().collect::<Vec<_>>(), vec!["mc1", "mc2"]);
/// assert!(sets.intersection().contains(&9));
/// assert_eq!(sets.union().len(), 5);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSets {
    entries: Vec<(String, HashSet<CodeId>)>,
}

impl SelectionSets {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the ids of codelist `key`.
    ///
    /// An existing key keeps its position and has its set replaced.
    pub fn insert(&mut self, key: impl Into<String>, ids: impl IntoIterator<Item = CodeId>) {
        let key = key.into();
        let ids: HashSet<CodeId> = ids.into_iter().collect();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = ids,
            None => self.entries.push((key, ids)),
        }
    }

    /// Removes codelist `key`, returning its ids.
    pub fn remove(&mut self, key: &str) -> Option<HashSet<CodeId>> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Ids of codelist `key`.
    pub fn get(&self, key: &str) -> Option<&HashSet<CodeId>> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, ids)| ids)
    }

    /// Iterates codelists in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HashSet<CodeId>)> {
        self.entries.iter().map(|(k, ids)| (k.as_str(), ids))
    }

    /// Iterates codelist keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Number of codelists.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no codelists.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids selected in at least one codelist.
    pub fn union(&self) -> HashSet<CodeId> {
        let mut union = HashSet::new();
        for (_, ids) in &self.entries {
            union.extend(ids.iter().copied());
        }
        union
    }

    /// Ids selected in every codelist; empty when there are no codelists.
    pub fn intersection(&self) -> HashSet<CodeId> {
        let mut entries = self.entries.iter().map(|(_, ids)| ids);
        let Some(first) = entries.next() else {
            return HashSet::new();
        };
        entries.fold(first.clone(), |acc, ids| {
            acc.intersection(ids).copied().collect()
        })
    }
}

impl<K: Into<String>> FromIterator<(K, HashSet<CodeId>)> for SelectionSets {
    fn from_iter<T: IntoIterator<Item = (K, HashSet<CodeId>)>>(iter: T) -> Self {
        let mut sets = Self::new();
        for (key, ids) in iter {
            sets.insert(key, ids);
        }
        sets
    }
}

/// A derived id set together with its ancestor closure.
#[derive(Debug, Clone, Default)]
pub struct SetView {
    /// Member ids.
    pub members: HashSet<CodeId>,
    /// Ancestors of members, excluding the members' own ids.
    pub ancestors: HashSet<CodeId>,
}

impl SetView {
    fn new(members: HashSet<CodeId>) -> Self {
        Self {
            members,
            ancestors: HashSet::new(),
        }
    }

    /// Returns true if `id` is a member or an ancestor of one.
    pub fn admits(&self, id: CodeId) -> bool {
        self.members.contains(&id) || self.ancestors.contains(&id)
    }

    /// Fills the ancestor closure from the paths of member codes.
    ///
    /// Members are looked up by binary search on the id-sorted array, so the
    /// cost is proportional to the member count, not the ontology size. Ids
    /// missing from `codes` contribute nothing.
    fn close_over(&mut self, codes: &[Code]) {
        for id in &self.members {
            if let Ok(index) = codes.binary_search_by_key(id, |c| c.id) {
                self.ancestors.extend(codes[index].ancestors().iter().copied());
            }
        }
    }
}

/// Union, intersection and difference of a selection collection.
#[derive(Debug, Clone, Default)]
pub struct SelectionAlgebra {
    /// Selected in any codelist.
    pub selected: SetView,
    /// Selected in every codelist.
    pub overlap: SetView,
    /// Selected in some but not every codelist.
    pub differing: SetView,
}

impl SelectionAlgebra {
    /// Derives all three sets and all three ancestor closures.
    pub fn derive(codes: &[Code], sets: &SelectionSets) -> Self {
        let mut algebra = Self::members(sets);
        algebra.selected.close_over(codes);
        algebra.overlap.close_over(codes);
        algebra.differing.close_over(codes);
        algebra
    }

    /// Derives the sets, closing over ancestors only for enabled filters.
    pub fn derive_for(codes: &[Code], sets: &SelectionSets, filters: &PaneFilters) -> Self {
        let mut algebra = Self::members(sets);
        for flag in filters.enabled() {
            algebra.view_mut(flag).close_over(codes);
        }
        trace!(
            selected = algebra.selected.members.len(),
            overlap = algebra.overlap.members.len(),
            differing = algebra.differing.members.len(),
            "derived selection algebra"
        );
        algebra
    }

    fn members(sets: &SelectionSets) -> Self {
        let selected = sets.union();
        let overlap = sets.intersection();
        let differing = selected.difference(&overlap).copied().collect();
        Self {
            selected: SetView::new(selected),
            overlap: SetView::new(overlap),
            differing: SetView::new(differing),
        }
    }

    /// The view a filter flag tests against.
    pub fn view(&self, flag: FilterFlag) -> &SetView {
        match flag {
            FilterFlag::ShowOnlySelected => &self.selected,
            FilterFlag::ShowOnlyOverlapping => &self.overlap,
            FilterFlag::ShowDiffering => &self.differing,
        }
    }

    fn view_mut(&mut self, flag: FilterFlag) -> &mut SetView {
        match flag {
            FilterFlag::ShowOnlySelected => &mut self.selected,
            FilterFlag::ShowOnlyOverlapping => &mut self.overlap,
            FilterFlag::ShowDiffering => &mut self.differing,
        }
    }
}
