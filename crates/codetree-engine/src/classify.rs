//! Descendant intersection classifier.
//!
//! Classifies how a selection covers a code's strict descendants. Because a
//! subtree is the id range `(id, last_descendant_id]`, the classifier walks
//! ids rather than array positions and never touches the code array.

use std::collections::HashSet;

use codetree_types::{Classification, Code, CodeId, Intersections};

use crate::selection::SelectionSets;

/// Classifies `selected` against the strict descendants of `code`.
///
/// The code's own id is not considered, so leaves are always
/// [`Classification::None`]. The scan stops at the first unselected id that
/// follows a selected one. Cost is O(subtree size); call it only for codes
/// that are actually rendered.
///
/// # Examples
///
/// ```
/// use std::collections::HashSet;
/// use codetree_engine::classify;
/// use codetree_types::{Classification, Code};
///
/// let code = Code {
///     id: 1,
///     code: "A".to_string(),
///     ontology_id: String::new(),
///     description: String::new(),
///     path: vec![1],
///     children_ids: vec![],
///     last_descendant_id: 10,
/// };
///
/// let some: HashSet<u32> = [5, 6, 7].into_iter().collect();
/// let all: HashSet<u32> = (2..=10).collect();
/// assert_eq!(classify(&code, &some), Classification::Partial);
/// assert_eq!(classify(&code, &all), Classification::Full);
/// assert_eq!(classify(&code, &HashSet::new()), Classification::None);
/// ```
pub fn classify(code: &Code, selected: &HashSet<CodeId>) -> Classification {
    let total = code.descendant_count();
    if total == 0 || selected.is_empty() {
        return Classification::None;
    }

    let mut included = 0usize;
    for id in code.id + 1..=code.last_descendant_id {
        if selected.contains(&id) {
            included += 1;
        } else if included > 0 {
            return Classification::Partial;
        }
    }

    if included == 0 {
        Classification::None
    } else if included == total {
        Classification::Full
    } else {
        Classification::Partial
    }
}

/// Classifies `code` against every codelist, in codelist order.
pub fn classify_all(code: &Code, sets: &SelectionSets) -> Intersections {
    let mut intersections = Intersections::with_capacity(sets.len());
    for (key, ids) in sets.iter() {
        intersections.insert(key, classify(code, ids));
    }
    intersections
}
