//! Shared test fixtures.
//!
//! ```text
//!                 1                                     14
//!       /         |         \                  /         |
//!      2          6          10               15        19
//!   /  |  \    /  |  \    /  |  \         /   |   \    /
//!  3   4   5  7   8   9  11  12  13      16   17  18  20
//! ```

use std::collections::HashSet;

use codetree_types::{Code, CodeId};

use crate::selection::SelectionSets;

pub(crate) fn make_code(id: CodeId, path: Vec<CodeId>, children_ids: Vec<CodeId>, last: CodeId) -> Code {
    Code {
        id,
        code: format!("c-{}", id),
        ontology_id: "o".to_string(),
        description: format!("d-{}", id),
        path,
        children_ids,
        last_descendant_id: last,
    }
}

/// The 20-node two-tree ontology drawn above.
pub(crate) fn sample_ontology() -> Vec<Code> {
    generate_flat_tree(20, 3, 2, 3)
}

/// Builds a pre-order forest with `n` codes.
///
/// Every code gets up to `max_children` children until `max_depth` levels
/// exist; ids are assigned depth first.
pub(crate) fn generate_flat_tree(
    n: CodeId,
    max_children: CodeId,
    num_roots: usize,
    max_depth: usize,
) -> Vec<Code> {
    fn build(
        tree: &mut Vec<Code>,
        id: CodeId,
        parent_path: &[CodeId],
        n: CodeId,
        max_children: CodeId,
        max_depth: usize,
    ) -> CodeId {
        let mut path = parent_path.to_vec();
        path.push(id);
        let index = tree.len();
        tree.push(make_code(id, path.clone(), vec![], id));

        let mut last = id;
        if path.len() < max_depth {
            for _ in 0..max_children.min(n - id) {
                if last + 1 > n {
                    break;
                }
                let child = last + 1;
                tree[index].children_ids.push(child);
                last = build(tree, child, &path, n, max_children, max_depth);
            }
        }
        tree[index].last_descendant_id = last;
        last
    }

    let mut tree = Vec::new();
    let mut next = 1;
    for _ in 0..num_roots {
        if next > n {
            break;
        }
        next = build(&mut tree, next, &[], n, max_children, max_depth) + 1;
    }
    tree
}

pub(crate) fn id_set(ids: &[CodeId]) -> HashSet<CodeId> {
    ids.iter().copied().collect()
}

pub(crate) fn selection(entries: &[(&str, &[CodeId])]) -> SelectionSets {
    entries
        .iter()
        .map(|(key, ids)| (key.to_string(), id_set(ids)))
        .collect()
}

#[test]
fn test_sample_ontology_shape() {
    let codes = sample_ontology();
    assert_eq!(codes.len(), 20);
    assert_eq!(codes[0].children_ids, vec![2, 6, 10]);
    assert_eq!(codes[0].last_descendant_id, 13);
    assert_eq!(codes[13].id, 14);
    assert_eq!(codes[13].children_ids, vec![15, 19]);
    assert_eq!(codes[13].last_descendant_id, 20);
    assert_eq!(codes[18].path, vec![14, 19]);
    assert_eq!(codes[19].path, vec![14, 19, 20]);
}
