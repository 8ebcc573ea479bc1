//! DFS strategy: recursive, target-down, first-match (§4.3.2).

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::solver::SolveOutcome;
use crate::store::Store;
use crate::tree::Node;

pub fn find_recipe_dfs(target: &str, store: &Store) -> SolveOutcome {
    let mut on_path: BTreeSet<String> = BTreeSet::new();
    let mut visited = 0usize;
    let tree = build(target, store, &mut on_path, &mut visited);
    SolveOutcome { tree, visited }
}

/// `on_path` is an in/out-of-path marker, not a permanent visited set:
/// it is inserted on entry and removed before every return, so that two
/// distinct subtrees may each independently reference the same element.
/// A global visited set here would be incorrect (§9).
fn build(element: &str, store: &Store, on_path: &mut BTreeSet<String>, visited: &mut usize) -> Option<Node> {
    if store.is_basic(element) {
        *visited += 1;
        return Some(Node::leaf(element));
    }
    if on_path.contains(element) {
        return None;
    }

    on_path.insert(element.to_string());
    *visited += 1;

    for combo in store.tier_monotone_combinations_of(element) {
        let left = combo.left.clone();
        let right = combo.right.clone();
        let Some(left_tree) = build(&left, store, on_path, visited) else {
            continue;
        };
        let Some(right_tree) = build(&right, store, on_path, visited) else {
            continue;
        };
        on_path.remove(element);
        return Some(Node::interior(element, Arc::new(left_tree), Arc::new(right_tree)));
    }

    on_path.remove(element);
    None
}
