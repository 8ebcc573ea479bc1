//! BFS strategy: top-down discovery of the reachable closure, then
//! bottom-up assembly (§4.3.1).

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use crate::solver::SolveOutcome;
use crate::store::Store;
use crate::tree::Node;

pub fn find_recipe_bfs(target: &str, store: &Store) -> SolveOutcome {
    if store.is_basic(target) {
        return SolveOutcome {
            tree: Some(Node::leaf(target)),
            visited: 1,
        };
    }

    let mut visited_set: BTreeMap<String, ()> = BTreeMap::new();
    let mut queue: VecDeque<String> = VecDeque::new();
    queue.push_back(target.to_string());
    let mut visited_count = 0usize;

    while let Some(current) = queue.pop_front() {
        if visited_set.contains_key(&current) {
            continue;
        }
        visited_set.insert(current.clone(), ());
        visited_count += 1;

        if store.is_basic(&current) {
            continue;
        }

        for combo in store.tier_monotone_combinations_of(&current) {
            if !visited_set.contains_key(&combo.left) {
                queue.push_back(combo.left.clone());
            }
            if !visited_set.contains_key(&combo.right) {
                queue.push_back(combo.right.clone());
            }
        }
    }

    let mut assembled: BTreeMap<String, Arc<Node>> = BTreeMap::new();
    for elem in visited_set.keys() {
        if store.is_basic(elem) {
            assembled.insert(elem.clone(), Arc::new(Node::leaf(elem.clone())));
        }
    }

    let mut changed = true;
    while changed {
        changed = false;
        for elem in visited_set.keys() {
            if assembled.contains_key(elem) {
                continue;
            }
            for combo in store.tier_monotone_combinations_of(elem) {
                let (left_tree, right_tree) = (assembled.get(&combo.left), assembled.get(&combo.right));
                if let (Some(l), Some(r)) = (left_tree, right_tree) {
                    let node = Node::interior(elem.clone(), l.clone(), r.clone());
                    assembled.insert(elem.clone(), Arc::new(node));
                    changed = true;
                    break;
                }
            }
        }
    }

    let tree = assembled.get(target).map(|rc| (**rc).clone());
    SolveOutcome {
        tree,
        visited: visited_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> Store {
        Store::load(
            r#"[
                {"root":"Mud","left":"Earth","right":"Water","tier":"1"},
                {"root":"Lava","left":"Earth","right":"Fire","tier":"1"},
                {"root":"Brick","left":"Mud","right":"Fire","tier":"2"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn basic_target_returns_a_leaf_with_visited_one() {
        let store = sample_store();
        let outcome = find_recipe_bfs("Earth", &store);
        assert_eq!(outcome.visited, 1);
        assert_eq!(outcome.tree, Some(Node::leaf("Earth")));
    }

    #[test]
    fn derived_target_assembles_a_valid_tree() {
        let store = sample_store();
        let outcome = find_recipe_bfs("Mud", &store);
        let tree = outcome.tree.expect("expected a tree for Mud");
        assert!(tree.is_valid(&store));
        assert_eq!(tree.element(), "Mud");
    }

    #[test]
    fn multi_level_target_assembles_transitively() {
        let store = sample_store();
        let outcome = find_recipe_bfs("Brick", &store);
        let tree = outcome.tree.expect("expected a tree for Brick");
        assert!(tree.is_valid(&store));
    }

    #[test]
    fn unknown_target_yields_no_tree() {
        let store = sample_store();
        let outcome = find_recipe_bfs("Phlogiston", &store);
        assert!(outcome.tree.is_none());
    }
}
