//! Bidirectional BFS strategy: a backward frontier that discovers "what can
//! reach target", alternated with forward assembly from the basics (§4.3.3).

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Arc;

use crate::element::BASIC_ELEMENTS;
use crate::solver::SolveOutcome;
use crate::store::Store;
use crate::tree::Node;

pub fn find_recipe_bidirectional(target: &str, store: &Store) -> SolveOutcome {
    if store.is_basic(target) {
        return SolveOutcome {
            tree: Some(Node::leaf(target)),
            visited: 1,
        };
    }

    let mut forward_map: BTreeMap<String, Arc<Node>> = BASIC_ELEMENTS
        .iter()
        .map(|b| (b.to_string(), Arc::new(Node::leaf(*b))))
        .collect();

    let mut backward_visited: BTreeSet<String> = BTreeSet::new();
    backward_visited.insert(target.to_string());
    let mut backward_queue: VecDeque<String> = VecDeque::from([target.to_string()]);
    let mut visited = 0usize;

    loop {
        let mut forward_progressed = true;
        while forward_progressed {
            forward_progressed = false;
            for elem in backward_visited.clone() {
                if forward_map.contains_key(&elem) {
                    continue;
                }
                for combo in store.tier_monotone_combinations_of(&elem) {
                    if let (Some(l), Some(r)) =
                        (forward_map.get(&combo.left).cloned(), forward_map.get(&combo.right).cloned())
                    {
                        forward_map.insert(elem.clone(), Arc::new(Node::interior(elem.clone(), l, r)));
                        forward_progressed = true;
                        break;
                    }
                }
            }
        }

        if forward_map.contains_key(target) {
            break;
        }

        let frontier: Vec<String> = backward_queue.drain(..).collect();
        if frontier.is_empty() {
            // Backward search exhausted with no intersection: target is
            // unreachable from the basics under the tier-monotone rule.
            break;
        }

        for current in frontier {
            visited += 1;
            for combo in store.tier_monotone_combinations_of(&current) {
                for candidate in [combo.left.clone(), combo.right.clone()] {
                    if backward_visited.insert(candidate.clone()) {
                        backward_queue.push_back(candidate);
                    }
                }
            }
        }
    }

    // Edge case (§4.3.3): the frontiers may intersect at a non-target
    // element first, but the contract is to keep expanding forward until
    // `target` itself is reachable — `forward_map.get(target)` below is
    // therefore always the right answer, never an intersection node.
    let tree = forward_map.get(target).map(|rc| (**rc).clone());
    SolveOutcome { tree, visited }
}
