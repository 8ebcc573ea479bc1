//! The multi-recipe enumerator (§4.4): a cached, recursive search that
//! returns up to `k` canonically distinct trees for a target.
//!
//! This module is the sequential reference algorithm. The concurrent
//! fan-out described in §4.4/§5 (parallel branches, a shared `seen` set, a
//! mutex-guarded collector, an atomic counter, cooperative cancellation)
//! is layered on top of [`recipes_of`] in `alchemy_service`, the same way
//! the teacher's `zb_core::resolve_closure` is a plain, sequential
//! algorithm that `zb_io`'s planner later drives with bounded concurrency.

use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::element::Tier;
use crate::store::Store;
use crate::tree::Node;

/// Hook the recursive search calls at every entry: bump a visit counter,
/// and report whether a cancellation signal (deadline or "collector full")
/// has fired. Implemented sequentially here ([`CountingSink`],
/// [`DeadlineSink`]); `alchemy_service` provides an atomic/mutex-backed
/// implementation for the concurrent driver.
pub trait VisitSink {
    fn bump(&self);
    fn cancelled(&self) -> bool;
}

/// A sink that only counts visits and never cancels. Used by tests and by
/// callers that don't need a deadline.
pub struct CountingSink {
    count: Cell<usize>,
}

impl CountingSink {
    pub fn new() -> CountingSink {
        CountingSink { count: Cell::new(0) }
    }

    pub fn count(&self) -> usize {
        self.count.get()
    }
}

impl Default for CountingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl VisitSink for CountingSink {
    fn bump(&self) {
        self.count.set(self.count.get() + 1);
    }

    fn cancelled(&self) -> bool {
        false
    }
}

/// A sink that counts visits and cancels once a wall-clock deadline
/// passes. The deadline is checked cooperatively, at every recursive
/// entry — there is no background timer thread.
pub struct DeadlineSink {
    count: Cell<usize>,
    deadline: Instant,
}

impl DeadlineSink {
    pub fn new(budget: Duration) -> DeadlineSink {
        DeadlineSink {
            count: Cell::new(0),
            deadline: Instant::now() + budget,
        }
    }

    pub fn count(&self) -> usize {
        self.count.get()
    }
}

impl VisitSink for DeadlineSink {
    fn bump(&self) {
        self.count.set(self.count.get() + 1);
    }

    fn cancelled(&self) -> bool {
        Instant::now() >= self.deadline
    }
}

/// Per-element memoization cache: bounds memory and recomputation. Entries
/// are truncated to `cap` trees, trading completeness for termination.
pub type RecipeCache = HashMap<String, Vec<Arc<Node>>>;

/// Recursive, cached enumeration of distinct build trees for `element`
/// (§4.4's `recipesOf`). Returns the empty list for an unreachable or
/// cancelled branch; a cancelled branch's partial result is never written
/// into `cache` (§5: "cancellation must not corrupt the cache").
pub fn recipes_of(
    element: &str,
    store: &Store,
    cache: &mut RecipeCache,
    cap: usize,
    sink: &dyn VisitSink,
) -> Vec<Arc<Node>> {
    if sink.cancelled() {
        return Vec::new();
    }
    if store.is_basic(element) {
        sink.bump();
        return vec![Arc::new(Node::leaf(element))];
    }
    if let Some(cached) = cache.get(element) {
        return cached.clone();
    }
    if store.tier_of(element) == Tier::Unknown {
        return Vec::new();
    }

    sink.bump();
    let mut local: Vec<Arc<Node>> = Vec::new();

    'combos: for combo in store.tier_monotone_combinations_of(element) {
        if sink.cancelled() {
            break;
        }
        let left_trees = recipes_of(&combo.left, store, cache, cap, sink);
        if left_trees.is_empty() {
            continue;
        }
        let right_trees = recipes_of(&combo.right, store, cache, cap, sink);
        if right_trees.is_empty() {
            continue;
        }
        for l in &left_trees {
            for r in &right_trees {
                if sink.cancelled() {
                    break 'combos;
                }
                local.push(Arc::new(Node::interior(element, l.clone(), r.clone())));
            }
        }
    }

    local.sort_by_key(|n| n.depth());
    local.truncate(cap);

    if !sink.cancelled() {
        cache.insert(element.to_string(), local.clone());
    }
    local
}

/// Top-level entry point: up to `k` canonically distinct trees for
/// `target`. Unknown targets yield an empty list; basic targets yield
/// exactly `[leaf(target)]`; a deadline that expires before any result is
/// found also yields an empty list (§4.4 failure modes).
pub fn enumerate(target: &str, k: usize, store: &Store, sink: &dyn VisitSink) -> Vec<Node> {
    if store.is_basic(target) {
        sink.bump();
        return vec![Node::leaf(target)];
    }
    if store.tier_of(target) == Tier::Unknown {
        return Vec::new();
    }

    let cap = (2 * k).max(1);
    let mut cache = RecipeCache::new();
    let candidates = recipes_of(target, store, &mut cache, cap, sink);

    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();
    for node in candidates {
        if out.len() >= k {
            break;
        }
        let signature = node.signature();
        if seen.insert(signature) {
            out.push((*node).clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> Store {
        Store::load(
            r#"[
                {"root":"Rock","left":"Earth","right":"Air","tier":"1"},
                {"root":"Lava","left":"Earth","right":"Fire","tier":"2"},
                {"root":"Lava","left":"Fire","right":"Rock","tier":"2"},
                {"root":"Mud","left":"Earth","right":"Water","tier":"1"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn basic_target_returns_single_leaf() {
        let store = sample_store();
        let sink = CountingSink::new();
        let trees = enumerate("Earth", 10, &store, &sink);
        assert_eq!(trees, vec![Node::leaf("Earth")]);
    }

    #[test]
    fn unknown_target_returns_empty() {
        let store = sample_store();
        let sink = CountingSink::new();
        let trees = enumerate("Phlogiston", 10, &store, &sink);
        assert!(trees.is_empty());
    }

    #[test]
    fn multiple_recipes_are_pairwise_distinct_and_valid() {
        let store = sample_store();
        let sink = CountingSink::new();
        let trees = enumerate("Lava", 5, &store, &sink);
        assert_eq!(trees.len(), 2, "Lava has exactly two tier-monotone recipes in the sample store");
        let mut signatures: Vec<String> = trees.iter().map(|t| t.signature()).collect();
        signatures.sort();
        signatures.dedup();
        assert_eq!(signatures.len(), trees.len());
        for tree in &trees {
            assert!(tree.is_valid(&store));
            assert_eq!(tree.element(), "Lava");
        }
    }

    #[test]
    fn expired_deadline_yields_empty_result() {
        let store = sample_store();
        let sink = DeadlineSink::new(Duration::from_secs(0));
        // The sink is already past its deadline as soon as it's constructed.
        let trees = enumerate("Lava", 5, &store, &sink);
        assert!(trees.is_empty());
    }

    #[test]
    fn cache_does_not_cross_contaminate_between_calls() {
        let store = sample_store();
        let sink = CountingSink::new();
        let mut cache = RecipeCache::new();
        let first = recipes_of("Mud", &store, &mut cache, 10, &sink);
        assert_eq!(first.len(), 1);
        assert!(cache.contains_key("Mud"));
    }
}
