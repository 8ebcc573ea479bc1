//! The concurrent multi-recipe driver (§4.4, §5): fans a target's
//! top-level combinations out across a bounded worker pool, collecting
//! canonically distinct trees into a shared, mutex-guarded result set
//! under cooperative cancellation.
//!
//! Grounded in the same shape as the teacher's bounded-concurrency
//! fetcher (`zb_io::install::planner::fetch_all_formulas`, which caps
//! in-flight work with a `MAX_CONCURRENT_FETCHES` constant and a
//! `FuturesUnordered`): here the bound is a `rayon::ThreadPool` sized at
//! construction, since recipe search is CPU-bound rather than I/O-bound.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use rayon::prelude::*;

use alchemy_core::{recipes_of, Node, RecipeCache, Store, Tier, VisitSink};

use crate::error::Error;

/// Default width of the multi-recipe worker pool: "small, in the tens",
/// matching the reference implementation's semaphore of 10 (§5).
pub const DEFAULT_CONCURRENCY: usize = 10;

/// A [`VisitSink`] backed by atomics, shared across every worker thread
/// exploring one target's candidate recipes. `cancelled()` is true once
/// the deadline passes *or* another thread has already reached `k`
/// results — both are checked at every recursive entry in
/// [`recipes_of`], satisfying the cooperative-cancellation contract.
struct AtomicSink {
    counter: Arc<AtomicUsize>,
    stop: Arc<AtomicBool>,
    deadline: Instant,
}

impl VisitSink for AtomicSink {
    fn bump(&self) {
        self.counter.fetch_add(1, Ordering::Relaxed);
    }

    fn cancelled(&self) -> bool {
        self.stop.load(Ordering::Relaxed) || Instant::now() >= self.deadline
    }
}

/// Owns the bounded thread pool used for multi-recipe enumeration. One
/// instance is created at startup and shared read-only by every request,
/// the same lifecycle the combination [`Store`] itself has.
pub struct ConcurrentEnumerator {
    pool: rayon::ThreadPool,
}

impl ConcurrentEnumerator {
    pub fn new(width: usize) -> Result<ConcurrentEnumerator, Error> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(width.max(1))
            .build()
            .map_err(|e| Error::InternalPanic {
                message: format!("failed to build enumeration thread pool: {e}"),
            })?;
        Ok(ConcurrentEnumerator { pool })
    }

    /// Up to `k` canonically distinct trees for `target`, exploring each
    /// of target's tier-monotone top-level combinations on its own worker.
    /// Returns `(trees, visited)`. Never blocks past `deadline` by more
    /// than the cost of the cooperative check the in-flight workers are
    /// already making.
    pub fn enumerate(&self, target: &str, k: usize, store: &Store, deadline: Duration) -> (Vec<Node>, usize) {
        if store.is_basic(target) {
            return (vec![Node::leaf(target)], 1);
        }
        if store.tier_of(target) == Tier::Unknown {
            return (Vec::new(), 0);
        }

        let combos: Vec<_> = store.tier_monotone_combinations_of(target).cloned().collect();
        if combos.is_empty() {
            return (Vec::new(), 0);
        }

        let counter = Arc::new(AtomicUsize::new(0));
        let stop = Arc::new(AtomicBool::new(false));
        let seen: Arc<Mutex<HashSet<String>>> = Arc::new(Mutex::new(HashSet::new()));
        let collected: Arc<Mutex<Vec<Node>>> = Arc::new(Mutex::new(Vec::new()));
        let deadline_at = Instant::now() + deadline;
        let cap = (2 * k).max(1);

        self.pool.install(|| {
            combos.par_iter().for_each(|combo| {
                if stop.load(Ordering::Relaxed) || Instant::now() >= deadline_at {
                    return;
                }

                let sink = AtomicSink {
                    counter: counter.clone(),
                    stop: stop.clone(),
                    deadline: deadline_at,
                };

                let mut cache = RecipeCache::new();
                let left_trees = recipes_of(&combo.left, store, &mut cache, cap, &sink);
                if left_trees.is_empty() {
                    return;
                }
                let right_trees = recipes_of(&combo.right, store, &mut cache, cap, &sink);
                if right_trees.is_empty() {
                    return;
                }

                'candidates: for l in &left_trees {
                    for r in &right_trees {
                        if stop.load(Ordering::Relaxed) || Instant::now() >= deadline_at {
                            break 'candidates;
                        }
                        let node = Node::interior(target, l.clone(), r.clone());
                        let signature = node.signature();

                        let first_insertion = seen.lock().unwrap().insert(signature);
                        if !first_insertion {
                            continue;
                        }

                        let mut guard = collected.lock().unwrap();
                        if guard.len() < k {
                            guard.push(node);
                            if guard.len() >= k {
                                stop.store(true, Ordering::Relaxed);
                            }
                        }
                    }
                }
            });
        });

        let visited = counter.load(Ordering::Relaxed);
        let trees = Arc::try_unwrap(collected)
            .map(|m| m.into_inner().unwrap())
            .unwrap_or_else(|arc| arc.lock().unwrap().clone());
        (trees, visited)
    }
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
    fn basic_target_short_circuits() {
        let store = sample_store();
        let enumerator = ConcurrentEnumerator::new(4).unwrap();
        let (trees, visited) = enumerator.enumerate("Earth", 5, &store, Duration::from_millis(100));
        assert_eq!(trees, vec![Node::leaf("Earth")]);
        assert_eq!(visited, 1);
    }

    #[test]
    fn unknown_target_yields_nothing() {
        let store = sample_store();
        let enumerator = ConcurrentEnumerator::new(4).unwrap();
        let (trees, visited) = enumerator.enumerate("Phlogiston", 5, &store, Duration::from_millis(100));
        assert!(trees.is_empty());
        assert_eq!(visited, 0);
    }

    #[test]
    fn multi_recipe_results_are_distinct_and_valid() {
        let store = sample_store();
        let enumerator = ConcurrentEnumerator::new(4).unwrap();
        let (trees, _visited) = enumerator.enumerate("Lava", 5, &store, Duration::from_millis(500));
        assert_eq!(trees.len(), 2);
        let mut sigs: Vec<String> = trees.iter().map(|t| t.signature()).collect();
        sigs.sort();
        sigs.dedup();
        assert_eq!(sigs.len(), trees.len());
        for tree in &trees {
            assert!(tree.is_valid(&store));
        }
    }

    #[test]
    fn tight_deadline_still_returns_only_valid_trees() {
        let store = sample_store();
        let enumerator = ConcurrentEnumerator::new(4).unwrap();
        let (trees, _visited) = enumerator.enumerate("Lava", 1000, &store, Duration::from_millis(1));
        for tree in &trees {
            assert!(tree.is_valid(&store));
        }
    }

    #[test]
    fn k_of_one_stops_after_first_result() {
        let store = sample_store();
        let enumerator = ConcurrentEnumerator::new(4).unwrap();
        let (trees, _visited) = enumerator.enumerate("Lava", 1, &store, Duration::from_millis(500));
        assert_eq!(trees.len(), 1);
    }
}
