//! Request coordinator (§4.6, §5): normalizes a query, dispatches to the
//! requested strategy, and bridges the blocking CPU-bound solvers onto
//! async request handling with a wall-clock deadline.
//!
//! Grounded the same way the avrabe bitbake pipeline bridges a blocking
//! graph walk into an async context (`spawn_blocking`), with the outer
//! `tokio::time::timeout` as the circuit breaker for strategies that have
//! no internal cancellation hook of their own.

use std::sync::Arc;
use std::time::{Duration, Instant};

use alchemy_core::{find_recipe_bfs, find_recipe_bidirectional, find_recipe_dfs, Node, Store, Tier};

use crate::concurrency::ConcurrentEnumerator;
use crate::error::Error;

/// Single-recipe search strategy (§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Bfs,
    Dfs,
    Bidirectional,
}

impl Mode {
    pub fn parse(raw: &str) -> Result<Mode, Error> {
        match raw.to_ascii_lowercase().as_str() {
            "bfs" => Ok(Mode::Bfs),
            "dfs" => Ok(Mode::Dfs),
            "bidirectional" | "bidi" => Ok(Mode::Bidirectional),
            other => Err(Error::Input {
                message: format!("unknown mode {other:?}: expected bfs, dfs, or bidirectional"),
            }),
        }
    }
}

/// Whether to return one tree or up to `max_recipes` distinct ones (§4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeMode {
    Single,
    Multiple,
}

impl RecipeMode {
    pub fn parse(raw: &str) -> Result<RecipeMode, Error> {
        match raw.to_ascii_lowercase().as_str() {
            "single" => Ok(RecipeMode::Single),
            "multiple" => Ok(RecipeMode::Multiple),
            other => Err(Error::Input {
                message: format!("unknown recipe_mode {other:?}: expected single or multiple"),
            }),
        }
    }
}

/// Zero or more assembled recipe trees for `target`, plus the tier the
/// store assigned it (or [`Tier::Unknown`], §8 scenario S6) and the
/// number of elements the strategy had to visit to find them (§4.6, §8).
pub struct SearchResult {
    pub target: String,
    pub target_tier: Tier,
    pub trees: Vec<Node>,
    pub visited: usize,
    pub elapsed: Duration,
}

impl SearchResult {
    pub fn found(&self) -> bool {
        !self.trees.is_empty()
    }
}

pub struct Coordinator {
    store: Arc<Store>,
    enumerator: Arc<ConcurrentEnumerator>,
    deadline: Duration,
}

impl Coordinator {
    pub fn new(store: Arc<Store>, enumerator: Arc<ConcurrentEnumerator>, deadline: Duration) -> Coordinator {
        Coordinator {
            store,
            enumerator,
            deadline,
        }
    }

    /// Run `mode`/`recipe_mode` against `target`. `target` is normalized
    /// and validated before any solver runs (§4.6 dispatch steps 1-2).
    pub async fn search(
        &self,
        target: &str,
        mode: Mode,
        recipe_mode: RecipeMode,
        max_recipes: usize,
    ) -> Result<SearchResult, Error> {
        let target = target.trim();
        if target.is_empty() {
            return Err(alchemy_core::Error::EmptyTarget.into());
        }
        if max_recipes == 0 {
            return Err(Error::Input {
                message: "max_recipes must be at least 1".to_string(),
            });
        }
        let normalized = self.store.normalize(target);

        let started = Instant::now();
        let store = self.store.clone();
        let enumerator = self.enumerator.clone();
        let deadline = self.deadline;
        let normalized_for_task = normalized.clone();

        let outcome = tokio::task::spawn_blocking(move || {
            run_blocking(&normalized_for_task, mode, recipe_mode, max_recipes, &store, &enumerator, deadline)
        });

        // Single-recipe strategies have no internal cancellation hook, so
        // the timeout here is the only backstop for them; the multi-recipe
        // path already self-terminates at `deadline` via its atomic sink,
        // so this outer bound only catches a stuck thread pool.
        let timeout_budget = match recipe_mode {
            RecipeMode::Multiple => deadline * 2,
            RecipeMode::Single => deadline,
        };

        let (trees, visited) = match tokio::time::timeout(timeout_budget, outcome).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => {
                return Err(Error::InternalPanic {
                    message: join_error.to_string(),
                })
            }
            Err(_) => (Vec::new(), 0),
        };

        let target_tier = self.store.tier_of(&normalized);
        Ok(SearchResult {
            target: normalized,
            target_tier,
            trees,
            visited,
            elapsed: started.elapsed(),
        })
    }
}

fn run_blocking(
    target: &str,
    mode: Mode,
    recipe_mode: RecipeMode,
    max_recipes: usize,
    store: &Store,
    enumerator: &ConcurrentEnumerator,
    deadline: Duration,
) -> (Vec<Node>, usize) {
    match recipe_mode {
        RecipeMode::Multiple => enumerator.enumerate(target, max_recipes, store, deadline),
        RecipeMode::Single => {
            let outcome = match mode {
                Mode::Bfs => find_recipe_bfs(target, store),
                Mode::Dfs => find_recipe_dfs(target, store),
                Mode::Bidirectional => find_recipe_bidirectional(target, store),
            };
            (outcome.tree.into_iter().collect(), outcome.visited)
        }
    }
}
