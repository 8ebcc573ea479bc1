//! Single-recipe solvers (§4.3): three independent strategies that each
//! return one valid build tree for a target, or `None`.

mod bfs;
mod bidirectional;
mod dfs;

pub use bfs::find_recipe_bfs;
pub use bidirectional::find_recipe_bidirectional;
pub use dfs::find_recipe_dfs;

use crate::tree::Node;

/// Result of a single-recipe search: the tree, plus the strategy's visit
/// counter (§4.5). The counter is diagnostic only.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub tree: Option<Node>,
    pub visited: usize,
}
