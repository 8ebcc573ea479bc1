//! Pure recipe-synthesis domain logic for the Little Alchemy 2 element
//! graph: the combination store, the build-tree model and its canonical
//! signature, the three single-recipe solvers, and the multi-recipe
//! enumerator.
//!
//! This crate has no I/O and no async runtime, mirroring the boundary the
//! teacher workspace draws around its own pure-domain crate: everything
//! here is deterministic given a [`Store`] and can be driven from a single
//! thread. Concurrency, deadlines tied to wall-clock requests, and the
//! HTTP surface live one layer up, in `alchemy_service`.

pub mod combination;
pub mod element;
pub mod enumerator;
pub mod errors;
pub mod solver;
pub mod store;
pub mod tree;

pub use combination::Combination;
pub use element::{Tier, BASIC_ELEMENTS};
pub use enumerator::{enumerate, recipes_of, CountingSink, DeadlineSink, RecipeCache, VisitSink};
pub use errors::Error;
pub use solver::{find_recipe_bfs, find_recipe_bidirectional, find_recipe_dfs, SolveOutcome};
pub use store::Store;
pub use tree::{Node, Step};
