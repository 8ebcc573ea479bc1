//! Wire-format DTOs for the `/search` response (§6).

use serde::{Deserialize, Serialize};

use alchemy_core::{Node, Step, Store, Tier};

use crate::coordinator::SearchResult;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub element: String,
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default = "default_recipe_mode")]
    pub recipe_mode: String,
    #[serde(default)]
    pub max_recipes: Option<usize>,
}

fn default_mode() -> String {
    "bfs".to_string()
}

fn default_recipe_mode() -> String {
    "single".to_string()
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub found: bool,
    pub steps: usize,
    pub paths: Vec<Vec<StepDto>>,
    pub target: TargetDto,
    #[serde(rename = "executionTime")]
    pub execution_time: f64,
}

#[derive(Debug, Serialize)]
pub struct TargetDto {
    pub element: String,
    pub tier: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct StepDto {
    pub ingredients: [String; 2],
    pub result: String,
    pub tiers: TiersDto,
}

#[derive(Debug, Serialize)]
pub struct TiersDto {
    pub left: Option<u32>,
    pub right: Option<u32>,
    pub result: Option<u32>,
}

fn tier_to_option(tier: Tier) -> Option<u32> {
    match tier {
        Tier::Known(n) => Some(n),
        Tier::Unknown => None,
    }
}

impl StepDto {
    fn from_step(step: &Step, store: &Store) -> StepDto {
        StepDto {
            ingredients: step.ingredients.clone(),
            result: step.result.clone(),
            tiers: TiersDto {
                left: tier_to_option(store.tier_of(&step.ingredients[0])),
                right: tier_to_option(store.tier_of(&step.ingredients[1])),
                result: tier_to_option(store.tier_of(&step.result)),
            },
        }
    }
}

fn flatten_path(tree: &Node, store: &Store) -> Vec<StepDto> {
    tree.flatten().iter().map(|step| StepDto::from_step(step, store)).collect()
}

impl SearchResponse {
    pub fn from_result(result: SearchResult, store: &Store) -> SearchResponse {
        let paths = result.trees.iter().map(|tree| flatten_path(tree, store)).collect();

        SearchResponse {
            found: result.found(),
            steps: result.visited,
            paths,
            target: TargetDto {
                element: result.target,
                tier: tier_to_option(result.target_tier),
            },
            execution_time: result.elapsed.as_secs_f64() * 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::SearchResult;
    use std::time::Duration;

    fn sample_store() -> Store {
        Store::load(r#"[{"root":"Mud","left":"Earth","right":"Water","tier":"1"}]"#).unwrap()
    }

    #[test]
    fn basic_target_has_zero_build_steps_but_one_visit() {
        let store = sample_store();
        let result = SearchResult {
            target: "Earth".to_string(),
            target_tier: Tier::Known(0),
            trees: vec![Node::leaf("Earth")],
            visited: 1,
            elapsed: Duration::from_millis(1),
        };
        let response = SearchResponse::from_result(result, &store);
        assert!(response.found);
        assert_eq!(response.steps, 1);
        assert_eq!(response.paths.len(), 1);
        assert_eq!(response.paths[0].len(), 0);
    }

    #[test]
    fn derived_target_flattens_build_steps_in_post_order_with_tiers() {
        let store = sample_store();
        let result = SearchResult {
            target: "Mud".to_string(),
            target_tier: Tier::Known(1),
            trees: vec![Node::interior(
                "Mud",
                std::sync::Arc::new(Node::leaf("Earth")),
                std::sync::Arc::new(Node::leaf("Water")),
            )],
            visited: 3,
            elapsed: Duration::from_millis(2),
        };
        let response = SearchResponse::from_result(result, &store);
        assert_eq!(response.paths[0].len(), 1);
        assert_eq!(response.paths[0][0].result, "Mud");
        assert_eq!(response.paths[0][0].tiers.result, Some(1));
        assert_eq!(response.paths[0][0].tiers.left, Some(0));
    }

    #[test]
    fn unknown_target_is_not_found_with_no_paths() {
        let store = sample_store();
        let result = SearchResult {
            target: "Phlogiston".to_string(),
            target_tier: Tier::Unknown,
            trees: vec![],
            visited: 0,
            elapsed: Duration::from_millis(1),
        };
        let response = SearchResponse::from_result(result, &store);
        assert!(!response.found);
        assert!(response.paths.is_empty());
        assert_eq!(response.target.tier, None);
    }
}
