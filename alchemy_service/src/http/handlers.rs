//! Request handlers for the HTTP surface (§6).

use axum::extract::{Query, State};
use axum::Json;

use crate::coordinator::{Mode, RecipeMode};
use crate::error::Error;
use crate::http::dto::{SearchQuery, SearchResponse};
use crate::AppState;

pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, Error> {
    let mode = Mode::parse(&query.mode)?;
    let recipe_mode = RecipeMode::parse(&query.recipe_mode)?;
    let max_recipes = query.max_recipes.unwrap_or(state.config.default_max_recipes);

    let result = state
        .coordinator
        .search(&query.element, mode, recipe_mode, max_recipes)
        .await?;
    Ok(Json(SearchResponse::from_result(result, &state.store)))
}

pub async fn healthz(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "elements": state.store.element_count(),
    }))
}
