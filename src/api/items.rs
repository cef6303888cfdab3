//! Item (catalog) endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{Item, NewItem},
};

/// Search criteria: exactly one of title or author
#[derive(Deserialize, ToSchema)]
pub struct SearchParams {
    pub title: Option<String>,
    pub author: Option<String>,
}

/// List the full inventory, in catalog insertion order
#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    responses(
        (status = 200, description = "List of items", body = Vec<Item>)
    )
)]
pub async fn list_items(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Item>>> {
    let items = state.store.list_items()?;
    Ok(Json(items))
}

/// Get item details by ID
#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "items",
    params(
        ("id" = i32, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item details", body = Item),
        (status = 404, description = "Item not found")
    )
)]
pub async fn get_item(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Item>> {
    let item = state.store.item_by_id(id)?;
    Ok(Json(item))
}

/// Find an item by exact title or author (case-insensitive)
#[utoipa::path(
    get,
    path = "/items/search",
    tag = "items",
    params(
        ("title" = Option<String>, Query, description = "Exact title to match"),
        ("author" = Option<String>, Query, description = "Exact author to match")
    ),
    responses(
        (status = 200, description = "First matching item in insertion order", body = Item),
        (status = 400, description = "No search criterion given"),
        (status = 404, description = "No match")
    )
)]
pub async fn search_item(
    State(state): State<crate::AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Item>> {
    let item = match (params.title.as_deref(), params.author.as_deref()) {
        (Some(title), _) => state.store.item_by_title(title)?,
        (None, Some(author)) => state.store.item_by_author(author)?,
        (None, None) => {
            return Err(AppError::BadRequest(
                "provide a title or author query parameter".to_string(),
            ))
        }
    };
    Ok(Json(item))
}

/// Add a new item to the catalog
#[utoipa::path(
    post,
    path = "/items",
    tag = "items",
    request_body = NewItem,
    responses(
        (status = 201, description = "Item added", body = Item),
        (status = 409, description = "Identifier already in use")
    )
)]
pub async fn create_item(
    State(state): State<crate::AppState>,
    Json(new_item): Json<NewItem>,
) -> AppResult<(StatusCode, Json<Item>)> {
    let created = state.store.add_item(new_item)?;
    Ok((StatusCode::CREATED, Json(created)))
}
