//! Patron (roster) endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{Item, NewPatron, Patron},
};

/// Register a new patron
#[utoipa::path(
    post,
    path = "/patrons",
    tag = "patrons",
    request_body = NewPatron,
    responses(
        (status = 201, description = "Patron registered", body = Patron),
        (status = 409, description = "Identifier already in use")
    )
)]
pub async fn create_patron(
    State(state): State<crate::AppState>,
    Json(new_patron): Json<NewPatron>,
) -> AppResult<(StatusCode, Json<Patron>)> {
    let created = state.store.add_patron(new_patron)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Get patron details by ID, including borrowed-item identifiers
#[utoipa::path(
    get,
    path = "/patrons/{id}",
    tag = "patrons",
    params(
        ("id" = i32, Path, description = "Patron ID")
    ),
    responses(
        (status = 200, description = "Patron details", body = Patron),
        (status = 404, description = "Patron not found")
    )
)]
pub async fn get_patron(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Patron>> {
    let patron = state.store.patron_by_id(id)?;
    Ok(Json(patron))
}

/// Get the items a patron currently has on loan
#[utoipa::path(
    get,
    path = "/patrons/{id}/loans",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Patron ID")
    ),
    responses(
        (status = 200, description = "Patron's borrowed items", body = Vec<Item>),
        (status = 404, description = "Patron not found")
    )
)]
pub async fn get_patron_loans(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<Item>>> {
    let items = state.store.loans_of(id)?;
    Ok(Json(items))
}
