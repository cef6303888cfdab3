//! Loan management endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::AppResult, models::Item};

/// Borrow/return request
#[derive(Deserialize, ToSchema)]
pub struct LoanRequest {
    /// Patron ID
    pub patron_id: i32,
    /// Item ID
    pub item_id: i32,
}

/// Loan response with the item's post-transition state
#[derive(Serialize, ToSchema)]
pub struct LoanResponse {
    /// Status message
    pub message: String,
    /// The item after the transition
    pub item: Item,
}

/// Loan status query
#[derive(Deserialize, ToSchema)]
pub struct LoanStatusParams {
    pub patron_id: i32,
    pub item_id: i32,
}

/// Loan status response
#[derive(Serialize, ToSchema)]
pub struct LoanStatusResponse {
    /// True when the item is currently out on loan to the patron
    pub borrowed: bool,
}

/// Borrow an item
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    request_body = LoanRequest,
    responses(
        (status = 201, description = "Loan created", body = LoanResponse),
        (status = 404, description = "Patron or item not found"),
        (status = 409, description = "Item already on loan"),
        (status = 500, description = "Records could not be persisted")
    )
)]
pub async fn create_loan(
    State(state): State<crate::AppState>,
    Json(request): Json<LoanRequest>,
) -> AppResult<(StatusCode, Json<LoanResponse>)> {
    let item = state.store.borrow(request.patron_id, request.item_id)?;

    Ok((
        StatusCode::CREATED,
        Json(LoanResponse {
            message: "Item borrowed successfully".to_string(),
            item,
        }),
    ))
}

/// Return a borrowed item
#[utoipa::path(
    post,
    path = "/loans/return",
    tag = "loans",
    request_body = LoanRequest,
    responses(
        (status = 200, description = "Item returned", body = LoanResponse),
        (status = 404, description = "Patron or item not found"),
        (status = 409, description = "Item not borrowed by this patron"),
        (status = 500, description = "Records could not be persisted")
    )
)]
pub async fn return_loan(
    State(state): State<crate::AppState>,
    Json(request): Json<LoanRequest>,
) -> AppResult<Json<LoanResponse>> {
    let item = state.store.give_back(request.patron_id, request.item_id)?;

    Ok(Json(LoanResponse {
        message: "Item returned successfully".to_string(),
        item,
    }))
}

/// Check whether a patron currently holds an item
#[utoipa::path(
    get,
    path = "/loans/status",
    tag = "loans",
    params(
        ("patron_id" = i32, Query, description = "Patron ID"),
        ("item_id" = i32, Query, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Loan status", body = LoanStatusResponse)
    )
)]
pub async fn loan_status(
    State(state): State<crate::AppState>,
    Query(params): Query<LoanStatusParams>,
) -> AppResult<Json<LoanStatusResponse>> {
    let borrowed = state.store.is_borrowed_by(params.patron_id, params.item_id)?;
    Ok(Json(LoanStatusResponse { borrowed }))
}
