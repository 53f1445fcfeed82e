use crate::dtos::{CreateUserRequest, UpdateUserRequest, UserResponse};
use crate::error::AppError;
use crate::models::User;
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use metrics::counter;
use serde_json::json;

/// GET /api/users/:number
pub async fn get_user(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .db
        .find_by_number(&number)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("User not found")))?;

    counter!("user_lookups_total").increment(1);

    Ok(Json(json!({ "ok": true, "data": UserResponse::from(user) })))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let number = trimmed(body.number);
    let name = trimmed(body.name);
    let email = trimmed(body.email);

    let (Some(number), Some(name), Some(email)) = (number, name, email) else {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "number, name, email are required"
        )));
    };

    if state.db.find_by_number(&number).await?.is_some() {
        return Err(AppError::Conflict(anyhow::anyhow!("User already exists")));
    }

    // The unique index on `number` turns the loser of a concurrent create
    // into a duplicate-key error, which maps to Conflict.
    let created = state.db.insert(User::new(number, name, email)).await?;

    tracing::info!(number = %created.number, "User created");
    counter!("users_created_total").increment(1);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "ok": true, "data": UserResponse::from(created) })),
    ))
}

/// PUT /api/users/:number
///
/// Omitted fields are left unchanged. A field that is present is applied as
/// given after trimming; update performs no required-field validation.
pub async fn update_user(
    State(state): State<AppState>,
    Path(number): Path<String>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = body.name.as_deref().map(str::trim);
    let email = body.email.as_deref().map(str::trim);

    let updated = state
        .db
        .update_by_number(&number, name, email)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("User not found")))?;

    tracing::info!(number = %updated.number, "User updated");
    counter!("users_updated_total").increment(1);

    Ok(Json(json!({ "ok": true, "data": UserResponse::from(updated) })))
}

/// Fallback for any unmatched route under /api.
pub async fn api_fallback() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "ok": false, "message": "Not found" })),
    )
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
