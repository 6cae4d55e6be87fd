use axum::{
    extract::{Path, RawQuery, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
};
use axum_extra::extract::WithRejection;
use models::ContentKind;
use service::{Listing, UpdateMode};

use super::{AppState, IdPath, RawBody};
use crate::{errors::ApiError, response::Outcome};

/// GET /users: JSON listing when any query parameter is present,
/// otherwise the create/search form.
pub async fn list_users(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Outcome, ApiError> {
    match Listing::from_query(query.as_deref())? {
        Listing::View => Ok(Outcome::html(StatusCode::OK, state.views.form()?)),
        Listing::Filtered(filter) => {
            let users = state.users.list(&filter).await?;
            Outcome::json(StatusCode::OK, &users)
        }
    }
}

/// GET /users/data/:id
pub async fn get_user_data(
    State(state): State<AppState>,
    WithRejection(Path(id), _): IdPath,
) -> Result<Outcome, ApiError> {
    let user = state.users.get_by_id(&id).await?;
    Outcome::json(StatusCode::OK, &user)
}

/// POST /users, JSON or urlencoded form body.
pub async fn create_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    WithRejection(body, _): RawBody,
) -> Result<Outcome, ApiError> {
    let kind = ContentKind::from_header(headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()));
    let user = state.users.create(&body, kind).await?;
    Outcome::json(StatusCode::CREATED, &user)
}

/// PUT /users/:id
pub async fn replace_user(
    State(state): State<AppState>,
    WithRejection(Path(id), _): IdPath,
    WithRejection(body, _): RawBody,
) -> Result<Outcome, ApiError> {
    let user = state.users.update(&id, &body, UpdateMode::Replace).await?;
    Outcome::json(StatusCode::OK, &user)
}

/// PATCH /users/:id
pub async fn patch_user(
    State(state): State<AppState>,
    WithRejection(Path(id), _): IdPath,
    WithRejection(body, _): RawBody,
) -> Result<Outcome, ApiError> {
    let user = state.users.update(&id, &body, UpdateMode::Merge).await?;
    Outcome::json(StatusCode::OK, &user)
}

/// DELETE /users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    WithRejection(Path(id), _): IdPath,
) -> Result<Outcome, ApiError> {
    state.users.delete(&id).await?;
    Ok(Outcome::message(StatusCode::OK, format!("User with ID {id} deleted successfully")))
}
