use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;

use super::{AppState, IdPath};
use crate::{errors::ApiError, response::Outcome};

/// GET /
pub async fn home(State(state): State<AppState>) -> Result<Outcome, ApiError> {
    Ok(Outcome::html(StatusCode::OK, state.views.home()?))
}

/// GET /users/:id, rendered. Unknown ids are a 404 like the JSON lookup.
pub async fn user_page(
    State(state): State<AppState>,
    WithRejection(Path(id), _): IdPath,
) -> Result<Outcome, ApiError> {
    let user = state.users.get_by_id(&id).await?;
    Ok(Outcome::html(StatusCode::OK, state.views.user(&user)?))
}
