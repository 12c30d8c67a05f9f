use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use tracing::{info, warn};

use adboard_types::api::{
    CreateUser, CreatedResponse, PatchUser, Status, StatusResponse, UserResponse,
    UserUpdatedResponse,
};

use crate::error::ApiError;
use crate::extract::ValidJson;
use crate::password::hash_password;
use crate::state::{AppState, blocking};

const NAME_TAKEN: &str = "user with this name already exists";

type UserId = WithRejection<Path<i64>, ApiError>;

pub async fn create_user(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateUser>,
) -> Result<impl IntoResponse, ApiError> {
    let name = req.name.clone();
    let id = blocking(&state, move |s| {
        let password_hash = hash_password(&req.password)?;
        s.db
            .create_user(&req.name, &password_hash)
            .map_err(|e| ApiError::from_store(e, NAME_TAKEN))
    })
    .await
    .inspect_err(|e| {
        if matches!(e, ApiError::Conflict(_)) {
            warn!("Rejected duplicate user name '{}'", name);
        }
    })?;

    info!("Created user {} ({})", id, name);
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

pub async fn get_user(
    State(state): State<AppState>,
    WithRejection(Path(id), _): UserId,
) -> Result<impl IntoResponse, ApiError> {
    let user = blocking(&state, move |s| Ok(s.db.get_user(id)?))
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(UserResponse { name: user.name }))
}

pub async fn patch_user(
    State(state): State<AppState>,
    WithRejection(Path(id), _): UserId,
    ValidJson(req): ValidJson<PatchUser>,
) -> Result<impl IntoResponse, ApiError> {
    let user = blocking(&state, move |s| {
        let password_hash = req.password.as_deref().map(hash_password).transpose()?;
        s.db
            .update_user(id, req.name.as_deref(), password_hash.as_deref())
            .map_err(|e| ApiError::from_store(e, NAME_TAKEN))
    })
    .await?
    .ok_or(ApiError::NotFound)?;

    info!("Updated user {}", id);
    Ok(Json(UserUpdatedResponse {
        status: Status::Success,
        name: user.name,
    }))
}

pub async fn delete_user(
    State(state): State<AppState>,
    WithRejection(Path(id), _): UserId,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = blocking(&state, move |s| Ok(s.db.delete_user(id)?)).await?;
    if !deleted {
        return Err(ApiError::NotFound);
    }

    info!("Deleted user {}", id);
    Ok(Json(StatusResponse::success()))
}
