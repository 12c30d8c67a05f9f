use axum::{
    Json, Router,
    routing::{get, post},
};

use adboard_types::api::{Status, StatusResponse};

use crate::advertisements;
use crate::error::ApiError;
use crate::state::AppState;
use crate::users;

/// All resource routes, bound to `state`. Transport layers (CORS, tracing,
/// body limits) are added by the binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/users/", post(users::create_user))
        .route(
            "/users/{id}",
            get(users::get_user)
                .patch(users::patch_user)
                .delete(users::delete_user),
        )
        .route("/advertisements/", post(advertisements::create_advertisement))
        .route(
            "/advertisements/{id}",
            get(advertisements::get_advertisement)
                .patch(advertisements::patch_advertisement)
                .delete(advertisements::delete_advertisement),
        )
        .route("/health", get(health))
        .fallback(not_found)
        .with_state(state)
}

async fn health() -> Json<StatusResponse> {
    Json(StatusResponse { status: Status::Ok })
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}
