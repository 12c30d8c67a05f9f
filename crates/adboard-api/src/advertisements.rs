use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{info, warn};

use adboard_db::models::AdvertisementRow;
use adboard_types::api::{
    AdvertisementResponse, AdvertisementUpdatedResponse, CreateAdvertisement, CreatedResponse,
    PatchAdvertisement, Status, StatusResponse,
};

use crate::error::ApiError;
use crate::extract::ValidJson;
use crate::state::{AppState, blocking};

const HEADER_TAKEN: &str = "advertisement with this header already exists";

type AdvertisementId = WithRejection<Path<i64>, ApiError>;

pub async fn create_advertisement(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateAdvertisement>,
) -> Result<impl IntoResponse, ApiError> {
    let header = req.header.clone();
    let id = blocking(&state, move |s| {
        s.db
            .create_advertisement(&req.header, &req.description, req.owner_id)
            .map_err(|e| ApiError::from_store(e, HEADER_TAKEN))
    })
    .await
    .inspect_err(|e| {
        if matches!(e, ApiError::Conflict(_)) {
            warn!("Rejected duplicate advertisement header '{}'", header);
        }
    })?;

    info!("Created advertisement {} ('{}')", id, header);
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

pub async fn get_advertisement(
    State(state): State<AppState>,
    WithRejection(Path(id), _): AdvertisementId,
) -> Result<impl IntoResponse, ApiError> {
    let row = blocking(&state, move |s| Ok(s.db.get_advertisement(id)?))
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(to_response(row)?))
}

pub async fn patch_advertisement(
    State(state): State<AppState>,
    WithRejection(Path(id), _): AdvertisementId,
    ValidJson(req): ValidJson<PatchAdvertisement>,
) -> Result<impl IntoResponse, ApiError> {
    let row = blocking(&state, move |s| {
        s.db
            .update_advertisement(id, req.header.as_deref(), req.description.as_deref())
            .map_err(|e| ApiError::from_store(e, HEADER_TAKEN))
    })
    .await?
    .ok_or(ApiError::NotFound)?;

    info!("Updated advertisement {}", id);
    Ok(Json(AdvertisementUpdatedResponse {
        status: Status::Success,
        header: row.header,
        description: row.description,
    }))
}

pub async fn delete_advertisement(
    State(state): State<AppState>,
    WithRejection(Path(id), _): AdvertisementId,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = blocking(&state, move |s| Ok(s.db.delete_advertisement(id)?)).await?;
    if !deleted {
        return Err(ApiError::NotFound);
    }

    info!("Deleted advertisement {}", id);
    Ok(Json(StatusResponse::success()))
}

fn to_response(row: AdvertisementRow) -> Result<AdvertisementResponse, ApiError> {
    let created_at = parse_created_at(&row.created_at).map_err(|e| {
        ApiError::Internal(anyhow::anyhow!(
            "corrupt created_at '{}' on advertisement {}: {}",
            row.created_at,
            row.id,
            e
        ))
    })?;

    Ok(AdvertisementResponse {
        header: row.header,
        description: row.description,
        created_at,
        owner_id: row.owner_id,
    })
}

/// SQLite stores `datetime('now')` as "YYYY-MM-DD HH:MM:SS" without a zone;
/// it is UTC.
fn parse_created_at(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc()))
}
