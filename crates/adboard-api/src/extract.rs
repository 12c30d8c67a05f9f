use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde_json::Value;

use adboard_types::validation::Validate;

use crate::error::ApiError;

/// JSON body checked against `T`'s field list.
///
/// Unparseable bodies become [`ApiError::BadRequest`]; shape problems become
/// [`ApiError::Validation`] carrying every failing field.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(raw) = Json::<Value>::from_request(req, state).await?;
        T::validate_value(&raw)
            .map(ValidJson)
            .map_err(ApiError::Validation)
    }
}
