use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::validation::{FieldError, Fields, Validate};

// -- Common --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
    Ok,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: Status,
}

impl StatusResponse {
    pub fn success() -> Self {
        Self {
            status: Status::Success,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: i64,
}

/// Error body: a plain message, or the list of field errors from validation.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorReason {
    Fields(Vec<FieldError>),
    Message(String),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: Status,
    pub reason: ErrorReason,
}

// -- Users --

#[derive(Debug, Clone, Serialize)]
pub struct CreateUser {
    pub name: String,
    pub password: String,
}

impl Validate for CreateUser {
    fn validate(raw: &Map<String, Value>) -> Result<Self, Vec<FieldError>> {
        let mut fields = Fields::new(raw);
        let name = fields.required_str("name");
        let password = fields.required_str("password");

        match (name, password) {
            (Some(name), Some(password)) => Ok(Self { name, password }),
            _ => Err(fields.into_errors()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PatchUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Validate for PatchUser {
    fn validate(raw: &Map<String, Value>) -> Result<Self, Vec<FieldError>> {
        let mut fields = Fields::new(raw);
        let name = fields.optional_str("name");
        let password = fields.optional_str("password");
        fields.finish(Self { name, password })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserUpdatedResponse {
    pub status: Status,
    pub name: String,
}

// -- Advertisements --

#[derive(Debug, Clone, Serialize)]
pub struct CreateAdvertisement {
    pub header: String,
    pub description: String,
    pub owner_id: i64,
}

impl Validate for CreateAdvertisement {
    fn validate(raw: &Map<String, Value>) -> Result<Self, Vec<FieldError>> {
        let mut fields = Fields::new(raw);
        let header = fields.required_str("header");
        let description = fields.required_str("description");
        let owner_id = fields.required_int("owner_id");

        match (header, description, owner_id) {
            (Some(header), Some(description), Some(owner_id)) => Ok(Self {
                header,
                description,
                owner_id,
            }),
            _ => Err(fields.into_errors()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PatchAdvertisement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Validate for PatchAdvertisement {
    fn validate(raw: &Map<String, Value>) -> Result<Self, Vec<FieldError>> {
        let mut fields = Fields::new(raw);
        let header = fields.optional_str("header");
        let description = fields.optional_str("description");
        fields.finish(Self {
            header,
            description,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdvertisementResponse {
    pub header: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub owner_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdvertisementUpdatedResponse {
    pub status: Status,
    pub header: String,
    pub description: String,
}
