use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

/// Body shape shared by every endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: bool,
    pub message: String,
    pub errors: Option<Vec<String>>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: true,
            message: message.into(),
            errors: None,
            data: Some(data),
        }
    }

    pub fn failure(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            status: false,
            message: message.into(),
            errors: Some(errors),
            data: None,
        }
    }
}

pub type ApiResponse<T> = (StatusCode, Json<Envelope<T>>);

pub fn ok<T: Serialize>(verb: &str, data: T) -> ApiResponse<T> {
    (
        StatusCode::OK,
        Json(Envelope::success(format!("Succeed to {verb} data"), data)),
    )
}

pub fn created<T: Serialize>(data: T) -> ApiResponse<T> {
    (
        StatusCode::CREATED,
        Json(Envelope::success("Succeed to POST data", data)),
    )
}
