use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Success response. Keyed responses are wrapped as `{ <key>: data }`;
/// flat responses serialize `data` as the whole body.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub key: Option<&'static str>,
    pub data: T,
    pub status_code: Option<StatusCode>,
}

impl<T: Serialize> ApiResponse<T> {
    /// `{ <key>: data }` with default 200 status
    pub fn success(key: &'static str, data: T) -> Self {
        Self {
            key: Some(key),
            data,
            status_code: None,
        }
    }

    /// Body is `data` itself; it must serialize to a JSON object
    pub fn flat(data: T) -> Self {
        Self {
            key: None,
            data,
            status_code: None,
        }
    }

    /// Create a 201 Created response
    pub fn created(mut self) -> Self {
        self.status_code = Some(StatusCode::CREATED);
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return ApiError::store_failure("Failed to serialize response data").into_response();
            }
        };

        let body = match self.key {
            Some(key) => {
                let mut envelope = Map::new();
                envelope.insert(key.to_string(), data_value);
                Value::Object(envelope)
            }
            None => data_value,
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;
