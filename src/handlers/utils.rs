use axum::{
    extract::rejection::JsonRejection,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Body accepted by folder and tag create/update
#[derive(Debug, Default, Deserialize)]
pub struct NamePayload {
    pub name: Option<String>,
}

/// Pull `name` out of a JSON body. A body without a JSON content type or
/// with a non-string `name` reads as "no name"; anything else the extractor
/// rejected is reported as such.
pub fn name_from(payload: Result<Json<NamePayload>, JsonRejection>) -> Result<Option<String>, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body.name),
        Err(JsonRejection::MissingJsonContentType(_)) | Err(JsonRejection::JsonDataError(_)) => Ok(None),
        Err(rejection) => Err(rejected(rejection)),
    }
}

/// Map a body the extractor refused onto the API error shape.
pub fn rejected(rejection: JsonRejection) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::payload_too_large("Request body is too large");
    }
    ApiError::invalid_json(rejection.body_text())
}

/// 201 Created with a `Location` header pointing at the new resource
#[derive(Debug)]
pub struct Created<T: Serialize> {
    pub location: String,
    pub body: T,
}

impl<T: Serialize> Created<T> {
    /// `collection_uri` is the URI the POST was made to
    pub fn at(collection_uri: &Uri, id: impl std::fmt::Display, body: T) -> Self {
        Self {
            location: format!("{}/{}", collection_uri.path().trim_end_matches('/'), id),
            body,
        }
    }
}

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        (
            StatusCode::CREATED,
            [(header::LOCATION, self.location)],
            Json(self.body),
        )
            .into_response()
    }
}
