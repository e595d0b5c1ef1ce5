use actix_web::{
    body::BoxBody,
    http::{
        self,
        header::{self, HeaderValue},
    },
    HttpResponse, ResponseError,
};
use derive_more::Display;
use diesel::result::{DatabaseErrorKind, Error as DBError};
use serde_json::json;
use std::convert::From;

use crate::storage::StorageError;

#[derive(Debug, Display, PartialEq)]
pub enum AuthError {
    #[display(fmt = "No x-api-key header")]
    NoApiKey,

    #[display(fmt = "Invalid API key")]
    InvalidApiKey,
}

#[derive(Debug, Display)]
pub enum TodoApiError {
    #[display(fmt = "Internal Server Error")]
    InternalServerError,

    #[display(fmt = "BadRequest: {}", _0)]
    BadRequest(String),

    #[display(fmt = "Database Connection Error")]
    DatabaseConnectionError,

    #[display(fmt = "Unauthorized: {}", _0)]
    AuthError(AuthError),

    #[display(fmt = "{} Not Found", _0)]
    NotFound(String),

    /// The object store rejected or never answered an export
    #[display(fmt = "Upstream Failure: {}", _0)]
    UpstreamFailure(String),
}

impl TodoApiError {
    pub fn to_response(&self) -> HttpResponse {
        self.error_response()
    }

    pub fn todo_not_found() -> Self {
        TodoApiError::NotFound(String::from("Todo"))
    }
}

impl ResponseError for TodoApiError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            TodoApiError::InternalServerError => http::StatusCode::INTERNAL_SERVER_ERROR,
            TodoApiError::AuthError(_) => http::StatusCode::UNAUTHORIZED,
            TodoApiError::BadRequest(_) => http::StatusCode::BAD_REQUEST,
            TodoApiError::NotFound(_) => http::StatusCode::NOT_FOUND,
            TodoApiError::UpstreamFailure(_) => http::StatusCode::BAD_GATEWAY,
            TodoApiError::DatabaseConnectionError => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        let mut res = HttpResponse::new(self.status_code());

        res.headers_mut().append(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        res.set_body(BoxBody::new(json!({"error": self.to_string()}).to_string()))
    }
}

impl From<r2d2::Error> for TodoApiError {
    fn from(err: r2d2::Error) -> Self {
        log::error!("Could not check out a database connection: {}", err);
        TodoApiError::DatabaseConnectionError
    }
}

impl From<DBError> for TodoApiError {
    fn from(error: DBError) -> Self {
        match error {
            DBError::NotFound => TodoApiError::todo_not_found(),
            DBError::DatabaseError(kind, info) => {
                if let DatabaseErrorKind::UniqueViolation = kind {
                    let message: String =
                        info.details().unwrap_or_else(|| info.message()).to_string();

                    return TodoApiError::BadRequest(message);
                }
                log::error!("Database error: {}", info.message());
                TodoApiError::InternalServerError
            }
            other => {
                log::error!("Database error: {}", other);
                TodoApiError::InternalServerError
            }
        }
    }
}

impl From<StorageError> for TodoApiError {
    fn from(err: StorageError) -> Self {
        log::error!("Export upload failed: {}", err);
        TodoApiError::UpstreamFailure(err.to_string())
    }
}

impl From<csv::Error> for TodoApiError {
    fn from(err: csv::Error) -> Self {
        log::error!("Could not encode export: {}", err);
        TodoApiError::InternalServerError
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(
            TodoApiError::todo_not_found().status_code(),
            http::StatusCode::NOT_FOUND
        );
        assert_eq!(
            TodoApiError::AuthError(AuthError::NoApiKey).status_code(),
            http::StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            TodoApiError::UpstreamFailure("timeout".into()).status_code(),
            http::StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            TodoApiError::DatabaseConnectionError.status_code(),
            http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn diesel_not_found_maps_to_todo_not_found() {
        let err: TodoApiError = DBError::NotFound.into();
        assert_eq!(err.to_string(), "Todo Not Found");
    }

    #[test]
    fn error_response_is_json() {
        let res = TodoApiError::BadRequest("title must not be blank".into()).to_response();
        assert_eq!(res.status(), http::StatusCode::BAD_REQUEST);
        assert_eq!(
            res.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }
}
