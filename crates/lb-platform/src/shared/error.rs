//! Platform Error Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

use crate::shared::validation::NamespaceIdViolation;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Bad query parameter {name}={given:?}, expected {desired_type}")]
    BadQueryParameter {
        name: String,
        given: String,
        desired_type: String,
    },

    #[error("Bad request body: {message}")]
    BadRequestBody { message: String },

    #[error("Too many requests")]
    RateLimited,

    #[error("Route not found")]
    RouteNotFound,

    #[error("Namespace not found: {id}")]
    NamespaceNotFound { id: String },

    #[error("Element not found: {namespace_id}/{key}")]
    ElementNotFound { namespace_id: String, key: String },

    #[error("Invite not found: {code}")]
    InviteNotFound { code: String },

    #[error("Illegal namespace ID: {violations:?}")]
    IllegalNamespaceId { violations: Vec<NamespaceIdViolation> },

    #[error("Namespace ID in use: {id}")]
    NamespaceIdInUse { id: String },

    #[error("Invalid invite code")]
    InvalidInviteCode,

    #[error("Element key in use: {key}")]
    ElementKeyInUse { key: String },

    #[error("Namespace is deactivated: {id}")]
    NamespaceDeactivated { id: String },

    #[error("Illegal element key: {key:?}")]
    IllegalElementKey { key: String },

    #[error("Empty paste content")]
    EmptyPasteContent,

    #[error("Invalid target URL: {url:?}")]
    InvalidTargetUrl { url: String },

    #[error("Invites are disabled")]
    InvitesDisabled,

    #[error("Invite code in use: {code}")]
    InviteCodeInUse { code: String },

    #[error("Element not yet available")]
    ElementNotYetAvailable,

    #[error("Element no longer available")]
    ElementNoLongerAvailable,

    #[error("Element view limit reached")]
    ElementViewLimitReached,

    #[error("Unsupported element: {reason}")]
    UnsupportedElement { reason: String },
}

impl PlatformError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }

    pub fn bad_query_parameter(
        name: impl Into<String>,
        given: impl Into<String>,
        desired_type: impl Into<String>,
    ) -> Self {
        Self::BadQueryParameter {
            name: name.into(),
            given: given.into(),
            desired_type: desired_type.into(),
        }
    }

    pub fn namespace_not_found(id: impl Into<String>) -> Self {
        Self::NamespaceNotFound { id: id.into() }
    }

    pub fn element_not_found(namespace_id: impl Into<String>, key: impl Into<String>) -> Self {
        Self::ElementNotFound {
            namespace_id: namespace_id.into(),
            key: key.into(),
        }
    }

    pub fn invite_not_found(code: impl Into<String>) -> Self {
        Self::InviteNotFound { code: code.into() }
    }

    /// Stable numeric code sent to clients.
    pub fn code(&self) -> u16 {
        match self {
            Self::Database(_) | Self::Json(_) | Self::Internal { .. } => 1000,
            Self::Unauthorized => 1001,
            Self::BadQueryParameter { .. } => 1002,
            Self::BadRequestBody { .. } => 1003,
            Self::NamespaceNotFound { .. } => 1004,
            Self::ElementNotFound { .. } => 1005,
            Self::InviteNotFound { .. } => 1006,
            Self::Forbidden => 1007,
            Self::RateLimited => 1008,
            Self::RouteNotFound => 1009,
            Self::IllegalNamespaceId { .. } => 2000,
            Self::NamespaceIdInUse { .. } => 2001,
            Self::InvalidInviteCode => 2002,
            Self::ElementKeyInUse { .. } => 3000,
            Self::NamespaceDeactivated { .. } => 3001,
            Self::IllegalElementKey { .. } => 3002,
            Self::EmptyPasteContent => 3100,
            Self::InvalidTargetUrl { .. } => 3200,
            Self::InvitesDisabled => 4000,
            Self::InviteCodeInUse { .. } => 4001,
            Self::ElementNotYetAvailable => 5000,
            Self::ElementNoLongerAvailable => 5001,
            Self::ElementViewLimitReached => 5002,
            Self::UnsupportedElement { .. } => 5100,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Json(_) | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden | Self::NamespaceDeactivated { .. } => StatusCode::FORBIDDEN,
            Self::BadQueryParameter { .. } | Self::BadRequestBody { .. } => StatusCode::BAD_REQUEST,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::RouteNotFound
            | Self::NamespaceNotFound { .. }
            | Self::ElementNotFound { .. }
            | Self::InviteNotFound { .. } => StatusCode::NOT_FOUND,
            Self::IllegalNamespaceId { .. }
            | Self::IllegalElementKey { .. }
            | Self::EmptyPasteContent
            | Self::InvalidTargetUrl { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NamespaceIdInUse { .. }
            | Self::ElementKeyInUse { .. }
            | Self::InviteCodeInUse { .. } => StatusCode::CONFLICT,
            Self::InvalidInviteCode
            | Self::InvitesDisabled
            | Self::ElementNotYetAvailable
            | Self::ElementNoLongerAvailable
            | Self::ElementViewLimitReached => StatusCode::PRECONDITION_FAILED,
            Self::UnsupportedElement { .. } => StatusCode::NOT_IMPLEMENTED,
        }
    }

    /// Client-facing message. Storage details never leave the process.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Database(_) | Self::Json(_) | Self::Internal { .. } => "unexpected error",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::BadQueryParameter { .. } => "bad query parameter",
            Self::BadRequestBody { .. } => "bad request body",
            Self::RateLimited => "too many requests",
            Self::RouteNotFound => "route not found",
            Self::NamespaceNotFound { .. } => "namespace not found",
            Self::ElementNotFound { .. } => "element not found",
            Self::InviteNotFound { .. } => "invite not found",
            Self::IllegalNamespaceId { .. } => "illegal namespace ID",
            Self::NamespaceIdInUse { .. } => "namespace ID in use",
            Self::InvalidInviteCode => "invalid invite code",
            Self::ElementKeyInUse { .. } => "element key in use",
            Self::NamespaceDeactivated { .. } => "this namespace is deactivated",
            Self::IllegalElementKey { .. } => "illegal element key",
            Self::EmptyPasteContent => "empty paste content",
            Self::InvalidTargetUrl { .. } => "invalid target URL",
            Self::InvitesDisabled => "invites are disabled",
            Self::InviteCodeInUse { .. } => "invite code in use",
            Self::ElementNotYetAvailable => "the requested element is not yet available",
            Self::ElementNoLongerAvailable => "the requested element is not available anymore",
            Self::ElementViewLimitReached => "the requested element cannot be viewed anymore",
            Self::UnsupportedElement { .. } => {
                "the type of the requested element is not supported"
            }
        }
    }

    fn data(&self) -> serde_json::Value {
        match self {
            Self::BadQueryParameter { name, given, desired_type } => json!({
                "name": name,
                "given": given,
                "desired_type": desired_type,
            }),
            Self::IllegalNamespaceId { violations } => json!({ "violations": violations }),
            _ => json!({}),
        }
    }

    pub fn is_unexpected(&self) -> bool {
        self.code() == 1000
    }
}

pub type Result<T> = std::result::Result<T, PlatformError>;

/// Error response body
#[derive(Debug, serde::Serialize, ToSchema)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
}

impl From<&PlatformError> for ErrorResponse {
    fn from(err: &PlatformError) -> Self {
        Self {
            code: err.code(),
            message: err.public_message().to_string(),
            data: err.data(),
        }
    }
}

impl IntoResponse for PlatformError {
    fn into_response(self) -> Response {
        if self.is_unexpected() {
            error!(error = %self, "Unexpected error while handling request");
        }

        let body = ErrorResponse::from(&self);
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_errors_hide_details() {
        let err = PlatformError::internal("connection reset by peer");
        let body = ErrorResponse::from(&err);

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, 1000);
        assert_eq!(body.message, "unexpected error");
        assert_eq!(body.data, json!({}));
    }

    #[test]
    fn test_bad_query_parameter_echoes_input() {
        let err = PlatformError::bad_query_parameter("limit", "ten", "uint");
        let body = ErrorResponse::from(&err);

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body.code, 1002);
        assert_eq!(body.data["name"], "limit");
        assert_eq!(body.data["given"], "ten");
        assert_eq!(body.data["desired_type"], "uint");
    }

    #[test]
    fn test_illegal_namespace_id_lists_violations() {
        let err = PlatformError::IllegalNamespaceId {
            violations: vec![
                NamespaceIdViolation::MaximumLength,
                NamespaceIdViolation::Characters,
            ],
        };
        let body = ErrorResponse::from(&err);

        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body.data,
            json!({ "violations": ["MAXIMUM_LENGTH", "CHARACTERS"] })
        );
    }

    #[test]
    fn test_precondition_family() {
        for err in [
            PlatformError::InvalidInviteCode,
            PlatformError::InvitesDisabled,
            PlatformError::ElementNotYetAvailable,
            PlatformError::ElementNoLongerAvailable,
            PlatformError::ElementViewLimitReached,
        ] {
            assert_eq!(err.status(), StatusCode::PRECONDITION_FAILED);
        }
        assert_eq!(PlatformError::ElementViewLimitReached.code(), 5002);
        assert_eq!(
            PlatformError::UnsupportedElement { reason: "x".into() }.status(),
            StatusCode::NOT_IMPLEMENTED
        );
    }
}
