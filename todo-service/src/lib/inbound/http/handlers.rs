use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::authentication::errors::AuthError;
use crate::user::errors::UserError;

pub mod login;
pub mod me;
pub mod refresh;
pub mod signup;

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";
pub const MISSING_AUTH_HEADER_MESSAGE: &str = "Missing authorization header";
pub const INVALID_AUTH_HEADER_FORMAT_MESSAGE: &str = "Invalid authorization header format";
pub const TOKEN_EXPIRED_MESSAGE: &str = "Token expired";
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid token";
pub const INVALID_TOKEN_TYPE_MESSAGE: &str = "Invalid token type";
pub const AUTHENTICATION_FAILED_MESSAGE: &str = "Authentication failed";
pub const EMAIL_ALREADY_EXISTS_MESSAGE: &str = "Email already exists";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    AuthenticationFailed,
    UnprocessableEntity(String),
    Conflict(String),
    Unauthorized(Unauthorized),
}

/// Reasons a request is refused with 401, each with a stable message and number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unauthorized {
    InvalidCredentials,
    MissingAuthHeader,
    InvalidAuthHeaderFormat,
    TokenExpired,
    InvalidToken,
    InvalidTokenType,
}

impl Unauthorized {
    pub fn number(self) -> u16 {
        match self {
            Unauthorized::InvalidCredentials => 1,
            Unauthorized::MissingAuthHeader => 2,
            Unauthorized::InvalidAuthHeaderFormat => 3,
            Unauthorized::TokenExpired => 4,
            Unauthorized::InvalidToken => 5,
            Unauthorized::InvalidTokenType => 6,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Unauthorized::InvalidCredentials => INVALID_CREDENTIALS_MESSAGE,
            Unauthorized::MissingAuthHeader => MISSING_AUTH_HEADER_MESSAGE,
            Unauthorized::InvalidAuthHeaderFormat => INVALID_AUTH_HEADER_FORMAT_MESSAGE,
            Unauthorized::TokenExpired => TOKEN_EXPIRED_MESSAGE,
            Unauthorized::InvalidToken => INVALID_TOKEN_MESSAGE,
            Unauthorized::InvalidTokenType => INVALID_TOKEN_TYPE_MESSAGE,
        }
    }
}

impl ApiError {
    fn parts(&self) -> (StatusCode, u16, String) {
        match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, 1, msg.clone()),
            ApiError::AuthenticationFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                2,
                AUTHENTICATION_FAILED_MESSAGE.to_string(),
            ),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, 1, msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, 1, msg.clone()),
            ApiError::Unauthorized(reason) => (
                StatusCode::UNAUTHORIZED,
                reason.number(),
                reason.message().to_string(),
            ),
        }
    }

    /// Stable `<status>-<number>` identifier, e.g. `401-4` for an expired token.
    pub fn code(&self) -> String {
        let (status, number, _) = self.parts();
        format!("{}-{}", status.as_u16(), number)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, _, message) = self.parts();

        (status, Json(ApiResponseBody::new_error(status, code, message))).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::EmailAlreadyExists(_) => {
                ApiError::Conflict(EMAIL_ALREADY_EXISTS_MESSAGE.to_string())
            }
            UserError::InvalidUserId(_)
            | UserError::InvalidEmail(_)
            | UserError::InvalidPassword(_) => ApiError::UnprocessableEntity(err.to_string()),
            UserError::Password(_) | UserError::DatabaseError(_) | UserError::Unknown(_) => {
                tracing::error!(error = %err, "User operation failed");
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

/// Unknown email and wrong password deliberately produce the same response.
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let reason = match err {
            AuthError::UserNotFound(_) | AuthError::InvalidCredentials => {
                Unauthorized::InvalidCredentials
            }
            AuthError::MissingAuthHeader => Unauthorized::MissingAuthHeader,
            AuthError::InvalidAuthHeaderFormat => Unauthorized::InvalidAuthHeaderFormat,
            AuthError::ExpiredToken => Unauthorized::TokenExpired,
            AuthError::InvalidToken(_) => Unauthorized::InvalidToken,
            AuthError::InvalidTokenType { .. } => Unauthorized::InvalidTokenType,
            AuthError::TokenCreationFailed(_)
            | AuthError::Repository(_)
            | AuthError::PasswordTask(_) => {
                tracing::error!(error = %err, "Authentication failed");
                return ApiError::AuthenticationFailed;
            }
        };

        ApiError::Unauthorized(reason)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, code: String, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { code, message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub code: String,
    pub message: String,
}
