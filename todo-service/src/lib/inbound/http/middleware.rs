use auth::TokenKind;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::authentication::errors::AuthError;
use crate::domain::authentication::ports::AuthenticationServicePort;
use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Verified identity attached to request extensions by [`authenticate`].
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: String,
}

/// Middleware that admits only requests carrying a valid access token.
///
/// On success the request continues with an [`AuthenticatedUser`] extension;
/// otherwise the request ends here with a 401.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(req.headers()).map_err(|e| {
        tracing::debug!(error = %e, uri = %req.uri(), "Rejected request without bearer token");
        ApiError::from(e)
    })?;

    let claims = state.auth_service.validate_token(token).map_err(|e| {
        tracing::warn!(error = %e, "JWT validation failed");
        ApiError::from(e)
    })?;

    // A refresh token must never grant resource access
    if claims.kind() != TokenKind::Access {
        tracing::warn!(
            user_id = %claims.user_id(),
            token_type = %claims.kind(),
            "Non-access token presented to protected route"
        );
        return Err(ApiError::from(AuthError::InvalidTokenType {
            expected: TokenKind::Access,
            actual: claims.kind(),
        }));
    }

    let user_id = UserId::from_string(claims.user_id()).map_err(|e| {
        tracing::error!(error = %e, "Failed to parse user ID from token");
        ApiError::from(AuthError::InvalidToken(e.to_string()))
    })?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id,
        email: claims.email().to_string(),
    });

    Ok(next.run(req).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// # Errors
/// * `MissingAuthHeader` - Header absent or empty
/// * `InvalidAuthHeaderFormat` - Not exactly `Bearer <token>` or not visible ASCII
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?;

    if value.is_empty() {
        return Err(AuthError::MissingAuthHeader);
    }

    let value = value
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeaderFormat)?;

    match value.split_once(' ') {
        Some(("Bearer", token)) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::InvalidAuthHeaderFormat),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use auth::AuthConfig;
    use auth::Claims;
    use auth::JwtHandler;
    use auth::TokenIssuer;
    use auth::TokenPair;
    use axum::body::Body;
    use axum::http::HeaderValue;
    use axum::http::Request;
    use axum::http::StatusCode;
    use axum::middleware;
    use axum::routing::get;
    use axum::Extension;
    use axum::Router;
    use chrono::Duration;
    use chrono::Utc;
    use http_body_util::BodyExt;
    use mockall::mock;
    use tower::ServiceExt;

    use super::*;
    use crate::domain::authentication::service::AuthenticationService;
    use crate::domain::user::service::UserService;
    use crate::inbound::http::handlers::INVALID_AUTH_HEADER_FORMAT_MESSAGE;
    use crate::inbound::http::handlers::INVALID_TOKEN_MESSAGE;
    use crate::inbound::http::handlers::INVALID_TOKEN_TYPE_MESSAGE;
    use crate::inbound::http::handlers::MISSING_AUTH_HEADER_MESSAGE;
    use crate::inbound::http::handlers::TOKEN_EXPIRED_MESSAGE;
    use crate::outbound::repositories::InMemoryUserRepository;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    mock! {
        pub TestAuthenticationService {}

        #[async_trait]
        impl AuthenticationServicePort for TestAuthenticationService {
            async fn authenticate(&self, email: &str, password: &str) -> Result<TokenPair, AuthError>;
            fn validate_token(&self, token: &str) -> Result<Claims, AuthError>;
            async fn refresh_token(&self, refresh_token: &str) -> Result<TokenPair, AuthError>;
        }
    }

    fn gated_app(auth_service: Arc<dyn AuthenticationServicePort>) -> Router {
        let repository = Arc::new(InMemoryUserRepository::new());
        let state = AppState {
            user_service: Arc::new(UserService::new(repository)),
            auth_service,
        };

        Router::new()
            .route(
                "/protected",
                get(|Extension(user): Extension<AuthenticatedUser>| async move {
                    format!("{}|{}", user.user_id, user.email)
                }),
            )
            .route_layer(middleware::from_fn_with_state(state.clone(), authenticate))
            .with_state(state)
    }

    fn real_app() -> Router {
        let repository = Arc::new(InMemoryUserRepository::new());
        gated_app(Arc::new(AuthenticationService::new(
            repository,
            &AuthConfig::new(SECRET.to_vec()),
        )))
    }

    async fn call(app: Router, authorization: Option<&str>) -> (StatusCode, String) {
        let mut builder = Request::builder().uri("/protected");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }

        let response = app
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn error_message(body: &str) -> String {
        let value: serde_json::Value = serde_json::from_str(body).unwrap();
        value["data"]["message"].as_str().unwrap().to_string()
    }

    fn issue_pair(secret: &[u8], user_id: &UserId) -> TokenPair {
        TokenIssuer::new(&AuthConfig::new(secret.to_vec()))
            .issue_pair(&user_id.to_string(), "a@x.com")
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_access_token_reaches_handler() {
        let user_id = UserId::new();
        let pair = issue_pair(SECRET, &user_id);

        let (status, body) = call(
            real_app(),
            Some(format!("Bearer {}", pair.access_token).as_str()),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, format!("{}|a@x.com", user_id));
    }

    #[tokio::test]
    async fn test_refresh_token_is_rejected() {
        let pair = issue_pair(SECRET, &UserId::new());

        let (status, body) = call(
            real_app(),
            Some(format!("Bearer {}", pair.refresh_token).as_str()),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(error_message(&body), INVALID_TOKEN_TYPE_MESSAGE);
    }

    #[tokio::test]
    async fn test_missing_header() {
        let (status, body) = call(real_app(), None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(error_message(&body), MISSING_AUTH_HEADER_MESSAGE);
    }

    #[tokio::test]
    async fn test_not_bearer_scheme() {
        let (status, body) = call(real_app(), Some("not-bearer-scheme")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(error_message(&body), INVALID_AUTH_HEADER_FORMAT_MESSAGE);
    }

    #[tokio::test]
    async fn test_foreign_secret_is_invalid() {
        let pair = issue_pair(b"another_secret_at_least_32_bytes!!", &UserId::new());

        let (status, body) = call(
            real_app(),
            Some(format!("Bearer {}", pair.access_token).as_str()),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(error_message(&body), INVALID_TOKEN_MESSAGE);
    }

    #[tokio::test]
    async fn test_expired_token_has_distinct_message() {
        let claims = Claims::new(
            UserId::new(),
            "a@x.com",
            TokenKind::Access,
            Utc::now() - Duration::hours(1),
            Duration::minutes(15),
        )
        .unwrap();
        let token = JwtHandler::new(SECRET).encode(&claims).unwrap();

        let (status, body) = call(real_app(), Some(format!("Bearer {}", token).as_str())).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(error_message(&body), TOKEN_EXPIRED_MESSAGE);
    }

    #[tokio::test]
    async fn test_non_uuid_subject_is_invalid() {
        let pair = TokenIssuer::new(&AuthConfig::new(SECRET.to_vec()))
            .issue_pair("user123", "a@x.com")
            .unwrap();

        let (status, body) = call(
            real_app(),
            Some(format!("Bearer {}", pair.access_token).as_str()),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(error_message(&body), INVALID_TOKEN_MESSAGE);
    }

    #[tokio::test]
    async fn test_malformed_headers_never_reach_validation() {
        for header in ["Bearer", "Bearer ", "bearer token", "Basic dXNlcjpwYXNz", "Token abc"] {
            let mut auth_service = MockTestAuthenticationService::new();
            auth_service.expect_validate_token().times(0);

            let (status, body) = call(gated_app(Arc::new(auth_service)), Some(header)).await;

            assert_eq!(status, StatusCode::UNAUTHORIZED, "{header}");
            assert_eq!(error_message(&body), INVALID_AUTH_HEADER_FORMAT_MESSAGE, "{header}");
        }
    }

    #[tokio::test]
    async fn test_claims_from_service_are_attached() {
        let user_id = UserId::new();
        let claims = Claims::new(
            user_id,
            "b@x.com",
            TokenKind::Access,
            Utc::now(),
            Duration::minutes(15),
        )
        .unwrap();

        let mut auth_service = MockTestAuthenticationService::new();
        auth_service
            .expect_validate_token()
            .withf(|token| token == "opaque-token")
            .times(1)
            .returning(move |_| Ok(claims.clone()));

        let (status, body) = call(
            gated_app(Arc::new(auth_service)),
            Some("Bearer opaque-token"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, format!("{}|b@x.com", user_id));
    }

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(
            extract_bearer_token(&headers),
            Err(AuthError::MissingAuthHeader)
        );

        headers.insert(AUTHORIZATION, HeaderValue::from_static(""));
        assert_eq!(
            extract_bearer_token(&headers),
            Err(AuthError::MissingAuthHeader)
        );

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_bearer_token(&headers), Ok("abc.def.ghi"));

        headers.insert(AUTHORIZATION, HeaderValue::from_bytes(b"Bearer \xfa").unwrap());
        assert_eq!(
            extract_bearer_token(&headers),
            Err(AuthError::InvalidAuthHeaderFormat)
        );
    }
}
