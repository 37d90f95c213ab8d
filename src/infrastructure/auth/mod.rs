pub mod request_id;

pub use request_id::{request_id_middleware, RequestId};

use axum::{extract::Request, middleware::Next, response::Response};
use uuid::Uuid;

use crate::error::AppError;

pub const X_USER_ID: &str = "x-user-id";

/// Identity of the caller, resolved by the upstream gateway. Session and
/// token handling live outside this service; the gateway forwards the
/// authenticated user's id in a trusted header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
}

/// Middleware requiring a valid user id header on protected routes
pub async fn auth_middleware(mut request: Request, next: Next) -> Result<Response, AppError> {
    let user_id = request
        .headers()
        .get(X_USER_ID)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value).ok())
        .ok_or_else(|| {
            AppError::Unauthorized(format!("missing or invalid {X_USER_ID} header"))
        })?;

    request.extensions_mut().insert(AuthUser { user_id });

    Ok(next.run(request).await)
}
