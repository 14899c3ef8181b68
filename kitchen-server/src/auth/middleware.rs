//! Authentication middleware
//!
//! Axum middleware for JWT authentication and role based authorization.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::{AppError, ErrorCode};

use crate::auth::permissions::get_default_permissions;
use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::db::repository::user;
use crate::security_log;

/// API routes reachable without a token
const PUBLIC_API_ROUTES: &[&str] = &["/api/auth/login", "/api/health"];

/// Require a logged-in user
///
/// Validates `Authorization: Bearer <token>`, then loads the account so a
/// deleted or deactivated user is rejected before their token expires. The
/// role and permissions come from the account, not the token. Inserts
/// [`CurrentUser`] into the request extensions.
///
/// Skipped for:
/// - `OPTIONS *` (CORS preflight)
/// - non `/api/` paths (health check, SPA assets)
/// - [`PUBLIC_API_ROUTES`]
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    if !path.starts_with("/api/") || PUBLIC_API_ROUTES.contains(&path) {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!(WARN, "auth_missing", uri = %req.uri());
            return Err(AppError::unauthorized());
        }
    };

    let claimed = match state
        .jwt_service()
        .validate_token(token)
        .and_then(CurrentUser::try_from)
    {
        Ok(user) => user,
        Err(e) => {
            security_log!(WARN, "auth_failed", error = %e, uri = %req.uri());
            return Err(match e {
                JwtError::ExpiredToken => AppError::token_expired(),
                _ => AppError::invalid_token("Invalid token"),
            });
        }
    };

    let account = match user::find_by_id(state.pool(), claimed.id).await? {
        Some(account) => account,
        None => {
            security_log!(
                WARN,
                "auth_failed",
                user_id = claimed.id,
                reason = "user_not_found",
                uri = %req.uri()
            );
            return Err(AppError::invalid_token("Account no longer exists"));
        }
    };
    if !account.is_active {
        security_log!(
            WARN,
            "auth_failed",
            user_id = account.id,
            reason = "account_disabled",
            uri = %req.uri()
        );
        return Err(AppError::with_message(
            ErrorCode::AccountDisabled,
            "Account has been disabled",
        ));
    }

    let current = CurrentUser {
        id: account.id,
        email: account.email,
        name: account.name,
        role: account.role,
        permissions: get_default_permissions(account.role),
    };
    req.extensions_mut().insert(current);
    Ok(next.run(req).await)
}

/// Require a specific permission
///
/// ```ignore
/// use axum::middleware;
/// Router::new()
///     .route("/", post(handler::create))
///     .layer(middleware::from_fn(require_permission(permissions::STOCK_MOVE)));
/// ```
pub fn require_permission(
    permission: &'static str,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or_else(AppError::unauthorized)?;

            if !user.has_permission(permission) {
                security_log!(
                    WARN,
                    "permission_denied",
                    user_id = user.id,
                    role = user.role.as_str(),
                    required_permission = permission
                );
                return Err(AppError::forbidden(format!(
                    "Permission denied: {}",
                    permission
                )));
            }

            Ok(next.run(req).await)
        })
    }
}

/// Require the admin role
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(AppError::unauthorized)?;
    if !user.is_admin() {
        security_log!(
            WARN,
            "admin_required",
            user_id = user.id,
            role = user.role.as_str()
        );
        return Err(AppError::new(ErrorCode::AdminRequired));
    }

    Ok(next.run(req).await)
}
