//! Authentication Handlers

use std::time::Duration;

use axum::{Json, extract::State};
use shared::client::{ChangePasswordRequest, LoginRequest, LoginResponse, UserInfo};
use shared::error::{AppError, AppResult, ErrorCode};

use crate::auth::permissions::get_default_permissions;
use crate::auth::{CurrentUser, password};
use crate::core::ServerState;
use crate::db::repository::user;
use crate::security_log;
use crate::utils::ValidatedJson;

/// Authenticate by email and password and issue a JWT.
///
/// Unknown email and wrong password get the same 401 after the same fixed
/// delay.
pub async fn login(
    State(state): State<ServerState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let found = user::find_by_email(state.pool(), &req.email).await?;
    let verified = found
        .as_ref()
        .is_some_and(|u| password::verify_password(&req.password, &u.password_hash));

    tokio::time::sleep(Duration::from_millis(state.config.login_delay_ms)).await;

    let account = match found {
        Some(account) if verified => account,
        Some(_) => {
            security_log!(
                WARN,
                "login_failed",
                email = req.email.as_str(),
                reason = "invalid_password"
            );
            return Err(AppError::invalid_credentials());
        }
        None => {
            security_log!(
                WARN,
                "login_failed",
                email = req.email.as_str(),
                reason = "user_not_found"
            );
            return Err(AppError::invalid_credentials());
        }
    };

    if !account.is_active {
        security_log!(
            WARN,
            "login_failed",
            email = req.email.as_str(),
            reason = "account_disabled"
        );
        return Err(AppError::with_message(
            ErrorCode::AccountDisabled,
            "Account has been disabled",
        ));
    }

    let permissions = get_default_permissions(account.role);
    let jwt = state.jwt_service();
    let token = jwt
        .generate_token(
            account.id,
            &account.email,
            &account.name,
            account.role,
            &permissions,
        )
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(user_id = account.id, email = %account.email, role = %account.role, "User logged in");

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: jwt.expires_in_seconds(),
        user: UserInfo {
            id: account.id,
            name: account.name,
            email: account.email,
            role: account.role,
            permissions,
        },
    }))
}

/// Current user, read fresh from the database
pub async fn me(State(state): State<ServerState>, current: CurrentUser) -> AppResult<Json<UserInfo>> {
    let account = user::find_by_id(state.pool(), current.id)
        .await?
        .ok_or_else(AppError::unauthorized)?;

    Ok(Json(UserInfo {
        id: account.id,
        name: account.name,
        email: account.email,
        role: account.role,
        permissions: get_default_permissions(account.role),
    }))
}

pub async fn change_password(
    State(state): State<ServerState>,
    current: CurrentUser,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<Json<bool>> {
    let account = user::find_by_id(state.pool(), current.id)
        .await?
        .ok_or_else(AppError::unauthorized)?;

    if !password::verify_password(&req.current_password, &account.password_hash) {
        security_log!(WARN, "password_change_failed", user_id = current.id);
        return Err(AppError::with_message(
            ErrorCode::InvalidCredentials,
            "Current password is incorrect",
        ));
    }

    user::update_password(state.pool(), current.id, &req.new_password).await?;
    tracing::info!(user_id = current.id, "Password changed");
    Ok(Json(true))
}
