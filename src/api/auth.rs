use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use metrics::counter;
use sha2::{Digest, Sha256};

use crate::db::user_repo;
use crate::errors::AppError;
use crate::models::User;
use crate::AppState;

/// Hash a bearer token the way the sessions table stores it. Plaintext
/// tokens never touch the database.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Session-authentication middleware.
///
/// Every request must carry `Authorization: Bearer <token>` matching an
/// unexpired row in the sessions table. The resolved `User` is inserted
/// into request extensions and is the only identity downstream handlers
/// and services act on — there is no caller-supplied user id to trust.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty());

    let Some(token) = token else {
        counter!("auth_failures_total").increment(1);
        return Err(AppError::NotAuthenticated);
    };

    let user = user_repo::get_user_by_session(&state.db, &hash_token(token))
        .await?
        .ok_or_else(|| {
            counter!("auth_failures_total").increment(1);
            AppError::NotAuthenticated
        })?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Gate for the admin surface.
pub fn require_admin(user: &User) -> Result<(), AppError> {
    if !user.is_admin {
        return Err(AppError::Forbidden("admin access required".into()));
    }
    Ok(())
}
