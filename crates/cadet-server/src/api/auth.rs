use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::CookieJar;
use tracing::info;

use cadet_shared::{LoginRequest, NewUser, UserProfile, Validate};
use cadet_store::password::hash_password;

use super::AppState;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::session::{removal_cookie, session_cookie, session_id, AuthUser};

/// Replace whatever session the browser carried with a fresh one.
async fn start_session(state: &AppState, jar: CookieJar, profile: &UserProfile) -> CookieJar {
    if let Some(old) = session_id(&jar) {
        state.sessions.destroy(&old).await;
    }
    let id = state.sessions.create(profile.id, profile.role).await;
    jar.add(session_cookie(id, state.config.secure_cookies))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<(CookieJar, Json<UserProfile>), ApiError> {
    let (Some(username), Some(password)) = (req.username, req.password) else {
        return Err(ApiError::Validation(
            "Username and password are required".into(),
        ));
    };

    let profile = {
        let store = state.store.read().await;
        store
            .authenticate(&username, &password)
            .map(UserProfile::from)
            .ok_or(ApiError::InvalidCredentials)?
    };

    let jar = start_session(&state, jar, &profile).await;
    info!(user_id = profile.id, username = %profile.username, "User logged in");
    Ok((jar, Json(profile)))
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(new): ApiJson<NewUser>,
) -> Result<(StatusCode, CookieJar, Json<UserProfile>), ApiError> {
    if !state.config.registration_open {
        return Err(ApiError::Forbidden(
            "Registration is closed on this instance".into(),
        ));
    }

    // Hash off the runtime and outside the store lock; uniqueness is
    // checked under the lock.
    new.validate()?;
    let password = new.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ApiError::Internal(format!("password hashing task failed: {e}")))??;

    let profile = {
        let mut store = state.store.write().await;
        UserProfile::from(&store.register_user_with_hash(new, password_hash)?)
    };

    let jar = start_session(&state, jar, &profile).await;
    info!(user_id = profile.id, role = %profile.role, "User registered");
    Ok((StatusCode::CREATED, jar, Json(profile)))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<serde_json::Value>) {
    if let Some(id) = session_id(&jar) {
        state.sessions.destroy(&id).await;
    }
    (
        jar.remove(removal_cookie()),
        Json(serde_json::json!({ "message": "Logged out successfully" })),
    )
}

pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<UserProfile>, ApiError> {
    let store = state.store.read().await;
    store
        .get_user(user.user_id)
        .map(|u| Json(UserProfile::from(u)))
        .ok_or_else(|| ApiError::NotFound("User not found".into()))
}
