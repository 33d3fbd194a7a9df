//! Cookie-backed login sessions.
//!
//! A session is a random UUID handed to the browser in the `cadet.sid`
//! cookie. The server keeps the id → user mapping in memory; nothing about
//! the user is stored client-side. Sessions have a fixed absolute lifetime.
//! An expired session is ignored on lookup and removed by the periodic
//! purge task.

use std::collections::HashMap;
use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use cadet_shared::constants::{MAX_SESSION_TTL_SECS, SESSION_COOKIE};
use cadet_shared::{Id, Role};

use crate::api::AppState;
use crate::error::ApiError;

// ---------------------------------------------------------------------------
// Session store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: Id,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// In-memory session table shared by all request handlers.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    ttl: TimeDelta,
}

impl SessionStore {
    /// `ttl_secs` is clamped to at most one year.
    pub fn new(ttl_secs: i64) -> Self {
        let secs = ttl_secs.clamp(0, MAX_SESSION_TTL_SECS);
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl: TimeDelta::try_seconds(secs).unwrap_or(TimeDelta::MAX),
        }
    }

    fn expiry_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Start a session for `user_id` and return its id.
    pub async fn create(&self, user_id: Id, role: Role) -> Uuid {
        let id = Uuid::new_v4();
        let session = Session {
            user_id,
            role,
            expires_at: self.expiry_from(Utc::now()),
        };
        self.sessions.write().await.insert(id, session);
        debug!(user_id, %role, "session created");
        id
    }

    /// Returns the session if it exists and has not expired.
    pub async fn get(&self, id: &Uuid) -> Option<Session> {
        let sessions = self.sessions.read().await;
        sessions
            .get(id)
            .filter(|s| s.is_live(Utc::now()))
            .cloned()
    }

    pub async fn destroy(&self, id: &Uuid) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    /// Drop every expired session. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.is_live(now));
        let removed = before - sessions.len();
        if removed > 0 {
            debug!(removed, remaining = sessions.len(), "Purged expired sessions");
        }
        removed
    }
}

// ---------------------------------------------------------------------------
// Cookies
// ---------------------------------------------------------------------------

pub fn session_cookie(id: Uuid, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

/// Session id carried by the request, if it parses.
pub fn session_id(jar: &CookieJar) -> Option<Uuid> {
    jar.get(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok())
}

// ---------------------------------------------------------------------------
// Extractors
// ---------------------------------------------------------------------------

/// Any logged-in user. Rejects with 401 when the cookie is missing, unknown
/// or expired.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Id,
    pub role: Role,
}

impl AuthUser {
    /// Resolve the student a new booking or flight log belongs to. Students
    /// may only act for themselves and may leave the id out; instructors
    /// pass the requested id through unchanged.
    pub fn scoped_student(&self, requested: Option<Id>) -> Result<Option<Id>, ApiError> {
        match (self.role, requested) {
            (Role::Instructor, requested) => Ok(requested),
            (Role::Student, None) => Ok(Some(self.user_id)),
            (Role::Student, Some(id)) if id == self.user_id => Ok(Some(id)),
            (Role::Student, Some(_)) => Err(ApiError::forbidden()),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let jar = CookieJar::from_headers(&parts.headers);
        let id = session_id(&jar).ok_or(ApiError::Unauthenticated)?;
        let session = state
            .sessions
            .get(&id)
            .await
            .ok_or(ApiError::Unauthenticated)?;

        Ok(AuthUser {
            user_id: session.user_id,
            role: session.role,
        })
    }
}

/// A logged-in student.
#[derive(Debug, Clone, Copy)]
pub struct Student(pub AuthUser);

#[async_trait]
impl FromRequestParts<AppState> for Student {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        match user.role {
            Role::Student => Ok(Student(user)),
            Role::Instructor => Err(ApiError::forbidden()),
        }
    }
}

/// A logged-in instructor.
#[derive(Debug, Clone, Copy)]
pub struct Instructor(pub AuthUser);

#[async_trait]
impl FromRequestParts<AppState> for Instructor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        match user.role {
            Role::Instructor => Ok(Instructor(user)),
            Role::Student => Err(ApiError::forbidden()),
        }
    }
}
