//! Read-only listings: instructors, aircraft, and an instructor's students.

use axum::{extract::State, Json};

use cadet_shared::{Aircraft, UserSummary};

use super::AppState;
use crate::session::{AuthUser, Instructor};

pub async fn instructors(State(state): State<AppState>, _user: AuthUser) -> Json<Vec<UserSummary>> {
    let store = state.store.read().await;
    Json(store.instructors().into_iter().map(UserSummary::from).collect())
}

pub async fn aircraft(State(state): State<AppState>, _user: AuthUser) -> Json<Vec<Aircraft>> {
    let store = state.store.read().await;
    Json(store.all_aircraft().into_iter().cloned().collect())
}

pub async fn my_students(
    State(state): State<AppState>,
    Instructor(user): Instructor,
) -> Json<Vec<UserSummary>> {
    let store = state.store.read().await;
    Json(
        store
            .students_by_instructor(user.user_id)
            .into_iter()
            .map(UserSummary::from)
            .collect(),
    )
}
