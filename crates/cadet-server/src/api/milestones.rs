use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use tracing::info;

use cadet_shared::{Id, Milestone, NewMilestone, ProgressUpdate};

use super::AppState;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::session::{AuthUser, Instructor, Student};

pub async fn mine(State(state): State<AppState>, Student(user): Student) -> Json<Vec<Milestone>> {
    let store = state.store.read().await;
    Json(store.milestones_by_student(user.user_id).into_iter().cloned().collect())
}

pub async fn for_student(
    State(state): State<AppState>,
    _instructor: Instructor,
    ApiPath(student_id): ApiPath<Id>,
) -> Json<Vec<Milestone>> {
    let store = state.store.read().await;
    Json(store.milestones_by_student(student_id).into_iter().cloned().collect())
}

pub async fn create(
    State(state): State<AppState>,
    Instructor(user): Instructor,
    ApiJson(new): ApiJson<NewMilestone>,
) -> Result<(StatusCode, Json<Milestone>), ApiError> {
    let milestone = state.store.write().await.create_milestone(new, Utc::now())?;
    info!(
        id = milestone.id,
        student = milestone.student_id,
        instructor = user.user_id,
        "Milestone created"
    );
    Ok((StatusCode::CREATED, Json(milestone)))
}

pub async fn update_progress(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Id>,
    ApiJson(body): ApiJson<ProgressUpdate>,
) -> Result<Json<Milestone>, ApiError> {
    let (progress, status) = body.parse().map_err(|e| ApiError::Validation(e.message))?;

    let milestone = state.store.write().await.update_milestone_progress(
        id,
        progress,
        status,
        Utc::now(),
        state.config.strict_transitions,
    )?;
    info!(id, progress, by = user.user_id, "Milestone progress recorded");
    Ok(Json(milestone))
}

pub async fn complete(
    State(state): State<AppState>,
    Instructor(user): Instructor,
    ApiPath(id): ApiPath<Id>,
) -> Result<Json<Milestone>, ApiError> {
    let milestone = state
        .store
        .write()
        .await
        .complete_milestone(id, user.user_id, Utc::now())?;
    Ok(Json(milestone))
}
