use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use cadet_shared::{FlightLog, FlightLogStatus, Id, NewFlightLog, StatusUpdate, Transition};

use super::AppState;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::session::{AuthUser, Instructor, Student};

pub async fn mine(State(state): State<AppState>, Student(user): Student) -> Json<Vec<FlightLog>> {
    let store = state.store.read().await;
    Json(store.flight_logs_by_student(user.user_id).into_iter().cloned().collect())
}

pub async fn for_student(
    State(state): State<AppState>,
    _instructor: Instructor,
    ApiPath(student_id): ApiPath<Id>,
) -> Json<Vec<FlightLog>> {
    let store = state.store.read().await;
    Json(store.flight_logs_by_student(student_id).into_iter().cloned().collect())
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(mut new): ApiJson<NewFlightLog>,
) -> Result<(StatusCode, Json<FlightLog>), ApiError> {
    new.student_id = user.scoped_student(new.student_id)?;

    let log = state.store.write().await.create_flight_log(new)?;
    info!(
        id = log.id,
        student = log.student_id,
        hours = log.duration,
        flight_type = ?log.flight_type,
        "Flight logged"
    );
    Ok((StatusCode::CREATED, Json(log)))
}

/// Review a log. The reviewing instructor becomes the log's instructor.
pub async fn update_status(
    State(state): State<AppState>,
    Instructor(user): Instructor,
    ApiPath(id): ApiPath<Id>,
    ApiJson(body): ApiJson<StatusUpdate>,
) -> Result<Json<FlightLog>, ApiError> {
    let status: FlightLogStatus = body.parse().map_err(|e| ApiError::Validation(e.message))?;

    let log = state.store.write().await.update_flight_log_status(
        id,
        status,
        Some(user.user_id),
        state.config.strict_transitions,
    )?;
    info!(id, status = status.as_str(), instructor = user.user_id, "Flight log reviewed");
    Ok(Json(log))
}
