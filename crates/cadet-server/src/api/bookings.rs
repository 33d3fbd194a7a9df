use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use cadet_shared::{Booking, BookingStatus, Id, NewBooking, StatusUpdate, Transition};

use super::AppState;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::session::{AuthUser, Instructor, Student};

pub async fn for_student(
    State(state): State<AppState>,
    Student(user): Student,
) -> Json<Vec<Booking>> {
    let store = state.store.read().await;
    Json(store.bookings_by_student(user.user_id).into_iter().cloned().collect())
}

pub async fn for_instructor(
    State(state): State<AppState>,
    Instructor(user): Instructor,
) -> Json<Vec<Booking>> {
    let store = state.store.read().await;
    Json(store.bookings_by_instructor(user.user_id).into_iter().cloned().collect())
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(mut new): ApiJson<NewBooking>,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
    new.student_id = user.scoped_student(new.student_id)?;

    let booking = state.store.write().await.create_booking(new)?;
    info!(id = booking.id, student = booking.student_id, by = user.user_id, "Booking requested");
    Ok((StatusCode::CREATED, Json(booking)))
}

pub async fn update_status(
    State(state): State<AppState>,
    Instructor(user): Instructor,
    ApiPath(id): ApiPath<Id>,
    ApiJson(body): ApiJson<StatusUpdate>,
) -> Result<Json<Booking>, ApiError> {
    let status: BookingStatus = body.parse().map_err(|e| ApiError::Validation(e.message))?;

    let booking = state.store.write().await.update_booking_status(
        id,
        status,
        state.config.strict_transitions,
    )?;
    info!(id, status = status.as_str(), instructor = user.user_id, "Booking status changed");
    Ok(Json(booking))
}
