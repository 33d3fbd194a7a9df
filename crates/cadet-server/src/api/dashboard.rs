use axum::{extract::State, Json};
use chrono::Utc;

use cadet_shared::{InstructorDashboard, StudentDashboard};

use super::AppState;
use crate::session::{Instructor, Student};

pub async fn student(State(state): State<AppState>, Student(user): Student) -> Json<StudentDashboard> {
    let store = state.store.read().await;
    Json(store.student_dashboard(user.user_id, Utc::now()))
}

pub async fn instructor(
    State(state): State<AppState>,
    Instructor(user): Instructor,
) -> Json<InstructorDashboard> {
    let store = state.store.read().await;
    Json(store.instructor_dashboard(user.user_id, Utc::now()))
}
