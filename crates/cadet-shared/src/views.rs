//! Derived read models returned by the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Booking, FlightLog, Milestone, User};
use crate::types::{Id, Role};

/// The caller's own profile, as returned by the auth routes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Id,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub profile_image: Option<String>,
}

impl From<&User> for UserProfile {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            username: u.username.clone(),
            email: u.email.clone(),
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            role: u.role,
            profile_image: u.profile_image.clone(),
        }
    }
}

/// Another user as seen in instructor/student listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Id,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub profile_image: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            email: u.email.clone(),
            profile_image: u.profile_image.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudentDashboard {
    pub total_hours: f64,
    pub solo_hours: f64,
    pub cross_country_hours: f64,
    pub upcoming_bookings: Vec<Booking>,
    pub milestones: Vec<Milestone>,
    pub recent_logs: Vec<FlightLog>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InstructorDashboard {
    pub total_students: usize,
    pub pending_bookings: Vec<Booking>,
    pub today_bookings: Vec<Booking>,
    pub pending_logs: Vec<FlightLog>,
}

/// One entry in a user's conversation list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MessageContact {
    pub id: Id,
    pub name: String,
    pub role: Role,
    pub last_message: Option<String>,
    pub last_message_time: Option<DateTime<Utc>>,
    /// Unread messages sent by this contact to the current user.
    pub unread_count: usize,
    pub profile_image: Option<String>,
}
