//! Entity records held by the store.
//!
//! Every struct serializes with camelCase field names so it can be handed
//! directly to API clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::status::{BookingStatus, FlightLogStatus, FlightType, MilestoneStatus};
use crate::types::{Id, Role};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A registered student or instructor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Id,
    pub username: String,
    /// Argon2 PHC string. Never leaves the server.
    #[serde(skip)]
    pub password_hash: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub profile_image: Option<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_instructor(&self) -> bool {
        self.role == Role::Instructor
    }

    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }
}

// ---------------------------------------------------------------------------
// Aircraft
// ---------------------------------------------------------------------------

/// Training aircraft. Reference data created by the demo seed only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Aircraft {
    pub id: Id,
    pub tail_number: String,
    /// e.g. "Cessna 172"
    #[serde(rename = "type")]
    pub aircraft_type: String,
    pub model: String,
}

// ---------------------------------------------------------------------------
// Booking
// ---------------------------------------------------------------------------

/// A scheduled training session. `end_time` is always after `start_time`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Id,
    pub student_id: Id,
    pub instructor_id: Option<Id>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Free-form, e.g. "pattern", "navigation", "checkride-prep".
    pub training_type: String,
    pub aircraft_id: Option<Id>,
    pub status: BookingStatus,
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Flight log
// ---------------------------------------------------------------------------

/// A flight claimed by a student, awaiting or past instructor review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlightLog {
    pub id: Id,
    pub student_id: Id,
    pub instructor_id: Option<Id>,
    pub aircraft_id: Id,
    pub date: DateTime<Utc>,
    /// Hours flown.
    pub duration: f64,
    pub departure_airport: String,
    pub destination_airport: String,
    pub return_airport: Option<String>,
    pub flight_type: FlightType,
    pub notes: Option<String>,
    pub status: FlightLogStatus,
}

// ---------------------------------------------------------------------------
// Milestone
// ---------------------------------------------------------------------------

/// A named training achievement with a completion percentage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: Id,
    pub student_id: Id,
    pub title: String,
    pub description: Option<String>,
    pub required_hours: Option<f64>,
    pub status: MilestoneStatus,
    pub completion_date: Option<DateTime<Utc>>,
    /// Instructor who signed the milestone off.
    pub approved_by: Option<Id>,
    /// Percent complete, always within [0, 100].
    pub progress: f64,
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A direct message between two users.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Id,
    pub sender_id: Id,
    pub receiver_id: Id,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User {
            id: 1,
            username: "sarahmiller".into(),
            password_hash: "$argon2id$v=19$secret".into(),
            email: "sarah.miller@example.com".into(),
            first_name: "Sarah".into(),
            last_name: "Miller".into(),
            role: Role::Instructor,
            profile_image: None,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["firstName"], "Sarah");
        assert_eq!(json["role"], "instructor");
        assert_eq!(user.full_name(), "Sarah Miller");
    }

    #[test]
    fn aircraft_type_field_is_named_type() {
        let aircraft = Aircraft {
            id: 1,
            tail_number: "N5434G".into(),
            aircraft_type: "Cessna 172".into(),
            model: "Skyhawk".into(),
        };
        let json = serde_json::to_value(&aircraft).unwrap();
        assert_eq!(json["type"], "Cessna 172");
        assert_eq!(json["tailNumber"], "N5434G");
    }
}
