//! Insert payloads and request bodies, with the checks each must pass
//! before it reaches the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{PROGRESS_MAX, PROGRESS_MIN};
use crate::error::ValidationError;
use crate::status::{BookingStatus, FlightLogStatus, FlightType, MilestoneStatus};
use crate::types::{Id, Role};

/// Schema check for an insert payload.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "Required"));
    }
    Ok(())
}

fn check_progress(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || !(PROGRESS_MIN..=PROGRESS_MAX).contains(&value) {
        return Err(ValidationError::new(
            "progress",
            "Progress must be between 0 and 100",
        ));
    }
    Ok(())
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !email.chars().any(char::is_whitespace)
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub profile_image: Option<String>,
}

impl Validate for NewUser {
    fn validate(&self) -> Result<(), ValidationError> {
        require("username", &self.username)?;
        require("password", &self.password)?;
        require("email", &self.email)?;
        require("firstName", &self.first_name)?;
        require("lastName", &self.last_name)?;
        if !looks_like_email(&self.email) {
            return Err(ValidationError::new("email", "Invalid email"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

// ---------------------------------------------------------------------------
// Aircraft
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAircraft {
    pub tail_number: String,
    #[serde(rename = "type")]
    pub aircraft_type: String,
    pub model: String,
}

impl Validate for NewAircraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require("tailNumber", &self.tail_number)?;
        require("type", &self.aircraft_type)?;
        require("model", &self.model)
    }
}

// ---------------------------------------------------------------------------
// Bookings
// ---------------------------------------------------------------------------

/// Booking request. `student_id` may be left out by a student booking for
/// themselves; the server fills it in from the session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    #[serde(default)]
    pub student_id: Option<Id>,
    #[serde(default)]
    pub instructor_id: Option<Id>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub training_type: String,
    #[serde(default)]
    pub aircraft_id: Option<Id>,
    #[serde(default)]
    pub status: Option<BookingStatus>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Validate for NewBooking {
    fn validate(&self) -> Result<(), ValidationError> {
        require("trainingType", &self.training_type)?;
        if self.end_time <= self.start_time {
            return Err(ValidationError::new(
                "endTime",
                "End time must be after start time",
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Flight logs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewFlightLog {
    #[serde(default)]
    pub student_id: Option<Id>,
    #[serde(default)]
    pub instructor_id: Option<Id>,
    pub aircraft_id: Id,
    pub date: DateTime<Utc>,
    pub duration: f64,
    pub departure_airport: String,
    pub destination_airport: String,
    #[serde(default)]
    pub return_airport: Option<String>,
    pub flight_type: FlightType,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: Option<FlightLogStatus>,
}

impl Validate for NewFlightLog {
    fn validate(&self) -> Result<(), ValidationError> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(ValidationError::new(
                "duration",
                "Duration must be greater than 0",
            ));
        }
        require("departureAirport", &self.departure_airport)?;
        require("destinationAirport", &self.destination_airport)
    }
}

// ---------------------------------------------------------------------------
// Milestones
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewMilestone {
    pub student_id: Id,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub required_hours: Option<f64>,
    #[serde(default)]
    pub status: Option<MilestoneStatus>,
    #[serde(default)]
    pub completion_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub approved_by: Option<Id>,
    #[serde(default)]
    pub progress: Option<f64>,
}

impl Validate for NewMilestone {
    fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        if let Some(hours) = self.required_hours {
            if !hours.is_finite() || hours < 0.0 {
                return Err(ValidationError::new(
                    "requiredHours",
                    "Required hours cannot be negative",
                ));
            }
        }
        if let Some(progress) = self.progress {
            check_progress(progress)?;
        }
        Ok(())
    }
}

/// Body of `PATCH /api/milestones/:id/progress`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
}

impl ProgressUpdate {
    /// Returns the checked progress value and parsed optional status.
    pub fn parse(&self) -> Result<(f64, Option<MilestoneStatus>), ValidationError> {
        let progress = self
            .progress
            .ok_or_else(|| ValidationError::new("progress", "Invalid progress value"))?;
        check_progress(progress)
            .map_err(|_| ValidationError::new("progress", "Invalid progress value"))?;
        let status = match self.status.as_deref() {
            None => None,
            Some(raw) => Some(
                raw.parse::<MilestoneStatus>()
                    .map_err(|_| ValidationError::new("status", "Invalid status"))?,
            ),
        };
        Ok((progress, status))
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    #[serde(default)]
    pub receiver_id: Option<Id>,
    #[serde(default)]
    pub content: Option<String>,
}

impl Validate for NewMessage {
    fn validate(&self) -> Result<(), ValidationError> {
        match (&self.receiver_id, &self.content) {
            (Some(_), Some(content)) if !content.trim().is_empty() => Ok(()),
            _ => Err(ValidationError::new(
                "receiverId",
                "Receiver ID and content are required",
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Status updates
// ---------------------------------------------------------------------------

/// Body of the `PATCH .../status` routes. Kept as a raw string so unknown
/// values produce our own 400 instead of a deserializer message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusUpdate {
    #[serde(default)]
    pub status: Option<String>,
}

impl StatusUpdate {
    pub fn parse<S: std::str::FromStr>(&self) -> Result<S, ValidationError> {
        self.status
            .as_deref()
            .and_then(|raw| raw.parse::<S>().ok())
            .ok_or_else(|| ValidationError::new("status", "Invalid status"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn booking(start: DateTime<Utc>, end: DateTime<Utc>) -> NewBooking {
        NewBooking {
            student_id: Some(3),
            instructor_id: Some(1),
            start_time: start,
            end_time: end,
            training_type: "pattern".into(),
            aircraft_id: Some(1),
            status: None,
            notes: None,
        }
    }

    #[test]
    fn booking_end_must_follow_start() {
        let now = Utc::now();
        assert!(booking(now, now + Duration::hours(2)).validate().is_ok());
        assert!(booking(now, now).validate().is_err());
        assert!(booking(now, now - Duration::hours(1)).validate().is_err());
    }

    #[test]
    fn flight_log_duration_must_be_positive() {
        let json = serde_json::json!({
            "aircraftId": 1,
            "date": "2023-05-10T00:00:00Z",
            "duration": 0.0,
            "departureAirport": "KBOS",
            "destinationAirport": "KPVD",
            "flightType": "dual"
        });
        let mut log: NewFlightLog = serde_json::from_value(json).unwrap();
        assert!(log.validate().is_err());

        log.duration = f64::NAN;
        assert!(log.validate().is_err());

        log.duration = 1.2;
        assert!(log.validate().is_ok());
        assert_eq!(log.status, None);
    }

    #[test]
    fn new_user_defaults_to_student() {
        let json = serde_json::json!({
            "username": "alexjohnson",
            "password": "password123",
            "email": "alex.j@example.com",
            "firstName": "Alex",
            "lastName": "Johnson"
        });
        let user: NewUser = serde_json::from_value(json).unwrap();
        assert_eq!(user.role, Role::Student);
        assert!(user.validate().is_ok());
    }

    #[test]
    fn new_user_rejects_bad_email() {
        for email in ["alex", "alex@", "@example.com", "alex@example", "a b@example.com"] {
            let user = NewUser {
                username: "alex".into(),
                password: "pw".into(),
                email: email.into(),
                first_name: "Alex".into(),
                last_name: "Johnson".into(),
                role: Role::Student,
                profile_image: None,
            };
            assert!(user.validate().is_err(), "accepted {email}");
        }
    }

    #[test]
    fn progress_update_bounds() {
        let ok = ProgressUpdate {
            progress: Some(61.0),
            status: Some("in_progress".into()),
        };
        assert_eq!(
            ok.parse().unwrap(),
            (61.0, Some(MilestoneStatus::InProgress))
        );

        let missing = ProgressUpdate::default();
        assert!(missing.parse().is_err());

        let high = ProgressUpdate {
            progress: Some(100.5),
            status: None,
        };
        assert!(high.parse().is_err());

        let bad_status = ProgressUpdate {
            progress: Some(10.0),
            status: Some("halfway".into()),
        };
        assert!(bad_status.parse().is_err());
    }

    #[test]
    fn status_update_parses_into_enum() {
        let update = StatusUpdate {
            status: Some("approved".into()),
        };
        assert_eq!(
            update.parse::<FlightLogStatus>().unwrap(),
            FlightLogStatus::Approved
        );

        let bogus = StatusUpdate {
            status: Some("archived".into()),
        };
        let err = bogus.parse::<FlightLogStatus>().unwrap_err();
        assert_eq!(err.message, "Invalid status");
        assert!(StatusUpdate::default().parse::<BookingStatus>().is_err());
    }

    #[test]
    fn message_requires_receiver_and_content() {
        let blank = NewMessage {
            receiver_id: Some(2),
            content: Some("   ".into()),
        };
        assert!(blank.validate().is_err());

        let missing = NewMessage {
            receiver_id: None,
            content: Some("hi".into()),
        };
        assert!(missing.validate().is_err());
    }
}
