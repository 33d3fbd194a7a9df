//! Status enums and their transition tables.
//!
//! Each status type knows which states it may move to next. The server only
//! enforces these tables when strict transitions are enabled; otherwise any
//! value in the enum is accepted.

use serde::{Deserialize, Serialize};

/// A finite set of states with an allowed-transitions table keyed by the
/// current state.
pub trait Transition: Copy + PartialEq + Sized + 'static {
    /// States reachable from `self` in one step, excluding `self`.
    fn allowed_transitions(&self) -> &'static [Self];

    /// Wire name of the state.
    fn as_str(&self) -> &'static str;

    /// Staying in the same state is always permitted.
    fn can_transition_to(&self, next: Self) -> bool {
        *self == next || self.allowed_transitions().contains(&next)
    }
}

// ---------------------------------------------------------------------------
// Booking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl Transition for BookingStatus {
    fn allowed_transitions(&self) -> &'static [Self] {
        use BookingStatus::*;
        match self {
            Pending => &[Confirmed, Cancelled],
            Confirmed => &[Completed, Cancelled],
            Completed | Cancelled => &[],
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown booking status: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Flight log
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlightLogStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl Transition for FlightLogStatus {
    fn allowed_transitions(&self) -> &'static [Self] {
        use FlightLogStatus::*;
        match self {
            Pending => &[Approved, Rejected],
            Approved => &[],
            // A rejected log can be resubmitted for review.
            Rejected => &[Pending],
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            FlightLogStatus::Pending => "pending",
            FlightLogStatus::Approved => "approved",
            FlightLogStatus::Rejected => "rejected",
        }
    }
}

impl std::str::FromStr for FlightLogStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("unknown flight log status: {other}")),
        }
    }
}

/// Kind of flight recorded in a log. Not a state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlightType {
    #[serde(rename = "dual")]
    Dual,
    #[serde(rename = "solo")]
    Solo,
    #[serde(rename = "cross-country")]
    CrossCountry,
}

// ---------------------------------------------------------------------------
// Milestone
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl Transition for MilestoneStatus {
    fn allowed_transitions(&self) -> &'static [Self] {
        use MilestoneStatus::*;
        match self {
            NotStarted => &[InProgress, Completed],
            InProgress => &[Completed],
            Completed => &[],
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            MilestoneStatus::NotStarted => "not_started",
            MilestoneStatus::InProgress => "in_progress",
            MilestoneStatus::Completed => "completed",
        }
    }
}

impl std::str::FromStr for MilestoneStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_started" => Ok(Self::NotStarted),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(format!("unknown milestone status: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_moves_forward_only() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Confirmed));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::Completed));
        assert!(!BookingStatus::Completed.can_transition_to(BookingStatus::Pending));
        assert!(!BookingStatus::Cancelled.can_transition_to(BookingStatus::Confirmed));
    }

    #[test]
    fn same_state_is_always_allowed() {
        assert!(BookingStatus::Cancelled.can_transition_to(BookingStatus::Cancelled));
        assert!(FlightLogStatus::Approved.can_transition_to(FlightLogStatus::Approved));
        assert!(MilestoneStatus::Completed.can_transition_to(MilestoneStatus::Completed));
    }

    #[test]
    fn rejected_log_can_be_resubmitted() {
        assert!(FlightLogStatus::Rejected.can_transition_to(FlightLogStatus::Pending));
        assert!(!FlightLogStatus::Approved.can_transition_to(FlightLogStatus::Rejected));
    }

    #[test]
    fn wire_names_match_serde() {
        for status in [
            MilestoneStatus::NotStarted,
            MilestoneStatus::InProgress,
            MilestoneStatus::Completed,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            assert_eq!(status.as_str().parse::<MilestoneStatus>().unwrap(), status);
        }
        assert_eq!(
            serde_json::to_string(&FlightType::CrossCountry).unwrap(),
            "\"cross-country\""
        );
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!("archived".parse::<FlightLogStatus>().is_err());
        assert!("done".parse::<BookingStatus>().is_err());
    }
}
