//! Writes the client can perform and the cached reads each one makes stale.

use cadet_shared::Id;

use crate::cache::QueryKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Login,
    Register,
    Logout,
    CreateBooking,
    UpdateBookingStatus,
    CreateFlightLog,
    UpdateFlightLogStatus,
    CreateMilestone { student_id: Id },
    UpdateMilestoneProgress,
    CompleteMilestone,
    SendMessage { receiver_id: Id },
    MarkRead,
    /// Fetching a conversation marks it read server-side.
    OpenConversation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invalidation {
    /// The caller's identity changed; nothing cached still applies.
    Everything,
    Keys(Vec<QueryKey>),
}

impl Mutation {
    pub fn invalidates(&self) -> Invalidation {
        use QueryKey::*;

        let keys = match *self {
            Mutation::Login | Mutation::Register | Mutation::Logout => {
                return Invalidation::Everything
            }
            // Instructors may create on a student's behalf, so both sides go.
            Mutation::CreateBooking => vec![
                StudentBookings,
                StudentDashboard,
                InstructorBookings,
                InstructorDashboard,
                InstructorStudents,
            ],
            Mutation::UpdateBookingStatus => vec![
                InstructorBookings,
                InstructorDashboard,
                StudentBookings,
                StudentDashboard,
            ],
            Mutation::CreateFlightLog => vec![
                FlightLogs,
                StudentDashboard,
                StudentFlightLogs(None),
                InstructorDashboard,
                InstructorStudents,
            ],
            // The reviewer becomes the log's instructor.
            Mutation::UpdateFlightLogStatus => vec![
                FlightLogs,
                StudentFlightLogs(None),
                InstructorDashboard,
                InstructorStudents,
            ],
            Mutation::CreateMilestone { student_id } => {
                vec![StudentMilestones(Some(student_id)), Milestones]
            }
            Mutation::UpdateMilestoneProgress | Mutation::CompleteMilestone => {
                vec![Milestones, StudentMilestones(None), StudentDashboard]
            }
            Mutation::SendMessage { receiver_id } => {
                vec![Conversation(Some(receiver_id)), Contacts]
            }
            Mutation::MarkRead | Mutation::OpenConversation => vec![Contacts],
        };
        Invalidation::Keys(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(m: Mutation) -> Vec<QueryKey> {
        match m.invalidates() {
            Invalidation::Keys(keys) => keys,
            Invalidation::Everything => panic!("{m:?} clears everything"),
        }
    }

    #[test]
    fn session_changes_clear_everything() {
        for m in [Mutation::Login, Mutation::Register, Mutation::Logout] {
            assert_eq!(m.invalidates(), Invalidation::Everything);
        }
    }

    #[test]
    fn reviewing_a_log_refreshes_every_student_view() {
        let stale = keys(Mutation::UpdateFlightLogStatus);
        assert!(stale.contains(&QueryKey::StudentFlightLogs(None)));
        assert!(stale.contains(&QueryKey::InstructorDashboard));
        assert!(stale.contains(&QueryKey::InstructorStudents));
        assert!(!stale.contains(&QueryKey::Contacts));
    }

    #[test]
    fn new_flight_log_refreshes_instructor_views() {
        let stale = keys(Mutation::CreateFlightLog);
        for key in [
            QueryKey::FlightLogs,
            QueryKey::StudentDashboard,
            QueryKey::StudentFlightLogs(None),
            QueryKey::InstructorDashboard,
            QueryKey::InstructorStudents,
        ] {
            assert!(stale.contains(&key), "{key:?}");
        }
    }

    #[test]
    fn new_booking_refreshes_instructor_views() {
        let stale = keys(Mutation::CreateBooking);
        for key in [
            QueryKey::StudentBookings,
            QueryKey::StudentDashboard,
            QueryKey::InstructorBookings,
            QueryKey::InstructorDashboard,
            QueryKey::InstructorStudents,
        ] {
            assert!(stale.contains(&key), "{key:?}");
        }
    }

    #[test]
    fn new_milestone_targets_its_student() {
        let stale = keys(Mutation::CreateMilestone { student_id: 3 });
        assert!(stale.contains(&QueryKey::StudentMilestones(Some(3))));
        assert!(!stale.contains(&QueryKey::StudentMilestones(None)));
    }

    #[test]
    fn messaging_touches_only_conversations() {
        let stale = keys(Mutation::SendMessage { receiver_id: 1 });
        assert_eq!(stale, vec![QueryKey::Conversation(Some(1)), QueryKey::Contacts]);
        assert_eq!(keys(Mutation::MarkRead), vec![QueryKey::Contacts]);
    }
}
