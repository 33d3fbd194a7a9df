//! Per-role dashboard aggregates, derived from the raw records on every call.

use chrono::{DateTime, Duration, Utc};

use cadet_shared::constants::{
    PENDING_BOOKINGS_LIMIT, PENDING_LOGS_LIMIT, RECENT_LOGS_LIMIT, UPCOMING_BOOKINGS_LIMIT,
};
use cadet_shared::{
    BookingStatus, FlightLog, FlightLogStatus, FlightType, Id, InstructorDashboard,
    StudentDashboard,
};

use crate::store::Store;

fn hours<'a>(logs: impl Iterator<Item = &'a FlightLog>) -> f64 {
    logs.map(|log| log.duration).sum()
}

impl Store {
    /// Totals count every log regardless of review status.
    pub fn student_dashboard(&self, student_id: Id, now: DateTime<Utc>) -> StudentDashboard {
        let logs = self.flight_logs_by_student(student_id);
        let of_type = |kind: FlightType| logs.iter().copied().filter(move |l| l.flight_type == kind);

        let upcoming_bookings = self
            .bookings_by_student(student_id)
            .into_iter()
            .filter(|b| b.start_time > now)
            .take(UPCOMING_BOOKINGS_LIMIT)
            .cloned()
            .collect();

        StudentDashboard {
            total_hours: hours(logs.iter().copied()),
            solo_hours: hours(of_type(FlightType::Solo)),
            cross_country_hours: hours(of_type(FlightType::CrossCountry)),
            upcoming_bookings,
            milestones: self
                .milestones_by_student(student_id)
                .into_iter()
                .cloned()
                .collect(),
            recent_logs: logs.iter().take(RECENT_LOGS_LIMIT).map(|&l| l.clone()).collect(),
        }
    }

    /// "Today" is the UTC calendar day containing `now`.
    pub fn instructor_dashboard(&self, instructor_id: Id, now: DateTime<Utc>) -> InstructorDashboard {
        let today = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|midnight| midnight.and_utc())
            .unwrap_or(now);
        let tomorrow = today + Duration::days(1);

        // Insertion order, not start time.
        let pending_bookings = self
            .bookings
            .values()
            .filter(|b| b.instructor_id == Some(instructor_id) && b.status == BookingStatus::Pending)
            .take(PENDING_BOOKINGS_LIMIT)
            .cloned()
            .collect();

        let today_bookings = self
            .bookings_by_instructor(instructor_id)
            .into_iter()
            .filter(|b| b.start_time >= today && b.start_time < tomorrow)
            .cloned()
            .collect();

        let pending_logs = self
            .flight_logs
            .values()
            .filter(|l| l.instructor_id == Some(instructor_id) && l.status == FlightLogStatus::Pending)
            .take(PENDING_LOGS_LIMIT)
            .cloned()
            .collect();

        InstructorDashboard {
            total_students: self.students_by_instructor(instructor_id).len(),
            pending_bookings,
            today_bookings,
            pending_logs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{self, at};

    #[test]
    fn hour_totals_cover_every_log_of_the_student() {
        let mut store = Store::new();
        let sarah = testutil::instructor(&mut store, "sarah");
        let alex = testutil::student(&mut store, "alex");
        let jamie = testutil::student(&mut store, "jamie");
        let plane = testutil::aircraft(&mut store, "N5434G");

        let flights = [
            (FlightType::Dual, 2.3, FlightLogStatus::Approved),
            (FlightType::Solo, 1.5, FlightLogStatus::Approved),
            (FlightType::CrossCountry, 4.5, FlightLogStatus::Rejected),
            (FlightType::Solo, 1.7, FlightLogStatus::Pending),
        ];
        for (kind, duration, status) in flights {
            let mut new = testutil::new_log(alex, Some(sarah), plane, duration);
            new.flight_type = kind;
            new.status = Some(status);
            store.create_flight_log(new).unwrap();
        }
        // Another student's hours never leak in.
        testutil::log(&mut store, jamie, Some(sarah), plane, 9.0);

        let dash = store.student_dashboard(alex, at(2023, 6, 1, 0));
        assert!((dash.total_hours - 10.0).abs() < 1e-9);
        assert!((dash.solo_hours - 3.2).abs() < 1e-9);
        assert!((dash.cross_country_hours - 4.5).abs() < 1e-9);
        assert!(dash.solo_hours + dash.cross_country_hours <= dash.total_hours);
        assert_eq!(dash.recent_logs.len(), 3);
    }

    #[test]
    fn solo_log_increases_totals_exactly() {
        let mut store = Store::new();
        let alex = testutil::student(&mut store, "alex");
        let plane = testutil::aircraft(&mut store, "N5434G");
        testutil::log(&mut store, alex, None, plane, 1.2);
        let now = at(2023, 6, 1, 0);
        let before = store.student_dashboard(alex, now);

        let mut new = testutil::new_log(alex, None, plane, 2.5);
        new.flight_type = FlightType::Solo;
        store.create_flight_log(new).unwrap();

        let after = store.student_dashboard(alex, now);
        assert!(after.solo_hours >= 2.5);
        assert!((after.total_hours - before.total_hours - 2.5).abs() < 1e-9);
    }

    #[test]
    fn upcoming_bookings_are_future_sorted_and_capped() {
        let mut store = Store::new();
        let alex = testutil::student(&mut store, "alex");
        let now = at(2030, 6, 10, 12);

        let past = testutil::booking(&mut store, alex, None, at(2030, 6, 9, 12));
        let exactly_now = testutil::booking(&mut store, alex, None, now);
        let d4 = testutil::booking(&mut store, alex, None, at(2030, 6, 14, 9));
        let d1 = testutil::booking(&mut store, alex, None, at(2030, 6, 11, 9));
        let d3 = testutil::booking(&mut store, alex, None, at(2030, 6, 13, 9));
        let d2 = testutil::booking(&mut store, alex, None, at(2030, 6, 12, 9));

        let dash = store.student_dashboard(alex, now);
        let ids: Vec<Id> = dash.upcoming_bookings.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![d1, d2, d3]);
        assert!(!ids.contains(&past));
        assert!(!ids.contains(&exactly_now));
        assert!(!ids.contains(&d4));
        assert!(dash.upcoming_bookings.iter().all(|b| b.start_time > now));
    }

    #[test]
    fn instructor_dashboard_today_and_pending() {
        let mut store = Store::new();
        let sarah = testutil::instructor(&mut store, "sarah");
        let michael = testutil::instructor(&mut store, "michael");
        let alex = testutil::student(&mut store, "alex");
        let jamie = testutil::student(&mut store, "jamie");
        let plane = testutil::aircraft(&mut store, "N5434G");
        let now = at(2030, 6, 10, 8);

        let late_today = testutil::booking(&mut store, alex, Some(sarah), at(2030, 6, 10, 16));
        let early_today = testutil::booking(&mut store, jamie, Some(sarah), at(2030, 6, 10, 0));
        let tomorrow = testutil::booking(&mut store, alex, Some(sarah), at(2030, 6, 11, 0));
        testutil::booking(&mut store, alex, Some(michael), at(2030, 6, 10, 9));
        store
            .update_booking_status(late_today, BookingStatus::Confirmed, false)
            .unwrap();

        for _ in 0..6 {
            testutil::log(&mut store, alex, Some(sarah), plane, 1.0);
        }
        testutil::log(&mut store, alex, Some(michael), plane, 1.0);

        let dash = store.instructor_dashboard(sarah, now);
        assert_eq!(dash.total_students, 2);

        let today: Vec<Id> = dash.today_bookings.iter().map(|b| b.id).collect();
        assert_eq!(today, vec![early_today, late_today]);

        let pending: Vec<Id> = dash.pending_bookings.iter().map(|b| b.id).collect();
        assert_eq!(pending, vec![early_today, tomorrow]);

        assert_eq!(dash.pending_logs.len(), PENDING_LOGS_LIMIT);
        assert!(dash.pending_logs.iter().all(|l| l.instructor_id == Some(sarah)));
    }

    #[test]
    fn pending_bookings_keep_insertion_order() {
        let mut store = Store::new();
        let sarah = testutil::instructor(&mut store, "sarah");
        let alex = testutil::student(&mut store, "alex");
        let ids: Vec<Id> = (0..7)
            .map(|i| testutil::booking(&mut store, alex, Some(sarah), at(2030, 7, 20 - i, 9)))
            .collect();

        let dash = store.instructor_dashboard(sarah, at(2030, 6, 1, 0));
        let pending: Vec<Id> = dash.pending_bookings.iter().map(|b| b.id).collect();
        assert_eq!(pending, ids[..PENDING_BOOKINGS_LIMIT].to_vec());
    }
}
