use cadet_shared::{
    Booking, BookingStatus, Id, NewBooking, Role, Transition, Validate, ValidationError,
};

use crate::error::{Result, StoreError};
use crate::store::{transition, Store};

impl Store {
    /// Store a booking request. Status defaults to `pending`.
    pub fn create_booking(&mut self, new: NewBooking) -> Result<Booking> {
        new.validate()?;
        let student_id = new
            .student_id
            .ok_or_else(|| ValidationError::new("studentId", "Required"))?;
        self.check_user("studentId", student_id, Some(Role::Student))?;
        if let Some(instructor_id) = new.instructor_id {
            self.check_user("instructorId", instructor_id, Some(Role::Instructor))?;
        }
        if let Some(aircraft_id) = new.aircraft_id {
            self.check_aircraft(aircraft_id)?;
        }

        let booking = self
            .bookings
            .insert_with(|id| Booking {
                id,
                student_id,
                instructor_id: new.instructor_id,
                start_time: new.start_time,
                end_time: new.end_time,
                training_type: new.training_type,
                aircraft_id: new.aircraft_id,
                status: new.status.unwrap_or_default(),
                notes: new.notes,
            })
            .clone();

        tracing::debug!(id = booking.id, student = student_id, "booking created");
        Ok(booking)
    }

    pub fn get_booking(&self, id: Id) -> Option<&Booking> {
        self.bookings.get(id)
    }

    /// A student's bookings, earliest start first.
    pub fn bookings_by_student(&self, student_id: Id) -> Vec<&Booking> {
        let mut bookings: Vec<_> = self
            .bookings
            .values()
            .filter(|b| b.student_id == student_id)
            .collect();
        bookings.sort_by_key(|b| b.start_time);
        bookings
    }

    /// An instructor's bookings, earliest start first.
    pub fn bookings_by_instructor(&self, instructor_id: Id) -> Vec<&Booking> {
        let mut bookings: Vec<_> = self
            .bookings
            .values()
            .filter(|b| b.instructor_id == Some(instructor_id))
            .collect();
        bookings.sort_by_key(|b| b.start_time);
        bookings
    }

    pub fn update_booking_status(
        &mut self,
        id: Id,
        status: BookingStatus,
        strict: bool,
    ) -> Result<Booking> {
        let booking = self
            .bookings
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("Booking", id))?;
        transition(&mut booking.status, status, strict)?;

        tracing::debug!(id, status = status.as_str(), "booking status updated");
        Ok(booking.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{self, at};

    #[test]
    fn create_then_fetch_round_trips() {
        let mut store = Store::new();
        let sarah = testutil::instructor(&mut store, "sarah");
        let alex = testutil::student(&mut store, "alex");
        let plane = testutil::aircraft(&mut store, "N5434G");

        let mut new = testutil::new_booking(alex, Some(sarah), at(2030, 6, 1, 14));
        new.aircraft_id = Some(plane);
        new.notes = Some("Traffic Pattern Practice".into());

        let created = store.create_booking(new.clone()).unwrap();
        let fetched = store.get_booking(created.id).unwrap();

        assert_eq!(fetched, &created);
        assert_eq!(fetched.id, 1);
        assert_eq!(fetched.status, BookingStatus::Pending);
        assert_eq!(fetched.student_id, alex);
        assert_eq!(fetched.instructor_id, new.instructor_id);
        assert_eq!(fetched.start_time, new.start_time);
        assert_eq!(fetched.end_time, new.end_time);
        assert_eq!(fetched.training_type, new.training_type);
        assert_eq!(fetched.aircraft_id, new.aircraft_id);
        assert_eq!(fetched.notes, new.notes);
    }

    #[test]
    fn explicit_status_is_kept() {
        let mut store = Store::new();
        let alex = testutil::student(&mut store, "alex");
        let mut new = testutil::new_booking(alex, None, at(2030, 6, 1, 14));
        new.status = Some(BookingStatus::Confirmed);
        assert_eq!(store.create_booking(new).unwrap().status, BookingStatus::Confirmed);
    }

    #[test]
    fn references_are_checked() {
        let mut store = Store::new();
        let sarah = testutil::instructor(&mut store, "sarah");
        let alex = testutil::student(&mut store, "alex");

        let unknown_student = testutil::new_booking(99, None, at(2030, 6, 1, 14));
        assert!(matches!(
            store.create_booking(unknown_student),
            Err(StoreError::InvalidReference { field: "studentId", id: 99 })
        ));

        // An instructor cannot be booked as the student and vice versa.
        let swapped = testutil::new_booking(sarah, Some(alex), at(2030, 6, 1, 14));
        assert!(matches!(
            store.create_booking(swapped),
            Err(StoreError::InvalidReference { .. })
        ));

        let mut no_plane = testutil::new_booking(alex, Some(sarah), at(2030, 6, 1, 14));
        no_plane.aircraft_id = Some(7);
        assert!(matches!(
            store.create_booking(no_plane),
            Err(StoreError::InvalidReference { field: "aircraftId", id: 7 })
        ));

        let mut no_student = testutil::new_booking(alex, None, at(2030, 6, 1, 14));
        no_student.student_id = None;
        assert!(matches!(
            store.create_booking(no_student),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn listings_sort_by_start_time() {
        let mut store = Store::new();
        let sarah = testutil::instructor(&mut store, "sarah");
        let alex = testutil::student(&mut store, "alex");
        let late = testutil::booking(&mut store, alex, Some(sarah), at(2030, 6, 3, 9));
        let early = testutil::booking(&mut store, alex, Some(sarah), at(2030, 6, 1, 9));
        let solo = testutil::booking(&mut store, alex, None, at(2030, 6, 2, 9));

        let ids: Vec<Id> = store.bookings_by_student(alex).iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![early, solo, late]);

        let ids: Vec<Id> = store.bookings_by_instructor(sarah).iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![early, late]);
    }

    #[test]
    fn update_status_of_missing_booking_is_not_found() {
        let mut store = Store::new();
        let err = store
            .update_booking_status(42, BookingStatus::Confirmed, false)
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "Booking", id: 42 }));
    }

    #[test]
    fn strict_mode_blocks_reopening_a_cancelled_booking() {
        let mut store = Store::new();
        let alex = testutil::student(&mut store, "alex");
        let id = testutil::booking(&mut store, alex, None, at(2030, 6, 1, 9));

        store.update_booking_status(id, BookingStatus::Cancelled, true).unwrap();
        assert!(store.update_booking_status(id, BookingStatus::Pending, true).is_err());
        assert_eq!(store.get_booking(id).unwrap().status, BookingStatus::Cancelled);

        // Lenient mode accepts any value of the enum.
        let reopened = store.update_booking_status(id, BookingStatus::Pending, false).unwrap();
        assert_eq!(reopened.status, BookingStatus::Pending);
    }
}
