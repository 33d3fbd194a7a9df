//! Fixtures shared by the store tests.

use chrono::{DateTime, Duration, TimeZone, Utc};

use cadet_shared::{FlightType, Id, NewAircraft, NewBooking, NewFlightLog, NewUser, Role};

use crate::store::Store;

pub fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
}

fn user(store: &mut Store, username: &str, role: Role) -> Id {
    let new = NewUser {
        username: username.into(),
        password: String::new(),
        email: format!("{username}@example.com"),
        first_name: username.into(),
        last_name: "Test".into(),
        role,
        profile_image: None,
    };
    // Skips Argon2 so tests stay fast; these users never log in.
    store.insert_user(new, "not-a-hash".into()).id
}

pub fn instructor(store: &mut Store, username: &str) -> Id {
    user(store, username, Role::Instructor)
}

pub fn student(store: &mut Store, username: &str) -> Id {
    user(store, username, Role::Student)
}

pub fn aircraft(store: &mut Store, tail: &str) -> Id {
    store
        .create_aircraft(NewAircraft {
            tail_number: tail.into(),
            aircraft_type: "Cessna 172".into(),
            model: "Skyhawk".into(),
        })
        .unwrap()
        .id
}

pub fn new_log(student: Id, instructor: Option<Id>, aircraft: Id, duration: f64) -> NewFlightLog {
    NewFlightLog {
        student_id: Some(student),
        instructor_id: instructor,
        aircraft_id: aircraft,
        date: at(2023, 5, 10, 12),
        duration,
        departure_airport: "KBOS".into(),
        destination_airport: "KPVD".into(),
        return_airport: Some("KBOS".into()),
        flight_type: FlightType::Dual,
        notes: None,
        status: None,
    }
}

pub fn log(store: &mut Store, student: Id, instructor: Option<Id>, aircraft: Id, duration: f64) -> Id {
    store
        .create_flight_log(new_log(student, instructor, aircraft, duration))
        .unwrap()
        .id
}

pub fn new_booking(student: Id, instructor: Option<Id>, start: DateTime<Utc>) -> NewBooking {
    NewBooking {
        student_id: Some(student),
        instructor_id: instructor,
        start_time: start,
        end_time: start + Duration::hours(2),
        training_type: "pattern".into(),
        aircraft_id: None,
        status: None,
        notes: None,
    }
}

pub fn booking(store: &mut Store, student: Id, instructor: Option<Id>, start: DateTime<Utc>) -> Id {
    store
        .create_booking(new_booking(student, instructor, start))
        .unwrap()
        .id
}
