//! Demo school used when the server starts with seeding enabled.

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};

use cadet_shared::{
    BookingStatus, FlightLogStatus, FlightType, Id, MilestoneStatus, NewAircraft, NewBooking,
    NewFlightLog, NewMessage, NewMilestone, NewUser, Role,
};

use crate::error::Result;
use crate::password::hash_password;
use crate::store::Store;

/// Password shared by every demo account.
pub const DEMO_PASSWORD: &str = "password123";

fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// `now` shifted by whole days, at a fixed wall-clock time (UTC).
fn days_from(now: DateTime<Utc>, days: i64, hour: u32, minute: u32) -> DateTime<Utc> {
    let date = (now + Duration::days(days)).date_naive();
    let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);
    date.and_time(time).and_utc()
}

fn demo_user(username: &str, email: &str, first: &str, last: &str, role: Role) -> NewUser {
    NewUser {
        username: username.into(),
        password: DEMO_PASSWORD.into(),
        email: email.into(),
        first_name: first.into(),
        last_name: last.into(),
        role,
        profile_image: None,
    }
}

pub(crate) fn populate(store: &mut Store, now: DateTime<Utc>) -> Result<()> {
    // One hash for all demo accounts keeps startup fast.
    let hash = hash_password(DEMO_PASSWORD)?;

    let sarah = store
        .insert_user(
            demo_user("sarahmiller", "sarah.miller@example.com", "Sarah", "Miller", Role::Instructor),
            hash.clone(),
        )
        .id;
    let michael = store
        .insert_user(
            demo_user("michaelchen", "michael.chen@example.com", "Michael", "Chen", Role::Instructor),
            hash.clone(),
        )
        .id;
    let alex = store
        .insert_user(
            demo_user("alexjohnson", "alex.j@example.com", "Alex", "Johnson", Role::Student),
            hash,
        )
        .id;

    let fleet = [
        ("N5434G", "Cessna 172", "Skyhawk"),
        ("N7711L", "Cessna 152", "Aerobat"),
        ("N2234A", "Piper PA-28", "Archer"),
    ];
    let mut aircraft = Vec::with_capacity(fleet.len());
    for (tail, kind, model) in fleet {
        let plane = store.create_aircraft(NewAircraft {
            tail_number: tail.into(),
            aircraft_type: kind.into(),
            model: model.into(),
        })?;
        aircraft.push(plane.id);
    }
    let (skyhawk, aerobat, archer) = (aircraft[0], aircraft[1], aircraft[2]);

    seed_milestones(store, alex, sarah, michael, now)?;
    seed_flight_logs(store, alex, sarah, michael, [skyhawk, aerobat, archer], now)?;
    seed_bookings(store, alex, sarah, michael, [skyhawk, aerobat], now)?;
    seed_messages(store, alex, sarah, michael, now)?;
    Ok(())
}

fn seed_milestones(store: &mut Store, alex: Id, sarah: Id, michael: Id, now: DateTime<Utc>) -> Result<()> {
    let milestones = [
        ("First Solo Flight", "Complete first solo flight", 20.0, MilestoneStatus::Completed, 100.0, Some((day(2023, 3, 15), sarah))),
        ("Night Flying Proficiency", "Complete night flying training", 10.0, MilestoneStatus::Completed, 100.0, Some((day(2023, 4, 2), michael))),
        ("First Cross-Country Solo", "Complete first cross-country solo flight", 20.0, MilestoneStatus::InProgress, 61.0, None),
        ("Instrument Rating", "Complete instrument rating training", 40.0, MilestoneStatus::NotStarted, 0.0, None),
    ];

    for (title, description, hours, status, progress, sign_off) in milestones {
        store.create_milestone(
            NewMilestone {
                student_id: alex,
                title: title.into(),
                description: Some(description.into()),
                required_hours: Some(hours),
                status: Some(status),
                completion_date: sign_off.map(|(date, _)| date),
                approved_by: sign_off.map(|(_, by)| by),
                progress: Some(progress),
            },
            now,
        )?;
    }
    Ok(())
}

fn seed_flight_logs(
    store: &mut Store,
    alex: Id,
    sarah: Id,
    michael: Id,
    [skyhawk, aerobat, archer]: [Id; 3],
    now: DateTime<Utc>,
) -> Result<()> {
    use FlightType::*;

    let logs = [
        (Some(sarah), skyhawk, day(2023, 5, 10), 2.3, "KPVD", Some("KBOS"), Dual, None),
        (None, skyhawk, day(2023, 5, 5), 1.5, "Local", None, Solo, None),
        (Some(michael), aerobat, day(2023, 5, 2), 3.0, "KASH", Some("KBOS"), Dual, None),
        (Some(sarah), archer, day(2023, 4, 28), 4.5, "KBDL", Some("KBOS"), CrossCountry, None),
        (Some(sarah), skyhawk, day(2023, 4, 20), 2.0, "Local", None, Dual, Some("Night flying practice")),
        (None, skyhawk, day(2023, 4, 15), 2.2, "KBED", Some("KBOS"), Solo, None),
        (Some(michael), aerobat, day(2023, 4, 10), 3.5, "KMHT", Some("KBOS"), CrossCountry, None),
        (Some(sarah), skyhawk, day(2023, 4, 5), 1.8, "Local", None, Dual, Some("Emergency procedures practice")),
    ];

    for (instructor, plane, date, duration, destination, back, kind, notes) in logs {
        store.create_flight_log(NewFlightLog {
            student_id: Some(alex),
            instructor_id: instructor,
            aircraft_id: plane,
            date,
            duration,
            departure_airport: "KBOS".into(),
            destination_airport: destination.into(),
            return_airport: back.map(Into::into),
            flight_type: kind,
            notes: notes.map(Into::into),
            status: Some(FlightLogStatus::Approved),
        })?;
    }

    // Awaiting review.
    store.create_flight_log(NewFlightLog {
        student_id: Some(alex),
        instructor_id: None,
        aircraft_id: skyhawk,
        date: now,
        duration: 1.7,
        departure_airport: "KBOS".into(),
        destination_airport: "KBED".into(),
        return_airport: Some("KBOS".into()),
        flight_type: Solo,
        notes: Some("Pattern work and landings".into()),
        status: Some(FlightLogStatus::Pending),
    })?;
    Ok(())
}

fn seed_bookings(
    store: &mut Store,
    alex: Id,
    sarah: Id,
    michael: Id,
    [skyhawk, aerobat]: [Id; 2],
    now: DateTime<Utc>,
) -> Result<()> {
    use BookingStatus::*;

    let bookings = [
        (sarah, 1, (14, 0), (16, 0), "pattern", skyhawk, Confirmed, "Traffic Pattern Practice"),
        (michael, 2, (10, 0), (12, 0), "maneuvers", aerobat, Confirmed, "Slow Flight and Stall Practice"),
        (sarah, 7, (9, 0), (12, 0), "navigation", skyhawk, Confirmed, "VOR Navigation Practice"),
        (michael, 14, (9, 0), (13, 0), "cross-country", skyhawk, Confirmed, "Cross-Country Flight"),
        (sarah, 21, (15, 30), (17, 30), "instrument", skyhawk, Confirmed, "Instrument Training"),
        (sarah, 30, (13, 0), (15, 0), "checkride-prep", skyhawk, Pending, "Checkride Preparation"),
    ];

    for (instructor, offset, (sh, sm), (eh, em), training, plane, status, notes) in bookings {
        store.create_booking(NewBooking {
            student_id: Some(alex),
            instructor_id: Some(instructor),
            start_time: days_from(now, offset, sh, sm),
            end_time: days_from(now, offset, eh, em),
            training_type: training.into(),
            aircraft_id: Some(plane),
            status: Some(status),
            notes: Some(notes.into()),
        })?;
    }
    Ok(())
}

fn seed_messages(store: &mut Store, alex: Id, sarah: Id, michael: Id, now: DateTime<Utc>) -> Result<()> {
    let messages = [
        (sarah, alex, 25, true, "Hi Alex, just confirming our flight tomorrow at 2PM. Please arrive 30 minutes early for preflight."),
        (alex, sarah, 24, true, "Thanks for the reminder, Sarah! I'll be there at 1:30PM."),
        (sarah, alex, 23, true, "Great! Don't forget to bring your logbook and flight plan. We'll be focusing on pattern work."),
        (michael, alex, 10, false, "Hello Alex, I've reviewed your latest flight log. Good job on the cross-country navigation!"),
    ];

    for (from, to, hours_ago, read, content) in messages {
        let message = store.create_message(
            NewMessage {
                receiver_id: Some(to),
                content: Some(content.into()),
            },
            from,
            now - Duration::hours(hours_ago),
        )?;
        if read {
            if let Some(stored) = store.messages.get_mut(message.id) {
                stored.is_read = true;
            }
        }
    }
    Ok(())
}
