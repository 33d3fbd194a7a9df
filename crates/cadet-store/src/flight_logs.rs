use cadet_shared::{
    FlightLog, FlightLogStatus, Id, NewFlightLog, Role, Transition, Validate, ValidationError,
};

use crate::error::{Result, StoreError};
use crate::store::{transition, Store};

impl Store {
    /// Store a flight log claimed by a student. Status defaults to `pending`.
    pub fn create_flight_log(&mut self, new: NewFlightLog) -> Result<FlightLog> {
        new.validate()?;
        let student_id = new
            .student_id
            .ok_or_else(|| ValidationError::new("studentId", "Required"))?;
        self.check_user("studentId", student_id, Some(Role::Student))?;
        if let Some(instructor_id) = new.instructor_id {
            self.check_user("instructorId", instructor_id, Some(Role::Instructor))?;
        }
        self.check_aircraft(new.aircraft_id)?;

        let log = self
            .flight_logs
            .insert_with(|id| FlightLog {
                id,
                student_id,
                instructor_id: new.instructor_id,
                aircraft_id: new.aircraft_id,
                date: new.date,
                duration: new.duration,
                departure_airport: new.departure_airport,
                destination_airport: new.destination_airport,
                return_airport: new.return_airport,
                flight_type: new.flight_type,
                notes: new.notes,
                status: new.status.unwrap_or_default(),
            })
            .clone();

        tracing::debug!(id = log.id, student = student_id, hours = log.duration, "flight log created");
        Ok(log)
    }

    pub fn get_flight_log(&self, id: Id) -> Option<&FlightLog> {
        self.flight_logs.get(id)
    }

    /// A student's logs, most recent flight first.
    pub fn flight_logs_by_student(&self, student_id: Id) -> Vec<&FlightLog> {
        let mut logs: Vec<_> = self
            .flight_logs
            .values()
            .filter(|log| log.student_id == student_id)
            .collect();
        logs.sort_by(|a, b| b.date.cmp(&a.date));
        logs
    }

    pub fn recent_flight_logs_by_student(&self, student_id: Id, limit: usize) -> Vec<&FlightLog> {
        let mut logs = self.flight_logs_by_student(student_id);
        logs.truncate(limit);
        logs
    }

    /// Set a log's review status. The reviewing instructor, when given,
    /// replaces the log's instructor; otherwise the existing one is kept.
    pub fn update_flight_log_status(
        &mut self,
        id: Id,
        status: FlightLogStatus,
        reviewer: Option<Id>,
        strict: bool,
    ) -> Result<FlightLog> {
        let log = self
            .flight_logs
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("Flight log", id))?;
        transition(&mut log.status, status, strict)?;
        if reviewer.is_some() {
            log.instructor_id = reviewer;
        }

        tracing::debug!(id, status = status.as_str(), ?reviewer, "flight log status updated");
        Ok(log.clone())
    }
}
