//! The [`Store`] handle.
//!
//! A `Store` is an ordinary value: build one per process (or per test) and
//! share it behind a lock. There is no global instance.

use chrono::{DateTime, Utc};

use cadet_shared::{
    Aircraft, Booking, FlightLog, Id, Message, Milestone, Role, Transition, User,
};

use crate::error::{Result, StoreError};
use crate::seed;
use crate::table::Table;

/// In-memory tables for every entity.
#[derive(Debug, Clone, Default)]
pub struct Store {
    pub(crate) users: Table<User>,
    pub(crate) aircraft: Table<Aircraft>,
    pub(crate) bookings: Table<Booking>,
    pub(crate) flight_logs: Table<FlightLog>,
    pub(crate) milestones: Table<Milestone>,
    pub(crate) messages: Table<Message>,
}

impl Store {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with the demo school. Relative dates (upcoming
    /// bookings, recent messages) are computed from `now`.
    pub fn with_demo_data(now: DateTime<Utc>) -> Result<Self> {
        let mut store = Self::new();
        seed::populate(&mut store, now)?;
        tracing::info!(
            users = store.users.len(),
            aircraft = store.aircraft.len(),
            bookings = store.bookings.len(),
            flight_logs = store.flight_logs.len(),
            milestones = store.milestones.len(),
            messages = store.messages.len(),
            "demo data initialized"
        );
        Ok(store)
    }

    /// Check that `id` names an existing user, optionally with a given role.
    pub(crate) fn check_user(&self, field: &'static str, id: Id, role: Option<Role>) -> Result<()> {
        match self.users.get(id) {
            Some(user) if role.map_or(true, |r| user.role == r) => Ok(()),
            _ => Err(StoreError::InvalidReference { field, id }),
        }
    }

    pub(crate) fn check_aircraft(&self, id: Id) -> Result<()> {
        if self.aircraft.contains(id) {
            Ok(())
        } else {
            Err(StoreError::InvalidReference {
                field: "aircraftId",
                id,
            })
        }
    }
}

/// Apply a status change, refusing it in strict mode when the transition
/// table does not allow it.
pub(crate) fn transition<S: Transition>(current: &mut S, next: S, strict: bool) -> Result<()> {
    if strict && !current.can_transition_to(next) {
        return Err(StoreError::InvalidTransition {
            from: current.as_str(),
            to: next.as_str(),
        });
    }
    *current = next;
    Ok(())
}
