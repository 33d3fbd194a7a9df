//! Response cache for read queries.
//!
//! Entries are stored as raw JSON under a [`QueryKey`] and decoded on the
//! way out. Parameterised keys use `None` as a wildcard when invalidating:
//! dropping `Conversation(None)` drops every conversation.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

use cadet_shared::Id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Me,
    Instructors,
    Aircraft,
    StudentBookings,
    InstructorBookings,
    /// The caller's own flight logs.
    FlightLogs,
    /// One student's logs, as seen by an instructor.
    StudentFlightLogs(Option<Id>),
    Milestones,
    StudentMilestones(Option<Id>),
    StudentDashboard,
    InstructorDashboard,
    InstructorStudents,
    Contacts,
    Conversation(Option<Id>),
}

impl QueryKey {
    /// Route the query is fetched from. Wildcard keys map to the route's
    /// parent path.
    pub fn path(&self) -> String {
        fn with_id(base: &str, id: Option<Id>) -> String {
            match id {
                Some(id) => format!("{base}/{id}"),
                None => base.to_string(),
            }
        }

        match self {
            QueryKey::Me => "/api/auth/me".into(),
            QueryKey::Instructors => "/api/users/instructors".into(),
            QueryKey::Aircraft => "/api/aircraft".into(),
            QueryKey::StudentBookings => "/api/bookings/student".into(),
            QueryKey::InstructorBookings => "/api/bookings/instructor".into(),
            QueryKey::FlightLogs => "/api/flightlogs".into(),
            QueryKey::StudentFlightLogs(id) => with_id("/api/flightlogs/student", *id),
            QueryKey::Milestones => "/api/milestones".into(),
            QueryKey::StudentMilestones(id) => with_id("/api/milestones/student", *id),
            QueryKey::StudentDashboard => "/api/dashboard/student".into(),
            QueryKey::InstructorDashboard => "/api/dashboard/instructor".into(),
            QueryKey::InstructorStudents => "/api/instructor/students".into(),
            QueryKey::Contacts => "/api/messages/contacts".into(),
            QueryKey::Conversation(id) => with_id("/api/messages", *id),
        }
    }

    /// Whether invalidating `self` should drop the entry stored under `other`.
    pub fn covers(&self, other: &QueryKey) -> bool {
        match (self, other) {
            (QueryKey::StudentFlightLogs(None), QueryKey::StudentFlightLogs(_))
            | (QueryKey::StudentMilestones(None), QueryKey::StudentMilestones(_))
            | (QueryKey::Conversation(None), QueryKey::Conversation(_)) => true,
            _ => self == other,
        }
    }
}

/// Shared cache of decoded-on-read JSON responses.
#[derive(Clone, Default)]
pub struct QueryCache {
    entries: Arc<RwLock<HashMap<QueryKey, serde_json::Value>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value for `key`. An entry that no longer decodes as `T` is
    /// treated as a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let entries = self.entries.read().await;
        let value = entries.get(key)?.clone();
        serde_json::from_value(value).ok()
    }

    pub async fn insert<T: Serialize>(&self, key: QueryKey, value: &T) {
        match serde_json::to_value(value) {
            Ok(json) => {
                self.entries.write().await.insert(key, json);
            }
            Err(e) => debug!(?key, error = %e, "Not caching unserializable response"),
        }
    }

    /// Drop every entry covered by `key`. Returns how many were removed.
    pub async fn invalidate(&self, key: &QueryKey) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|stored, _| !key.covers(stored));
        before - entries.len()
    }

    pub async fn invalidate_all(&self, keys: &[QueryKey]) -> usize {
        let mut removed = 0;
        for key in keys {
            removed += self.invalidate(key).await;
        }
        if removed > 0 {
            debug!(removed, "Invalidated cached queries");
        }
        removed
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn contains(&self, key: &QueryKey) -> bool {
        self.entries.read().await.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
