//! [`ApiClient`]: one typed method per server route.

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use cadet_shared::{
    Aircraft, Booking, BookingStatus, FlightLog, FlightLogStatus, Id, InstructorDashboard,
    LoginRequest, Message, MessageContact, Milestone, MilestoneStatus, NewBooking, NewFlightLog,
    NewMessage, NewMilestone, NewUser, ProgressUpdate, StatusUpdate, StudentDashboard, Transition,
    UserProfile, UserSummary,
};

use crate::cache::{QueryCache, QueryKey};
use crate::error::{ClientError, Result};
use crate::mutation::{Invalidation, Mutation};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Health {
    pub status: String,
    pub version: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Session-holding client. Cheap to clone; clones share the cookie jar and
/// the cache.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    cache: QueryCache,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache: QueryCache::new(),
        })
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // -----------------------------------------------------------------------
    // Plumbing
    // -----------------------------------------------------------------------

    async fn send<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut req = self.http.request(method.clone(), self.url(path));
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;
        debug!(%method, path, status = status.as_u16(), "API call");

        if !status.is_success() {
            return Err(api_error(status, &bytes));
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Cached GET.
    async fn query<T>(&self, key: QueryKey) -> Result<T>
    where
        T: DeserializeOwned + Serialize,
    {
        if let Some(hit) = self.cache.get(&key).await {
            return Ok(hit);
        }
        let value: T = self.send::<(), T>(Method::GET, &key.path(), None).await?;
        self.cache.insert(key, &value).await;
        Ok(value)
    }

    /// Run a write, then drop whatever it made stale.
    async fn mutate<B, T>(
        &self,
        mutation: Mutation,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let out = self.send(method, path, body).await?;
        self.apply(mutation).await;
        Ok(out)
    }

    async fn apply(&self, mutation: Mutation) {
        match mutation.invalidates() {
            Invalidation::Everything => self.cache.clear().await,
            Invalidation::Keys(keys) => {
                self.cache.invalidate_all(&keys).await;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Auth
    // -----------------------------------------------------------------------

    pub async fn health(&self) -> Result<Health> {
        self.send::<(), _>(Method::GET, "/health", None).await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<UserProfile> {
        let body = LoginRequest {
            username: Some(username.to_string()),
            password: Some(password.to_string()),
        };
        self.mutate(Mutation::Login, Method::POST, "/api/auth/login", Some(&body))
            .await
    }

    pub async fn register(&self, new: &NewUser) -> Result<UserProfile> {
        self.mutate(Mutation::Register, Method::POST, "/api/auth/register", Some(new))
            .await
    }

    pub async fn logout(&self) -> Result<()> {
        let _: serde_json::Value = self
            .mutate::<(), _>(Mutation::Logout, Method::POST, "/api/auth/logout", None)
            .await?;
        Ok(())
    }

    /// The logged-in user, or `None` when the session is gone.
    pub async fn me(&self) -> Result<Option<UserProfile>> {
        match self.query(QueryKey::Me).await {
            Ok(profile) => Ok(Some(profile)),
            Err(e) if e.is_unauthorized() => Ok(None),
            Err(e) => Err(e),
        }
    }

    // -----------------------------------------------------------------------
    // Directory
    // -----------------------------------------------------------------------

    pub async fn instructors(&self) -> Result<Vec<UserSummary>> {
        self.query(QueryKey::Instructors).await
    }

    pub async fn aircraft(&self) -> Result<Vec<Aircraft>> {
        self.query(QueryKey::Aircraft).await
    }

    pub async fn instructor_students(&self) -> Result<Vec<UserSummary>> {
        self.query(QueryKey::InstructorStudents).await
    }

    // -----------------------------------------------------------------------
    // Bookings
    // -----------------------------------------------------------------------

    pub async fn student_bookings(&self) -> Result<Vec<Booking>> {
        self.query(QueryKey::StudentBookings).await
    }

    pub async fn instructor_bookings(&self) -> Result<Vec<Booking>> {
        self.query(QueryKey::InstructorBookings).await
    }

    pub async fn create_booking(&self, new: &NewBooking) -> Result<Booking> {
        self.mutate(Mutation::CreateBooking, Method::POST, "/api/bookings", Some(new))
            .await
    }

    pub async fn update_booking_status(&self, id: Id, status: BookingStatus) -> Result<Booking> {
        let body = StatusUpdate {
            status: Some(status.as_str().to_string()),
        };
        self.mutate(
            Mutation::UpdateBookingStatus,
            Method::PATCH,
            &format!("/api/bookings/{id}/status"),
            Some(&body),
        )
        .await
    }

    // -----------------------------------------------------------------------
    // Flight logs
    // -----------------------------------------------------------------------

    pub async fn flight_logs(&self) -> Result<Vec<FlightLog>> {
        self.query(QueryKey::FlightLogs).await
    }

    pub async fn student_flight_logs(&self, student_id: Id) -> Result<Vec<FlightLog>> {
        self.query(QueryKey::StudentFlightLogs(Some(student_id))).await
    }

    pub async fn create_flight_log(&self, new: &NewFlightLog) -> Result<FlightLog> {
        self.mutate(Mutation::CreateFlightLog, Method::POST, "/api/flightlogs", Some(new))
            .await
    }

    pub async fn update_flight_log_status(
        &self,
        id: Id,
        status: FlightLogStatus,
    ) -> Result<FlightLog> {
        let body = StatusUpdate {
            status: Some(status.as_str().to_string()),
        };
        self.mutate(
            Mutation::UpdateFlightLogStatus,
            Method::PATCH,
            &format!("/api/flightlogs/{id}/status"),
            Some(&body),
        )
        .await
    }

    // -----------------------------------------------------------------------
    // Milestones
    // -----------------------------------------------------------------------

    pub async fn milestones(&self) -> Result<Vec<Milestone>> {
        self.query(QueryKey::Milestones).await
    }

    pub async fn student_milestones(&self, student_id: Id) -> Result<Vec<Milestone>> {
        self.query(QueryKey::StudentMilestones(Some(student_id))).await
    }

    pub async fn create_milestone(&self, new: &NewMilestone) -> Result<Milestone> {
        self.mutate(
            Mutation::CreateMilestone {
                student_id: new.student_id,
            },
            Method::POST,
            "/api/milestones",
            Some(new),
        )
        .await
    }

    pub async fn update_milestone_progress(
        &self,
        id: Id,
        progress: f64,
        status: Option<MilestoneStatus>,
    ) -> Result<Milestone> {
        let body = ProgressUpdate {
            progress: Some(progress),
            status: status.map(|s| s.as_str().to_string()),
        };
        self.mutate(
            Mutation::UpdateMilestoneProgress,
            Method::PATCH,
            &format!("/api/milestones/{id}/progress"),
            Some(&body),
        )
        .await
    }

    pub async fn complete_milestone(&self, id: Id) -> Result<Milestone> {
        self.mutate::<(), _>(
            Mutation::CompleteMilestone,
            Method::PATCH,
            &format!("/api/milestones/{id}/complete"),
            None,
        )
        .await
    }

    // -----------------------------------------------------------------------
    // Dashboards
    // -----------------------------------------------------------------------

    pub async fn student_dashboard(&self) -> Result<StudentDashboard> {
        self.query(QueryKey::StudentDashboard).await
    }

    pub async fn instructor_dashboard(&self) -> Result<InstructorDashboard> {
        self.query(QueryKey::InstructorDashboard).await
    }

    // -----------------------------------------------------------------------
    // Messages
    // -----------------------------------------------------------------------

    pub async fn contacts(&self) -> Result<Vec<MessageContact>> {
        self.query(QueryKey::Contacts).await
    }

    /// Always fetched fresh: opening a conversation marks it read.
    pub async fn conversation(&self, contact_id: Id) -> Result<Vec<Message>> {
        let key = QueryKey::Conversation(Some(contact_id));
        let messages: Vec<Message> = self.send::<(), _>(Method::GET, &key.path(), None).await?;
        self.cache.insert(key, &messages).await;
        self.apply(Mutation::OpenConversation).await;
        Ok(messages)
    }

    pub async fn send_message(&self, receiver_id: Id, content: &str) -> Result<Message> {
        let body = NewMessage {
            receiver_id: Some(receiver_id),
            content: Some(content.to_string()),
        };
        self.mutate(
            Mutation::SendMessage { receiver_id },
            Method::POST,
            "/api/messages",
            Some(&body),
        )
        .await
    }

    pub async fn mark_read(&self, sender_id: Id) -> Result<()> {
        let _: serde_json::Value = self
            .mutate::<(), _>(
                Mutation::MarkRead,
                Method::PATCH,
                &format!("/api/messages/read/{sender_id}"),
                None,
            )
            .await?;
        Ok(())
    }
}

fn api_error(status: StatusCode, body: &[u8]) -> ClientError {
    let message = match serde_json::from_slice::<ErrorBody>(body) {
        Ok(err) => err.message,
        Err(_) => {
            warn!(status = status.as_u16(), "Error response without a message body");
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        }
    };
    ClientError::Api {
        status: status.as_u16(),
        message,
    }
}
