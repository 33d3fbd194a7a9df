/// Application name
pub const APP_NAME: &str = "Cadet";

/// Default HTTP API port (server)
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Name of the session cookie set on login/register
pub const SESSION_COOKIE: &str = "cadet.sid";

/// Absolute session lifetime in seconds (24 hours)
pub const SESSION_TTL_SECS: i64 = 24 * 60 * 60;

/// Longest accepted session lifetime in seconds (one year)
pub const MAX_SESSION_TTL_SECS: i64 = 365 * SESSION_TTL_SECS;

/// Upcoming bookings shown on the student dashboard
pub const UPCOMING_BOOKINGS_LIMIT: usize = 3;

/// Recent flight logs shown on the student dashboard
pub const RECENT_LOGS_LIMIT: usize = 3;

/// Pending bookings shown on the instructor dashboard
pub const PENDING_BOOKINGS_LIMIT: usize = 5;

/// Pending flight logs shown on the instructor dashboard
pub const PENDING_LOGS_LIMIT: usize = 5;

/// Milestone progress bounds (percent)
pub const PROGRESS_MIN: f64 = 0.0;
pub const PROGRESS_MAX: f64 = 100.0;
