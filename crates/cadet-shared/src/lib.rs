//! # cadet-shared
//!
//! Data model shared by the Cadet server and client: entity records, insert
//! payloads with their validation rules, status enums with transition tables,
//! and the derived dashboard views.

pub mod constants;
pub mod error;
pub mod models;
pub mod schema;
pub mod status;
pub mod types;
pub mod views;

pub use error::ValidationError;
pub use models::*;
pub use schema::*;
pub use status::{BookingStatus, FlightLogStatus, FlightType, MilestoneStatus, Transition};
pub use types::{Id, Role};
pub use views::*;
