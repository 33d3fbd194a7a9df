//! # cadet-store
//!
//! In-memory storage for the Cadet service.
//!
//! [`Store`] owns one table per entity and hands out ids from per-table
//! counters starting at 1. Nothing is persisted; a store lives as long as
//! the process (or the test) that built it. Typed CRUD helpers for every
//! domain model live in one module per entity, and the derived dashboard
//! and contact views are computed on demand from the raw records.

pub mod aircraft;
pub mod bookings;
pub mod dashboard;
pub mod flight_logs;
pub mod messages;
pub mod milestones;
pub mod password;
pub mod seed;
pub mod store;
pub mod users;

mod error;
mod table;

pub use error::{Result, StoreError};
pub use store::Store;

#[cfg(test)]
mod testutil;
