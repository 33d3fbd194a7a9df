//! # cadet-client
//!
//! Typed HTTP client for the Cadet API.
//!
//! [`ApiClient`] keeps the session cookie between calls and serves reads
//! from a [`QueryCache`]. Every write is described by a [`Mutation`] which
//! knows which cached queries it can make stale; those are dropped as soon
//! as the write succeeds, so the next read goes back to the server.

pub mod api;
pub mod cache;
pub mod error;
pub mod mutation;

pub use api::{ApiClient, Health};
pub use cache::{QueryCache, QueryKey};
pub use error::{ClientError, Result};
pub use mutation::{Invalidation, Mutation};
