//! Shared types for the LMS admin client.
//!
//! Everything in here is a plain data-transfer shape owned by the backend
//! services; the client only ever holds transient copies.

pub mod error;
pub mod models;
pub mod timestamp;
pub mod validation;

pub use error::*;
pub use models::*;
pub use validation::*;
