//! Shared types and models for the Genuine Parts Admin API
//!
//! This crate holds the request models, enumerations and pure rules (stock
//! arithmetic, order totals, verification status handling, upload naming)
//! used by the backend. Nothing in here touches the database or the network.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
