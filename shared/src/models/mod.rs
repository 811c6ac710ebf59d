//! Domain models for the Genuine Parts Admin API

mod admin;
mod part;
mod sales;
mod stock;
mod training;
mod verification;

pub use admin::*;
pub use part::*;
pub use sales::*;
pub use stock::*;
pub use training::*;
pub use verification::*;
