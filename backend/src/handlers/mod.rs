//! HTTP request handlers

pub mod auth;
pub mod dashboard;
pub mod fallback;
pub mod health;
pub mod sales;
pub mod spareparts;
pub mod training;
pub mod verification;

pub use auth::*;
pub use dashboard::*;
pub use fallback::*;
pub use health::*;
pub use sales::*;
pub use spareparts::*;
pub use training::*;
pub use verification::*;
