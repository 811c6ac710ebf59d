//! Business logic services for the Genuine Parts Admin API

pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod ledger;
pub mod orders;
pub mod training;
pub mod verification;

pub use auth::AuthService;
pub use catalog::CatalogService;
pub use dashboard::DashboardService;
pub use ledger::LedgerService;
pub use orders::OrderService;
pub use training::TrainingService;
pub use verification::VerificationService;
