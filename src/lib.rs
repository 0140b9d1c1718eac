//! Normalizes guest reviews collected from booking channels and gates which
//! of them are published on property pages.

pub mod error;
pub mod export;
pub mod filter;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod report;
pub mod seed;
pub mod service;
pub mod store;

pub use error::ServiceError;
pub use models::{NormalizedReview, RawReview};
pub use normalize::normalize_reviews;
pub use service::ReviewService;
pub use store::ApprovalStore;
