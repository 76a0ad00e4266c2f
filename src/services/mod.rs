pub mod confluence;
pub mod feedback;
pub mod performance;

pub use confluence::{compute_confluence, ConfluenceScorer};
pub use feedback::{FeedbackStore, InMemoryFeedbackStore};
pub use performance::PerformanceTracker;
