pub mod feedback;
pub mod performance;
pub mod prediction;
pub mod score;
pub mod timeframe;

pub use feedback::*;
pub use performance::*;
pub use prediction::*;
pub use score::*;
pub use timeframe::*;
