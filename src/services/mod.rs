pub mod ai_analysis;
pub mod fetch;
pub mod meeting;

pub use ai_analysis::AiAnalysisClient;
pub use fetch::{must_fetch, try_fetch};
pub use meeting::MeetingClient;
