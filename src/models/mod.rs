pub mod analysis;
pub mod meeting;
pub mod scores;
pub mod timestamp;

pub use analysis::*;
pub use meeting::Meeting;
pub use scores::{CountList, ScoreList};
