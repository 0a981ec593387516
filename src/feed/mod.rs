pub mod record;
pub mod store;

pub use record::{Like, LoopSummary, SavedLoop, SavedTrack};
pub use store::LoopStore;
