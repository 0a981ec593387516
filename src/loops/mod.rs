pub mod model;
pub mod persistence;

pub use model::{DrumLoop, Track};
