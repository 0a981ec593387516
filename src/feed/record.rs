// The persisted shape of a shared loop. Field names follow the saved
// record: tracks carry `instrument` rather than the live model's
// `name`, and likes are a list of user ids.

use serde::{Deserialize, Serialize};

use crate::loops::DrumLoop;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SavedTrack {
    pub instrument: String,
    pub pattern: Vec<bool>,
    pub muted: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Like {
    pub user_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SavedLoop {
    pub id: String,
    pub username: String,
    pub title: String,
    pub bpm: f32,
    /// milliseconds since the unix epoch
    pub created_at: u64,
    pub tracks: Vec<SavedTrack>,
    pub likes: Vec<Like>,
}

impl SavedLoop {
    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    pub fn liked_by(&self, user_id: &str) -> bool {
        self.likes.iter().any(|l| l.user_id == user_id)
    }

    /// Rebuild a playable loop from the record (the fetch/share path).
    pub fn to_drum_loop(&self) -> DrumLoop {
        DrumLoop {
            bpm: crate::loops::model::clamp_bpm(self.bpm),
            tracks: self
                .tracks
                .iter()
                .map(|t| crate::loops::Track {
                    name: t.instrument.clone(),
                    sample_path: format!("samples/{}.wav", t.instrument.to_lowercase()),
                    pattern: t.pattern.clone(),
                    muted: t.muted,
                })
                .collect(),
        }
    }
}

/// What the feed page lists: the record minus the pattern payload, plus
/// the like count and whether the asking user liked it.
#[derive(Clone, Debug)]
pub struct LoopSummary {
    pub id: String,
    pub username: String,
    pub title: String,
    pub bpm: f32,
    pub created_at: u64,
    pub like_count: usize,
    pub liked: bool,
}
