// Resolves track names to registered sample ids. Each distinct name is
// decoded exactly once; syncing against an edited loop loads only the
// newly-introduced names. Nothing is evicted when a name stops being
// referenced.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::audio::{SampleBuffer, SampleId, next_sample_id};
use crate::audio_api::AudioCommand;
use crate::loops::DrumLoop;

pub struct SampleStore {
    // None marks a name whose decode failed; it stays unplayable and is
    // not retried.
    bound: HashMap<String, Option<SampleId>>,
    base_dir: PathBuf,
}

impl SampleStore {
    pub fn new(base_dir: &Path) -> Self {
        Self {
            bound: HashMap::new(),
            base_dir: base_dir.to_path_buf(),
        }
    }

    /// Diff the loop's track names against what's already bound and
    /// decode only the delta, returning the RegisterSample commands for
    /// the engine.
    pub fn sync(&mut self, dl: &DrumLoop, target_rate: u32) -> Vec<AudioCommand> {
        let mut cmds = Vec::new();
        for track in &dl.tracks {
            if self.bound.contains_key(&track.name) {
                continue;
            }
            let path = self.base_dir.join(&track.sample_path);
            match SampleBuffer::load_wav(&path, target_rate) {
                Ok(buffer) => {
                    let id = next_sample_id();
                    self.bound.insert(track.name.clone(), Some(id));
                    cmds.push(AudioCommand::RegisterSample { id, buffer });
                }
                Err(e) => {
                    log::warn!(
                        "failed to load sample '{}' from {}: {e}",
                        track.name,
                        path.display()
                    );
                    self.bound.insert(track.name.clone(), None);
                }
            }
        }
        cmds
    }

    pub fn resolve(&self, name: &str) -> Option<SampleId> {
        self.bound.get(name).copied().flatten()
    }

    /// Playback only arms once something is actually loaded.
    pub fn any_loaded(&self) -> bool {
        self.bound.values().any(|id| id.is_some())
    }

    #[cfg(test)]
    pub(crate) fn bind_for_test(&mut self, name: &str, id: SampleId) {
        self.bound.insert(name.to_string(), Some(id));
    }
}
