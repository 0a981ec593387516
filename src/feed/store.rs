// The feed: saved loops and their likes, one JSON file per loop under
// <dir>/loops/. Save validates track shape before writing, listing is
// newest-first with per-user liked flags, and toggle-like flips
// membership and persists. No retries anywhere; every failure is
// terminal for its call.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;

use crate::loops::DrumLoop;

use super::record::{Like, LoopSummary, SavedLoop, SavedTrack};

pub struct LoopStore {
    dir: PathBuf,
}

impl LoopStore {
    pub fn open(dir: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(dir.join("loops"))?;
        Ok(Self { dir: dir.to_path_buf() })
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join("loops").join(format!("{id}.json"))
    }

    /// Persist a loop under a fresh id. Malformed track shape (empty
    /// instrument name, or rows of differing length) is rejected before
    /// anything touches disk.
    pub fn save_loop(
        &self,
        username: &str,
        title: &str,
        dl: &DrumLoop,
    ) -> anyhow::Result<SavedLoop> {
        if dl.tracks.is_empty() {
            anyhow::bail!("invalid track data: loop has no tracks");
        }
        let len = dl.pattern_len();
        for track in &dl.tracks {
            if track.name.is_empty() {
                anyhow::bail!("invalid track data: empty instrument name");
            }
            if track.pattern.len() != len {
                anyhow::bail!(
                    "invalid track data: '{}' has {} steps, expected {len}",
                    track.name,
                    track.pattern.len()
                );
            }
        }

        let record = SavedLoop {
            id: new_loop_id(),
            username: username.to_string(),
            title: title.to_string(),
            bpm: dl.bpm,
            created_at: now_millis(),
            tracks: dl
                .tracks
                .iter()
                .map(|t| SavedTrack {
                    instrument: t.name.clone(),
                    pattern: t.pattern.clone(),
                    muted: t.muted,
                })
                .collect(),
            likes: Vec::new(),
        };
        self.write(&record)?;
        Ok(record)
    }

    pub fn get_loop(&self, id: &str) -> anyhow::Result<SavedLoop> {
        let path = self.path_for(id);
        let data = std::fs::read_to_string(&path)
            .with_context(|| format!("drum loop not found: {id}"))?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Newest-first summaries, with the liked flag computed for the
    /// asking user. Unreadable records are logged and skipped rather
    /// than failing the whole listing.
    pub fn latest_loops(&self, user_id: &str) -> anyhow::Result<Vec<LoopSummary>> {
        let mut records = Vec::new();
        for entry in std::fs::read_dir(self.dir.join("loops"))? {
            let path = entry?.path();
            if path.extension().is_none_or(|e| e != "json") {
                continue;
            }
            let data = std::fs::read_to_string(&path)?;
            match serde_json::from_str::<SavedLoop>(&data) {
                Ok(record) => records.push(record),
                Err(e) => log::warn!("skipping unreadable loop {}: {e}", path.display()),
            }
        }
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(records
            .into_iter()
            .map(|r| LoopSummary {
                like_count: r.like_count(),
                liked: r.liked_by(user_id),
                id: r.id,
                username: r.username,
                title: r.title,
                bpm: r.bpm,
                created_at: r.created_at,
            })
            .collect())
    }

    /// Flip the user's like on a loop. Returns the new liked flag and
    /// the updated count.
    pub fn toggle_like(&self, loop_id: &str, user_id: &str) -> anyhow::Result<(bool, usize)> {
        let mut record = self.get_loop(loop_id)?;
        let liked = if record.liked_by(user_id) {
            record.likes.retain(|l| l.user_id != user_id);
            false
        } else {
            record.likes.push(Like { user_id: user_id.to_string() });
            true
        };
        self.write(&record)?;
        Ok((liked, record.like_count()))
    }

    /// Remove a saved loop. Deleting an unknown id is an error.
    pub fn delete_loop(&self, id: &str) -> anyhow::Result<()> {
        let path = self.path_for(id);
        if !path.exists() {
            anyhow::bail!("drum loop not found: {id}");
        }
        std::fs::remove_file(&path)?;
        Ok(())
    }

    fn write(&self, record: &SavedLoop) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(record)?;
        std::fs::write(self.path_for(&record.id), json)?;
        Ok(())
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// timestamp plus a process-wide counter keeps ids unique within a
// store without pulling in a random id crate
fn new_loop_id() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    // counter is zero-padded so id order matches creation order even
    // within one millisecond
    format!("{:x}-{n:08x}", now_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loops::Track;
    use crate::shared::STEPS_PER_PATTERN;

    fn temp_store(tag: &str) -> (LoopStore, PathBuf) {
        let dir = std::env::temp_dir().join(format!(
            "loopbox-feed-{tag}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        (LoopStore::open(&dir).unwrap(), dir)
    }

    fn sample_loop() -> DrumLoop {
        let mut dl = DrumLoop::default();
        dl.set_bpm(140.0);
        dl.toggle_step(0, 0);
        dl.toggle_step(1, 8);
        dl
    }

    #[test]
    fn save_then_fetch_round_trips_the_record() {
        let (store, dir) = temp_store("roundtrip");
        let saved = store.save_loop("ada", "first beat", &sample_loop()).unwrap();
        assert_eq!(saved.bpm, 140.0);
        assert_eq!(saved.tracks.len(), 4);
        assert!(saved.likes.is_empty());

        let fetched = store.get_loop(&saved.id).unwrap();
        assert_eq!(fetched.username, "ada");
        assert_eq!(fetched.title, "first beat");
        assert!(fetched.tracks[0].pattern[0]);
        assert_eq!(fetched.tracks[0].instrument, "Kick");

        let rebuilt = fetched.to_drum_loop();
        assert_eq!(rebuilt.bpm, 140.0);
        assert!(rebuilt.tracks[1].pattern[8]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_tracks_are_rejected_before_writing() {
        let (store, dir) = temp_store("invalid");

        let mut unnamed = sample_loop();
        unnamed.tracks[2].name.clear();
        assert!(store.save_loop("ada", "x", &unnamed).is_err());

        let mut ragged = sample_loop();
        ragged.tracks[1].pattern = vec![false; STEPS_PER_PATTERN / 2];
        assert!(store.save_loop("ada", "x", &ragged).is_err());

        assert!(store.latest_loops("ada").unwrap().is_empty());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn latest_is_newest_first_with_like_state() {
        let (store, dir) = temp_store("latest");
        let first = store.save_loop("ada", "one", &sample_loop()).unwrap();
        let second = store.save_loop("bob", "two", &sample_loop()).unwrap();
        store.toggle_like(&first.id, "bob").unwrap();

        let feed = store.latest_loops("bob").unwrap();
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].id, second.id);
        assert_eq!(feed[1].id, first.id);
        assert!(feed[1].liked);
        assert_eq!(feed[1].like_count, 1);
        assert!(!feed[0].liked);

        // a different user sees the count but not the flag
        let feed = store.latest_loops("ada").unwrap();
        assert!(!feed[1].liked);
        assert_eq!(feed[1].like_count, 1);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn toggle_like_flips_and_persists() {
        let (store, dir) = temp_store("likes");
        let saved = store.save_loop("ada", "beat", &sample_loop()).unwrap();

        assert_eq!(store.toggle_like(&saved.id, "bob").unwrap(), (true, 1));
        assert_eq!(store.toggle_like(&saved.id, "cyn").unwrap(), (true, 2));
        assert_eq!(store.toggle_like(&saved.id, "bob").unwrap(), (false, 1));

        let record = store.get_loop(&saved.id).unwrap();
        assert!(record.liked_by("cyn"));
        assert!(!record.liked_by("bob"));

        assert!(store.toggle_like("no-such-id", "bob").is_err());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn delete_removes_the_loop_and_rejects_unknown_ids() {
        let (store, dir) = temp_store("delete");
        let kept = store.save_loop("ada", "keep", &sample_loop()).unwrap();
        let doomed = store.save_loop("ada", "drop", &sample_loop()).unwrap();

        store.delete_loop(&doomed.id).unwrap();
        assert!(store.get_loop(&doomed.id).is_err());

        let feed = store.latest_loops("ada").unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].id, kept.id);

        // already gone, and never-existed, both error
        assert!(store.delete_loop(&doomed.id).is_err());
        assert!(store.delete_loop("no-such-id").is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn two_tracks_with_equal_lengths_shorter_than_default_are_fine() {
        let (store, dir) = temp_store("short");
        let dl = DrumLoop {
            bpm: 100.0,
            tracks: vec![
                Track::new("Kick", "samples/kick.wav", 16),
                Track::new("Hat", "samples/hat.wav", 16),
            ],
        };
        let saved = store.save_loop("ada", "short", &dl).unwrap();
        assert_eq!(saved.tracks[0].pattern.len(), 16);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
