// Saves the working loop on quit and restores it on the next launch.
// The feed (src/feed) is a separate store; this file is only the
// scratch state of the current session.

use std::path::{Path, PathBuf};

use crate::loops::DrumLoop;
use crate::loops::model::clamp_bpm;

const LOOPBOX_DIR: &str = ".loopbox";
const LOOP_FILE: &str = "loop.json";

// <project_dir>/.loopbox/loop.json
fn loop_file_path(project_dir: &Path) -> PathBuf {
    project_dir.join(LOOPBOX_DIR).join(LOOP_FILE)
}

pub fn load_loop(project_dir: &Path) -> Option<DrumLoop> {
    let path = loop_file_path(project_dir);
    let data = std::fs::read_to_string(&path).ok()?;
    let mut dl: DrumLoop = serde_json::from_str(&data).ok()?;
    // the file may be hand-edited; tempo passes through the same clamp
    // as every other boundary, or the scheduler's step math breaks
    dl.bpm = clamp_bpm(dl.bpm);
    Some(dl)
}

pub fn save_loop(project_dir: &Path, dl: &DrumLoop) -> anyhow::Result<()> {
    let path = loop_file_path(project_dir);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?; // create .loopbox/ if needed
    }
    let json = serde_json::to_string_pretty(dl)?;
    std::fs::write(&path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_project_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "loopbox-test-{tag}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn round_trips_the_working_loop() {
        let dir = temp_project_dir("persist");
        let mut dl = DrumLoop::default();
        dl.set_bpm(90.0);
        dl.toggle_step(0, 0);
        dl.toggle_mute(3);

        save_loop(&dir, &dl).unwrap();
        let loaded = load_loop(&dir).unwrap();
        assert_eq!(loaded.bpm, 90.0);
        assert!(loaded.tracks[0].pattern[0]);
        assert!(loaded.tracks[3].muted);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn out_of_range_bpm_on_disk_falls_back_to_default() {
        use crate::shared::DEFAULT_BPM;

        let dir = temp_project_dir("persist-bad-bpm");
        // a hand-edited loop.json with a bpm no edit path could produce
        let json = serde_json::json!({
            "bpm": -120.0,
            "tracks": [{
                "name": "Kick",
                "sample_path": "samples/kick.wav",
                "pattern": [true, false, false, false],
                "muted": false
            }]
        });
        std::fs::create_dir_all(dir.join(LOOPBOX_DIR)).unwrap();
        std::fs::write(loop_file_path(&dir), json.to_string()).unwrap();

        let loaded = load_loop(&dir).unwrap();
        assert_eq!(loaded.bpm, DEFAULT_BPM);
        assert!(loaded.tracks[0].pattern[0]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_returns_none_when_nothing_saved() {
        let dir = temp_project_dir("persist-empty");
        assert!(load_loop(&dir).is_none());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
