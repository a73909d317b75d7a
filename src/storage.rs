use crate::anim::{AnimState, Clip, Priority};
use crate::config::write_json_atomic;
use crate::model::{GameState, SaveFile, SAVE_VERSION};
use crate::rules::Rules;
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::{fs, path::Path};

/// Reads the snapshot at `path`. Absent or unreadable snapshots start a
/// fresh game; this never fails.
pub(crate) fn load_or_init_save(path: &Path, rules: &Rules, now: DateTime<Utc>) -> GameState {
    let mut state = match fs::read_to_string(path) {
        Ok(s) => match serde_json::from_str::<SaveFile>(&s) {
            Ok(save) => {
                tracing::info!(
                    path = %path.display(),
                    last_seen = %save.last_seen_utc,
                    "loaded snapshot"
                );
                save.state
            }
            Err(err) => {
                tracing::warn!(%err, path = %path.display(), "corrupt snapshot, starting over");
                GameState::default()
            }
        },
        Err(_) => {
            tracing::info!(path = %path.display(), "no snapshot, starting a new egg");
            GameState::default()
        }
    };
    rehydrate(&mut state, rules, now);
    state
}

/// Rebuilds the presentation state that snapshots leave out.
fn rehydrate(state: &mut GameState, rules: &Rules, now: DateTime<Utc>) {
    if state.is_egg {
        state.anim = AnimState::new(Clip::Egg, Priority::High, true);
    } else if state.is_dead() {
        state.anim = AnimState::new(Clip::Tombstone, Priority::Max, true);
    } else {
        state.anim = AnimState::default();
        state.reset_animation(rules, now);
    }
}

pub(crate) fn save_atomic(path: &Path, state: &GameState, now: DateTime<Utc>) -> Result<()> {
    let save = SaveFile {
        version: SAVE_VERSION,
        last_seen_utc: now,
        state: state.clone(),
    };
    write_json_atomic(path, &save)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Activity, ActivityKind};
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn missing_snapshot_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let st = load_or_init_save(&dir.path().join("nope.json"), &Rules::default(), t0());
        assert!(st.is_egg);
        assert_eq!(st.coins, 100);
        assert_eq!(st.anim.clip, Clip::Egg);
    }

    #[test]
    fn corrupt_snapshot_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");
        fs::write(&path, "{\"version\": 1, \"state\": 42").unwrap();
        let st = load_or_init_save(&path, &Rules::default(), t0());
        assert!(st.is_egg);
        assert_eq!(st.level, 1);
    }

    #[test]
    fn snapshot_keeps_progress_and_running_session() {
        let rules = Rules::default();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");

        let mut st = GameState::default();
        st.is_egg = false;
        st.level = 4;
        st.exp = 37;
        st.coins = 512;
        st.stats.intelligence = 130.0;
        st.low_mood_since = Some(t0());
        st.activity = Some(Activity {
            kind: ActivityKind::Study,
            ends_at: t0(),
            duration_secs: 120,
        });
        st.show_dialogue("not persisted", &rules, t0());
        save_atomic(&path, &st, t0()).unwrap();

        let back = load_or_init_save(&path, &rules, t0());
        assert_eq!(back.level, 4);
        assert_eq!(back.exp, 37);
        assert_eq!(back.coins, 512);
        assert_eq!(back.stats, st.stats);
        assert_eq!(back.low_mood_since, Some(t0()));
        assert_eq!(back.activity, st.activity);
        assert!(!back.dialogue.visible);
        assert_eq!(back.anim.clip, Clip::Hidden);
    }

    #[test]
    fn loaded_sick_pet_shows_its_condition() {
        let rules = Rules::default();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");
        let mut st = GameState::default();
        st.is_egg = false;
        st.stats.health = 20.0;
        save_atomic(&path, &st, t0()).unwrap();

        let back = load_or_init_save(&path, &rules, t0());
        assert_eq!(back.anim.clip, Clip::Sick);
        assert!(back.dialogue.visible);
    }

    #[test]
    fn loaded_dead_pet_lies_under_its_tombstone() {
        let rules = Rules::default();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");
        let mut st = GameState::default();
        st.is_egg = false;
        st.stats.health = 0.0;
        save_atomic(&path, &st, t0()).unwrap();

        let back = load_or_init_save(&path, &rules, t0());
        assert_eq!(back.anim.clip, Clip::Tombstone);
        assert_eq!(back.anim.priority, Priority::Max);
        assert!(!back.dialogue.visible);
    }
}
