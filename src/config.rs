use crate::rules::Rules;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub(crate) const SAVE_FILE_NAME: &str = "penguin_pet_state.json";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) fps_cap: u32,
    pub(crate) enable_color: bool,
    /// 0 seeds the dice from entropy.
    pub(crate) seed: u64,
    pub(crate) autosave_secs: u64,
    /// `tracing_subscriber::EnvFilter` directive, used when RUST_LOG is unset.
    pub(crate) log_filter: String,
    pub(crate) rules: Rules,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps_cap: 20,
            enable_color: true,
            seed: 0,
            autosave_secs: 10,
            log_filter: "pengotchi=info".to_string(),
            rules: Rules::default(),
        }
    }
}

pub(crate) struct Paths {
    pub(crate) save_path: PathBuf,
    pub(crate) settings_path: PathBuf,
    pub(crate) log_path: PathBuf,
}

pub(crate) fn project_paths() -> Result<Paths> {
    let proj = ProjectDirs::from("com", "pengotchi", "Pengotchi")
        .context("could not resolve project directories")?;
    let dir = proj.data_local_dir().to_path_buf();
    fs::create_dir_all(&dir)
        .with_context(|| format!("could not create data directory {}", dir.display()))?;
    Ok(Paths {
        save_path: dir.join(SAVE_FILE_NAME),
        settings_path: dir.join("settings.json"),
        log_path: dir.join("pengotchi.log"),
    })
}

/// A missing file gives the defaults. A file that does not parse is an
/// error; callers log it once logging is up and fall back to defaults.
pub(crate) fn load_settings(path: &Path) -> Result<Settings> {
    match fs::read_to_string(path) {
        Ok(s) => serde_json::from_str::<Settings>(&s)
            .with_context(|| format!("bad settings in {}", path.display())),
        Err(_) => Ok(Settings::default()),
    }
}

pub(crate) fn save_settings_atomic(path: &Path, s: &Settings) -> Result<()> {
    write_json_atomic(path, s)
}

/// Writes to a sibling temp file and renames it over `path`.
pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(value)?;
    fs::write(&tmp, data).with_context(|| format!("writing {}", tmp.display()))?;
    atomic_rename(&tmp, path)?;
    Ok(())
}

fn atomic_rename(from: &Path, to: &Path) -> Result<()> {
    // rename-over-existing is not atomic on Windows
    if cfg!(windows) && to.exists() {
        let _ = fs::remove_file(to);
    }
    fs::rename(from, to).with_context(|| format!("renaming into {}", to.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_keep_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"seed": 9, "rules": {"tick_interval_ms": 1000}}"#).unwrap();
        let s = load_settings(&path).unwrap();
        assert_eq!(s.seed, 9);
        assert_eq!(s.rules.tick_interval_ms, 1000);
        assert_eq!(s.rules.max_exp, 100);
        assert_eq!(s.autosave_secs, 10);
    }

    #[test]
    fn garbage_settings_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();
        let err = load_settings(&path).unwrap_err();
        assert!(format!("{err:#}").contains("bad settings"));
    }

    #[test]
    fn missing_settings_give_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = load_settings(&dir.path().join("nope.json")).unwrap();
        assert_eq!(s.rules.tick_interval_ms, 10_000);
        assert_eq!(s.log_filter, "pengotchi=info");
    }

    #[test]
    fn settings_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut s = Settings::default();
        s.enable_color = false;
        save_settings_atomic(&path, &s).unwrap();
        save_settings_atomic(&path, &s).unwrap();
        assert!(!load_settings(&path).unwrap().enable_color);
        assert!(!path.with_extension("json.tmp").exists());
    }
}
