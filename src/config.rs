use crate::model::Rules;
use crate::storage::atomic_rename;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub fps_cap: u32,
    pub enable_color: bool,
    pub tick_interval_ms: i64,
    pub decay_per_tick: u8,
    pub feed_boost: u8,
    pub play_boost: u8,
}

impl Default for Settings {
    fn default() -> Self {
        let rules = Rules::default();
        Self {
            fps_cap: 30,
            enable_color: true,
            tick_interval_ms: rules.tick_interval_ms,
            decay_per_tick: rules.decay_per_tick,
            feed_boost: rules.feed_boost,
            play_boost: rules.play_boost,
        }
    }
}

impl Settings {
    pub fn rules(&self) -> Rules {
        let defaults = Rules::default();
        let tick_interval_ms = if self.tick_interval_ms > 0 {
            self.tick_interval_ms
        } else {
            tracing::warn!(
                value = self.tick_interval_ms,
                "tick interval must be positive, using default"
            );
            defaults.tick_interval_ms
        };
        Rules {
            tick_interval_ms,
            decay_per_tick: self.decay_per_tick,
            feed_boost: self.feed_boost,
            play_boost: self.play_boost,
        }
    }
}

pub struct Paths {
    pub store_path: PathBuf,
    pub settings_path: PathBuf,
    pub log_path: PathBuf,
}

pub fn project_paths() -> Result<Paths> {
    let proj = ProjectDirs::from("com", "oiiagotchi", "Oiiagotchi")
        .context("could not resolve project directories")?;
    let dir = proj.data_local_dir().to_path_buf();
    fs::create_dir_all(&dir)
        .with_context(|| format!("could not create data dir {}", dir.display()))?;
    Ok(Paths {
        store_path: dir.join("store.json"),
        settings_path: dir.join("settings.json"),
        log_path: dir.join("oiiagotchi.log"),
    })
}

pub fn load_settings(path: &Path) -> Settings {
    if let Ok(s) = fs::read_to_string(path) {
        match serde_json::from_str::<Settings>(&s) {
            Ok(v) => return v,
            Err(err) => tracing::warn!(path = %path.display(), %err, "bad settings file, using defaults"),
        }
    }
    Settings::default()
}

pub fn save_settings_atomic(path: &Path, s: &Settings) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(s)?;
    fs::write(&tmp, data)?;
    atomic_rename(&tmp, path)?;
    Ok(())
}
