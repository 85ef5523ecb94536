//! Persisted game settings.

use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::kv::{load_json, save_json, KeyValueStore};
use crate::types::DEFAULT_TIME_LIMIT_SECS;

pub const SETTINGS_KEY: &str = "askeladd-settings";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Solo countdown in seconds
    pub time_limit: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            time_limit: DEFAULT_TIME_LIMIT_SECS,
        }
    }
}

#[derive(Clone)]
pub struct SettingsStore {
    store: Arc<dyn KeyValueStore>,
}

impl SettingsStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Current settings; defaults when absent, unparsable or zero
    pub fn load(&self) -> Settings {
        match load_json::<Settings>(&*self.store, SETTINGS_KEY) {
            Some(s) if s.time_limit > 0 => s,
            Some(_) => {
                log::warn!("[SETTINGS] zero time limit, using default");
                Settings::default()
            }
            None => Settings::default(),
        }
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        save_json(&*self.store, SETTINGS_KEY, settings)
    }

    /// Replace only the time limit
    pub fn set_time_limit(&self, secs: u32) -> Result<Settings> {
        let mut settings = self.load();
        settings.time_limit = secs;
        self.save(&settings)?;
        Ok(settings)
    }
}
