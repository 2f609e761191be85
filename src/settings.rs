use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{PoisonError, RwLock},
};

use crate::classifier::ClassifierConfig;
use crate::debounce::DebounceConfig;
use crate::pipeline::PipelineConfig;

const ENABLE_LOGS: bool = true;

use crate::log_warn;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoachSettings {
    pub classifier: ClassifierConfig,
    pub debounce: DebounceConfig,
    pub pipeline: PipelineConfig,
    /// JSON catalog replacing the builtin shortcuts.
    pub catalog_path: Option<PathBuf>,
}

/// `settings.json` in the data directory. A missing or unreadable file
/// yields defaults; writes go straight back to disk.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<CoachSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log_warn!(
                    "ignoring malformed settings in {}: {err}",
                    path.display()
                );
                CoachSettings::default()
            })
        } else {
            CoachSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> CoachSettings {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn update(&self, settings: CoachSettings) -> Result<()> {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        self.persist(&settings)?;
        *guard = settings;
        Ok(())
    }

    pub fn update_debounce(&self, debounce: DebounceConfig) -> Result<()> {
        let mut settings = self.get();
        settings.debounce = debounce;
        self.update(settings)
    }

    pub fn update_classifier(&self, classifier: ClassifierConfig) -> Result<()> {
        let mut settings = self.get();
        settings.classifier = classifier;
        self.update(settings)
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)?;
        let data: CoachSettings = serde_json::from_str(&contents)?;
        *self.data.write().unwrap_or_else(PoisonError::into_inner) = data;
        Ok(())
    }

    fn persist(&self, data: &CoachSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
