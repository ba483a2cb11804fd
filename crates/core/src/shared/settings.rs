use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::shared::constants::{DEFAULT_ENDPOINT, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::shared::tracking_config::{DistanceMetric, FaceModel, TrackingConfig};

/// Client settings read from `<config_dir>/facetrack/settings.json`.
///
/// Missing fields fall back to defaults; a missing or malformed file yields
/// `ClientSettings::default()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub endpoint: String,
    pub model: FaceModel,
    pub metric: DistanceMetric,
    pub request_timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: FaceModel::default(),
            metric: DistanceMetric::default(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientSettings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("facetrack").join("settings.json"))
    }

    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        let Ok(json) = fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&json).unwrap_or_else(|e| {
            log::warn!("Ignoring malformed settings file {}: {e}", path.display());
            Self::default()
        })
    }

    pub fn tracking_config(&self) -> TrackingConfig {
        TrackingConfig::new(self.model, self.metric)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
