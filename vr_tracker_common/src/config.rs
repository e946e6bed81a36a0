use std::path::{Path, PathBuf};
use std::time::Duration;

use app_dirs2::{get_app_root, AppDataType, AppInfo};
use serde::{Deserialize, Serialize};

use crate::device::TrackingUniverse;

pub const APP_INFO: AppInfo = AppInfo {
    name: "vr_tracker",
    author: "vr_tracker",
};

const POLL_CONFIG_FILE: &str = "poll_config.json";

/// Which runtime backend to open at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeBackend {
    /// Scripted devices, no headset required.
    Mock,
    #[serde(rename = "openvr")]
    OpenVr,
}

impl Default for RuntimeBackend {
    fn default() -> Self {
        if cfg!(feature = "openvr") {
            RuntimeBackend::OpenVr
        } else {
            RuntimeBackend::Mock
        }
    }
}

/// Where the poller sleeps between runtime queries.
///
/// `PerDevice` sleeps after every connected slot, so a sweep takes longer the
/// more devices are attached. `PerIteration` sleeps once per full sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayPolicy {
    PerDevice { millis: u64 },
    PerIteration { millis: u64 },
    None,
}

impl Default for DelayPolicy {
    fn default() -> Self {
        DelayPolicy::PerDevice { millis: 10 }
    }
}

impl DelayPolicy {
    pub fn per_device(&self) -> Option<Duration> {
        match *self {
            DelayPolicy::PerDevice { millis } => Some(Duration::from_millis(millis)),
            _ => None,
        }
    }

    pub fn per_iteration(&self) -> Option<Duration> {
        match *self {
            DelayPolicy::PerIteration { millis } => Some(Duration::from_millis(millis)),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub backend: RuntimeBackend,
    pub universe: TrackingUniverse,
    pub delay: DelayPolicy,
    pub channel_capacity: usize,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            backend: RuntimeBackend::default(),
            universe: TrackingUniverse::Standing,
            delay: DelayPolicy::default(),
            channel_capacity: 256,
        }
    }
}

fn poll_config_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let config_dir = get_app_root(AppDataType::UserConfig, &APP_INFO)?;
    Ok(config_dir.join(POLL_CONFIG_FILE))
}

pub fn poll_config_from_str(contents: &str) -> Result<PollConfig, Box<dyn std::error::Error>> {
    let mut config: PollConfig = json5::from_str(contents)?;
    if config.channel_capacity == 0 {
        tracing::warn!("channel_capacity must be at least 1, using 1");
        config.channel_capacity = 1;
    }
    Ok(config)
}

pub fn poll_config() -> Result<PollConfig, Box<dyn std::error::Error>> {
    poll_config_at(&poll_config_path()?)
}

/// Loads the config at `path`. A missing or unparsable file yields the
/// defaults; only a failed read of an existing file is an error.
pub fn poll_config_at(path: &Path) -> Result<PollConfig, Box<dyn std::error::Error>> {
    if path.exists() {
        tracing::info!("Loading poll config from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        match poll_config_from_str(&contents) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::error!(
                    "Failed to parse poll config {}: {}, using default values",
                    path.display(),
                    e
                );
                Ok(Default::default())
            }
        }
    } else {
        tracing::warn!(
            "Poll config file {} not found, using default values",
            path.display()
        );
        Ok(Default::default())
    }
}

pub fn poll_config_save(config: &PollConfig) -> Result<(), Box<dyn std::error::Error>> {
    poll_config_save_at(config, &poll_config_path()?)
}

pub fn poll_config_save_at(
    config: &PollConfig,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json5::to_string(config)?)?;
    Ok(())
}
