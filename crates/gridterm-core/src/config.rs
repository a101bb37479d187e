//! Configuration types for the gridterm engine.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{CellStyle, Dimensions, Error};

/// Engine configuration loaded from a YAML or JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Render and input settings
    pub engine: EngineSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

impl EngineConfig {
    /// Load configuration from a file.
    ///
    /// Files ending in `.json` are parsed as JSON, everything else as YAML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    /// Parse configuration from YAML string.
    pub fn from_yaml(yaml: &str) -> crate::Result<Self> {
        let config: EngineConfig =
            serde_yaml::from_str(yaml).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from JSON string.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> crate::Result<()> {
        self.engine.validate()
    }
}

/// Render loop, display loop and input hook settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Grid width in cells
    pub width: u16,
    /// Grid height in cells
    pub height: u16,
    /// Sleep between render iterations (ms, minimum 1)
    pub refresh_interval_ms: u64,
    /// Sleep between display flushes (ms, minimum 1)
    pub display_interval_ms: u64,
    /// Skip flushing a snapshot that was already written to the console
    pub skip_unchanged_frames: bool,
    /// Upper bound on how long the input pump blocks before re-checking for uninstall (ms)
    pub hook_poll_ms: u64,
    /// Install a termination-signal handler while running
    pub handle_termination: bool,
    /// Style used when the buffers are first allocated
    pub clear_style: CellStyle,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            width: 80,
            height: 25,
            refresh_interval_ms: 3,
            display_interval_ms: 1,
            skip_unchanged_frames: true,
            hook_poll_ms: 25,
            handle_termination: true,
            clear_style: CellStyle::default(),
        }
    }
}

impl EngineSettings {
    /// Grid dimensions described by `width`/`height`.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.height, self.width)
    }

    /// Validate settings values.
    pub fn validate(&self) -> crate::Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidDimensions {
                rows: self.height,
                cols: self.width,
            });
        }

        if self.refresh_interval_ms == 0 {
            return Err(Error::InvalidRefreshInterval(self.refresh_interval_ms));
        }

        if self.display_interval_ms == 0 {
            return Err(Error::Config(
                "engine.display_interval_ms must be > 0".to_string(),
            ));
        }

        if self.hook_poll_ms == 0 {
            return Err(Error::Config("engine.hook_poll_ms must be > 0".to_string()));
        }

        Ok(())
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log file; logging is discarded when unset because the terminal
    /// surface belongs to the engine
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
