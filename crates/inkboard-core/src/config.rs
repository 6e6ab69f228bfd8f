//! Editor configuration.

use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::selection::SINGLE_ALIGN_OFFSET;
use crate::shapes::ElementStyle;
use crate::snap::GRID_SIZE;
use crate::storage::autosave::DEFAULT_DEBOUNCE_MS;
use crate::tools::FontSettings;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};

/// Default offset applied to pasted and duplicated elements.
pub const PASTE_OFFSET: f64 = 20.0;

/// Default maximum width of inserted images, in model units.
pub const MAX_IMAGE_WIDTH: f64 = 500.0;

/// Default pointer hit tolerance, in screen pixels.
pub const HIT_TOLERANCE: f64 = 4.0;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Tunables for the editing engine and autosave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Snap grid spacing in model units.
    pub grid_size: f64,
    /// Whether snap-to-grid starts enabled.
    pub snap_to_grid: bool,
    /// Autosave quiet period in milliseconds.
    pub autosave_debounce_ms: u64,
    /// Offset applied to pasted and duplicated elements.
    pub paste_offset: f64,
    /// Maximum number of undo snapshots.
    pub history_limit: usize,
    /// Maximum width of inserted images.
    pub max_image_width: f64,
    /// Pointer hit tolerance in screen pixels (divided by zoom).
    pub hit_tolerance: f64,
    /// Half-width of the single-element alignment frame.
    pub align_offset: f64,
    /// Corner radius given to new rectangles.
    pub corner_radius: f64,
    /// Style given to new elements.
    pub default_style: ElementStyle,
    /// Font settings given to new text.
    pub font: FontSettings,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            snap_to_grid: false,
            autosave_debounce_ms: DEFAULT_DEBOUNCE_MS,
            paste_offset: PASTE_OFFSET,
            history_limit: DEFAULT_HISTORY_LIMIT,
            max_image_width: MAX_IMAGE_WIDTH,
            hit_tolerance: HIT_TOLERANCE,
            align_offset: SINGLE_ALIGN_OFFSET,
            corner_radius: 0.0,
            default_style: ElementStyle::default(),
            font: FontSettings::default(),
        }
    }
}

impl EditorConfig {
    /// Check every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("gridSize", self.grid_size)?;
        positive("maxImageWidth", self.max_image_width)?;
        positive("font.fontSize", self.font.font_size)?;
        non_negative("pasteOffset", self.paste_offset)?;
        non_negative("hitTolerance", self.hit_tolerance)?;
        non_negative("alignOffset", self.align_offset)?;
        non_negative("cornerRadius", self.corner_radius)?;
        non_negative("defaultStyle.strokeWidth", self.default_style.stroke_width)?;
        if self.history_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "historyLimit",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.font.font_family.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "font.fontFamily",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Standard config location under the platform config directory.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("inkboard").join("config.json"))
    }

    /// Load a config file; a missing file yields the defaults.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Write the config atomically (temp file, then rename).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, self.to_json()?)?;
        std::fs::rename(temp_path, path)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be positive, got {value}"),
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must not be negative, got {value}"),
        })
    }
}
