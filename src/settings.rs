//! User settings persistence.
//!
//! This module handles loading and saving chart preferences across sessions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

use crate::canvas::DEFAULT_FIGURE_SIZE;
use crate::error::{PlotError, Result};
use crate::plots::agp::AGP_FIGURE_SIZE;
use crate::plots::cgm::CGM_FIGURE_SIZE;
use crate::reference::DEFAULT_REFERENCE_PATH;

/// User settings that persist across sessions
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlotSettings {
    /// Settings file version for migration support
    #[serde(default = "default_version")]
    pub version: u32,
    /// Reference figure size in inches
    #[serde(default = "default_reference_size")]
    pub reference_figure_size: [f32; 2],
    /// Glucose trace figure size in inches
    #[serde(default = "default_cgm_size")]
    pub cgm_figure_size: [f32; 2],
    #[serde(default = "default_agp_size")]
    pub agp_figure_size: [f32; 2],
    /// Raster resolution for PNG export
    #[serde(default = "default_dpi")]
    pub png_dpi: u32,
    /// Reference table location; the bundled table when unset
    #[serde(default)]
    pub reference_path: Option<PathBuf>,
}

fn default_version() -> u32 {
    1
}

fn default_reference_size() -> [f32; 2] {
    DEFAULT_FIGURE_SIZE
}

fn default_cgm_size() -> [f32; 2] {
    CGM_FIGURE_SIZE
}

fn default_agp_size() -> [f32; 2] {
    AGP_FIGURE_SIZE
}

fn default_dpi() -> u32 {
    100
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            reference_figure_size: default_reference_size(),
            cgm_figure_size: default_cgm_size(),
            agp_figure_size: default_agp_size(),
            png_dpi: default_dpi(),
            reference_path: None,
        }
    }
}

impl PlotSettings {
    /// Get the config directory path for glucoplot
    pub fn get_config_dir() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::data_dir().map(|p| p.join("glucoplot"))
        }
        #[cfg(not(target_os = "macos"))]
        {
            dirs::config_dir().map(|p| p.join("glucoplot"))
        }
    }

    /// Get the path to the settings JSON file
    pub fn get_settings_path() -> Option<PathBuf> {
        Self::get_config_dir().map(|p| p.join("settings.json"))
    }

    /// Reference table path to load
    pub fn reference_path(&self) -> PathBuf {
        self.reference_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REFERENCE_PATH))
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        match Self::get_settings_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Self::default(),
        }
    }

    /// Load settings from a specific file, falling back to defaults
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_json(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "ignoring unreadable settings");
                Self::default()
            }),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read settings");
                Self::default()
            }
        }
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| PlotError::Settings(e.to_string()))
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::get_settings_path()
            .ok_or_else(|| PlotError::Settings("could not determine config directory".into()))?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PlotError::io(parent, e))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| PlotError::Settings(format!("failed to serialize settings: {}", e)))?;

        std::fs::write(path, content).map_err(|e| PlotError::io(path, e))?;

        Ok(())
    }
}
