//! Startup defaults for the doodler.
//!
//! Read once from `<config dir>/image-doodler/config.toml` if it exists.
//! Every key is optional; the program never writes this file.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use image::Rgba;
use log::warn;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::PenState;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DoodlerConfig {
    pub window_width: usize,
    pub window_height: usize,
    pub pen_width: u32,
    /// RGBA, straight alpha.
    pub pen_color: [u8; 4],
}

impl Default for DoodlerConfig {
    fn default() -> Self {
        let pen = PenState::default();
        Self {
            window_width: 800,
            window_height: 600,
            pen_width: pen.width(),
            pen_color: pen.color().0,
        }
    }
}

impl DoodlerConfig {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("image-doodler").join("config.toml"))
    }

    /// Load from the default location. A missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => return Err(ConfigError::Read { path: path.to_path_buf(), source }),
        };
        let config: Self =
            toml::from_str(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        Ok(config.with_usable_window())
    }

    /// A window needs at least one pixel each way; zero falls back to the default.
    fn with_usable_window(mut self) -> Self {
        let defaults = Self::default();
        if self.window_width == 0 {
            warn!("window_width = 0 is unusable, using {}", defaults.window_width);
            self.window_width = defaults.window_width;
        }
        if self.window_height == 0 {
            warn!("window_height = 0 is unusable, using {}", defaults.window_height);
            self.window_height = defaults.window_height;
        }
        self
    }

    /// Initial pen; width is clamped like any other width change.
    pub fn pen(&self) -> PenState {
        PenState::new(Rgba(self.pen_color), self.pen_width)
    }
}
