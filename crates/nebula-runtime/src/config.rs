//! Viewer configuration loaded from TOML
//!
//! ```toml
//! seed = 42
//!
//! [galaxy]
//! count = 100000
//! branches = 5
//!
//! [camera]
//! fov = 60.0
//!
//! [window]
//! title = "Nebula"
//! ```
//!
//! Every table and key is optional.

use nebula_core::{NebulaError, Result};
use nebula_gen::GalaxyParams;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewConfig {
    /// Fixed RNG seed; unseeded runs draw from the OS
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub galaxy: GalaxyParams,
    pub camera: CameraConfig,
    pub window: WindowConfig,
}

/// Perspective camera and orbit controller settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
    /// Fraction of pending orbit motion applied per frame
    pub damping: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 70.0,
            near: 0.1,
            far: 100.0,
            position: [4.0, 7.0, 4.0],
            target: [0.0, 0.0, 0.0],
            damping: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Nebula".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
        }
    }
}

impl ViewConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content).map_err(|e| {
            NebulaError::Config(format!("Failed to load config {}: {}", path.display(), e))
        })?;
        log::info!("[config] loaded {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.galaxy.validate()?;
        self.camera.validate()?;
        if self.window.width == 0 || self.window.height == 0 {
            return Err(NebulaError::invalid("window", "width and height must be non-zero"));
        }
        Ok(())
    }
}

impl CameraConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.fov > 0.0 && self.fov < 180.0) {
            return Err(NebulaError::invalid(
                "camera.fov",
                format!("must be in (0, 180), got {}", self.fov),
            ));
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return Err(NebulaError::invalid(
                "camera.near",
                format!("need 0 < near < far, got {} / {}", self.near, self.far),
            ));
        }
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(NebulaError::invalid(
                "camera.damping",
                format!("must be in (0, 1], got {}", self.damping),
            ));
        }
        let offset: f32 = self
            .position
            .iter()
            .zip(self.target.iter())
            .map(|(p, t)| (p - t) * (p - t))
            .sum();
        if offset <= f32::EPSILON {
            return Err(NebulaError::invalid(
                "camera.position",
                "must differ from camera.target",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_default() {
        let config = ViewConfig::from_toml_str("").unwrap();
        assert_eq!(config, ViewConfig::default());
        assert_eq!(config.galaxy.count, 200_000);
        assert_eq!(config.camera.fov, 70.0);
        assert_eq!(config.camera.position, [4.0, 7.0, 4.0]);
        assert!(config.seed.is_none());
    }

    #[test]
    fn partial_tables() {
        let config = ViewConfig::from_toml_str(
            r##"
seed = 7

[galaxy]
count = 1000
inside_color = "#00ff00"

[window]
fullscreen = true
"##,
        )
        .unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.galaxy.count, 1000);
        assert_eq!(config.galaxy.branches, 4);
        assert!(config.window.fullscreen);
        assert_eq!(config.window.width, 1280);
    }

    #[test]
    fn unknown_key_rejected() {
        let err = ViewConfig::from_toml_str("[camera]\nzoom = 2.0\n").unwrap_err();
        assert!(matches!(err, NebulaError::TomlParse(_)));
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(ViewConfig::from_toml_str("[galaxy]\nbranches = 0\n").is_err());
        assert!(ViewConfig::from_toml_str("[camera]\nnear = 5.0\nfar = 1.0\n").is_err());
        assert!(ViewConfig::from_toml_str("[camera]\ndamping = 0.0\n").is_err());
        assert!(ViewConfig::from_toml_str("[camera]\nposition = [0.0, 0.0, 0.0]\n").is_err());
        assert!(ViewConfig::from_toml_str("[window]\nwidth = 0\n").is_err());
    }

    #[test]
    fn sample_config_matches_defaults() {
        let config = ViewConfig::from_toml_str(include_str!("../../../galaxy.toml")).unwrap();
        assert_eq!(config, ViewConfig::default());
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = ViewConfig::load(Path::new("/nonexistent/nebula.toml")).unwrap_err();
        assert!(matches!(err, NebulaError::Io(_)));
    }

    #[test]
    fn serialize_round_trip_keeps_seed() {
        let config = ViewConfig {
            seed: Some(9),
            ..Default::default()
        };
        let text = toml::to_string(&config).unwrap();
        assert_eq!(ViewConfig::from_toml_str(&text).unwrap(), config);
    }
}
