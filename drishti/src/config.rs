//! Configuration for Drishti
//!
//! One TOML file covers the device, the drive calibration and the filter.
//! Every section and every field is optional; missing values fall back to
//! the defaults below.
//!
//! ```toml
//! [device]
//! type = "mock"
//!
//! [device.simulation]
//! random_seed = 7
//!
//! [drive]
//! settle_ms = 1000
//!
//! [filter]
//! particles = 10
//! seed = 42
//!
//! [scene]
//! distance_cm = 40.0
//! scaling_factor = 10.0
//! anchor = "lead_particle"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use yantra_io::{DeviceConfig, RobotConfig};

use crate::error::Result;
use crate::localization::{MotionModelConfig, Particle};
use crate::scene::{BoundaryAnchor, SceneExporter};
use crate::sequencer::Choreography;
use crate::sonar::SonarConfig;

/// Paths searched when no config file is given
pub const DEFAULT_CONFIG_PATHS: [&str; 2] = ["drishti.toml", "/etc/drishti.toml"];

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub device: DeviceConfig,
    pub drive: RobotConfig,
    pub filter: FilterConfig,
    pub scene: SceneConfig,
    pub choreography: Choreography,
    pub sonar: SonarConfig,
}

/// Particle filter settings (`[filter]` section)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Number of particles
    pub particles: usize,
    /// Start pose shared by every particle (display units, rad)
    pub start_x: f64,
    pub start_y: f64,
    pub start_theta: f64,
    /// Translational noise (cm)
    pub e_error: f64,
    /// Heading drift per straight segment (rad)
    pub f_error: f64,
    /// Heading noise per turn (rad)
    pub g_error: f64,
    /// Noise seed (0 = random each run)
    pub seed: u64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        let noise = MotionModelConfig::default();
        Self {
            particles: 10,
            start_x: 100.0,
            start_y: 100.0,
            start_theta: 0.0,
            e_error: noise.e_error,
            f_error: noise.f_error,
            g_error: noise.g_error,
            seed: 0,
        }
    }
}

/// Exporter settings (`[scene]` section)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Boundary side before scaling (cm)
    pub distance_cm: f64,
    /// Display units per centimeter
    pub scaling_factor: f64,
    pub anchor: BoundaryAnchor,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            distance_cm: 40.0,
            scaling_factor: 10.0,
            anchor: BoundaryAnchor::LeadParticle,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load from `path`, else the first readable default path, else defaults.
    ///
    /// An explicit path must exist and parse.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            let config = Self::from_file(path)?;
            log::info!("Loaded config from {}", path.display());
            return Ok(config);
        }

        for path in DEFAULT_CONFIG_PATHS {
            if let Ok(contents) = fs::read_to_string(path) {
                match toml::from_str(&contents) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", path);
                        return Ok(config);
                    }
                    Err(e) => log::warn!("Ignoring {}: {}", path, e),
                }
            }
        }
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn start_pose(&self) -> Particle {
        Particle::new(
            self.filter.start_x,
            self.filter.start_y,
            self.filter.start_theta,
        )
    }

    pub fn motion_model_config(&self) -> MotionModelConfig {
        MotionModelConfig {
            e_error: self.filter.e_error,
            f_error: self.filter.f_error,
            g_error: self.filter.g_error,
        }
    }

    pub fn exporter(&self) -> Result<SceneExporter> {
        let exporter = SceneExporter::new(self.scene.distance_cm, self.scene.scaling_factor)?;
        Ok(exporter.with_anchor(self.scene.anchor))
    }
}
