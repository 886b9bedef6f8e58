//! Localization module.
//!
//! Propagate-only Monte Carlo pose tracking: a fixed cloud of equally
//! weighted pose hypotheses pushed forward through a noisy segment motion
//! model.
//!
//! # Components
//!
//! - [`ParticleCloud`]: owns the particles, bounds-checked access
//! - [`MotionModel`]: translate/rotate updates with injected noise
//! - [`NoiseSource`]: RNG seam, implemented by the seeded generator
//!
//! # Example
//!
//! ```
//! use drishti::localization::{MotionModel, MotionModelConfig, Particle, ParticleCloud};
//! use yantra_io::NoiseGenerator;
//!
//! let mut cloud = ParticleCloud::new(10, Particle::new(100.0, 100.0, 0.0))?;
//! let mut model = MotionModel::new(MotionModelConfig::default(), NoiseGenerator::new(42))?;
//!
//! model.translate(&mut cloud, 10.0, 10.0)?;
//! model.rotate(&mut cloud, 90.0)?;
//! assert_eq!(cloud.len(), 10);
//! # Ok::<(), drishti::Error>(())
//! ```

mod cloud;
mod motion_model;

pub use cloud::{Particle, ParticleCloud};
pub use motion_model::{MotionModel, MotionModelConfig, NoiseSource, QUARTER_TURN};
