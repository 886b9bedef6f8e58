//! Drishti - Particle pose tracking for a segment-driving brick robot
//!
//! A propagate-only Monte Carlo pose tracker. The robot drives a square in
//! short straight segments and in-place turns; after each completed
//! primitive every particle is pushed through a noisy motion model and the
//! cloud is printed for an external plotter.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                      main                           │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │             tracker, sequencer, sonar               │  ← Orchestration
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │               localization, scene                   │  ← Filter + output
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │              event, config, error                   │  ← Foundation
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! Hardware access goes through [`yantra_io::RobotDriver`]; nothing below
//! the orchestration layer touches it.
//!
//! # Usage
//!
//! ```bash
//! # Drive the choreography on the simulated brick
//! cargo run --release -- run
//!
//! # Print sonar readings until Ctrl-C
//! cargo run --release -- --config drishti.toml sonar
//! ```

// Layer 1: Foundation
pub mod config;
pub mod error;
pub mod event;

// Layer 2: Filter and output
pub mod localization;
pub mod scene;

// Layer 3: Orchestration
pub mod sequencer;
pub mod sonar;
pub mod tracker;

pub use config::Config;
pub use error::{Error, Result};
pub use event::MotionEvent;
pub use localization::{MotionModel, MotionModelConfig, NoiseSource, Particle, ParticleCloud};
pub use scene::{BoundaryAnchor, SceneExporter, format_scalar};
pub use sequencer::{Choreography, MotionSequencer};
pub use sonar::{SonarConfig, SonarStats};
pub use tracker::{PoseTracker, track_choreography};
