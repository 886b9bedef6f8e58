//! Pose tracker: the filter side of a run.
//!
//! Owns the particle cloud, the motion model and the scene exporter, and
//! streams protocol lines to its output after every update.

use std::io::Write;

use yantra_io::{NoiseGenerator, RobotDriver};

use crate::config::Config;
use crate::error::Result;
use crate::event::MotionEvent;
use crate::localization::{MotionModel, NoiseSource, ParticleCloud};
use crate::scene::SceneExporter;
use crate::sequencer::MotionSequencer;

/// Drive the configured choreography and track it, streaming to `out`.
///
/// Returns the tracker after the last primitive. Pass `&mut driver` to
/// keep ownership and shut the driver down afterwards, even on failure.
pub fn track_choreography<D, W>(config: &Config, driver: D, out: W) -> Result<PoseTracker<W>>
where
    D: RobotDriver,
    W: Write,
{
    let mut tracker = PoseTracker::from_config(config, out)?;
    let mut sequencer = MotionSequencer::new(driver, &config.choreography)?;

    tracker.start()?;
    sequencer.run(|event| tracker.handle(event))?;
    Ok(tracker)
}

pub struct PoseTracker<W: Write, N: NoiseSource = NoiseGenerator> {
    cloud: ParticleCloud,
    model: MotionModel<N>,
    exporter: SceneExporter,
    out: W,
    updates: usize,
}

impl<W: Write> PoseTracker<W> {
    /// Tracker built from the `[filter]` and `[scene]` sections.
    pub fn from_config(config: &Config, out: W) -> Result<Self> {
        let cloud = ParticleCloud::new(config.filter.particles, config.start_pose())?;
        let noise = NoiseGenerator::new(config.filter.seed);
        log::info!(
            "Tracking {} particles from ({}, {}, {}), seed {}",
            cloud.len(),
            config.filter.start_x,
            config.filter.start_y,
            config.filter.start_theta,
            noise.seed()
        );
        let model = MotionModel::new(config.motion_model_config(), noise)?;
        Ok(Self::new(cloud, model, config.exporter()?, out))
    }
}

impl<W: Write, N: NoiseSource> PoseTracker<W, N> {
    pub fn new(
        cloud: ParticleCloud,
        model: MotionModel<N>,
        exporter: SceneExporter,
        out: W,
    ) -> Self {
        Self {
            cloud,
            model,
            exporter,
            out,
            updates: 0,
        }
    }

    /// Emit the initial particles followed by the boundary square.
    pub fn start(&mut self) -> Result<()> {
        self.exporter.write_particles(&self.cloud, &mut self.out)?;
        self.exporter.write_boundary(&self.cloud, &mut self.out)?;
        self.out.flush()?;
        Ok(())
    }

    /// Apply a completed motion and emit the updated particles.
    pub fn handle(&mut self, event: &MotionEvent) -> Result<()> {
        self.model
            .apply(&mut self.cloud, event, self.exporter.scaling_factor())?;
        self.updates += 1;

        self.exporter.write_particles(&self.cloud, &mut self.out)?;
        self.out.flush()?;

        let mean = self.cloud.mean_pose();
        log::debug!(
            "After {} ({} updates): mean pose ({:.1}, {:.1}, {:.3})",
            event,
            self.updates,
            mean.x,
            mean.y,
            mean.theta
        );
        Ok(())
    }

    pub fn cloud(&self) -> &ParticleCloud {
        &self.cloud
    }

    /// Motion updates applied so far.
    pub fn updates(&self) -> usize {
        self.updates
    }

    pub fn into_output(self) -> W {
        self.out
    }
}
