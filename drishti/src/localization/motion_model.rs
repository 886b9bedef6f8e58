//! Segment motion model for the particle cloud.
//!
//! Each commanded primitive moves every particle independently:
//!
//! - **translate**: the particle advances along its *own* heading by the
//!   commanded distance plus translational noise `e`, and its heading
//!   drifts by `f`. Diverging headings therefore produce diverging
//!   trajectories.
//! - **rotate**: the heading advances a fixed quarter turn plus noise `g`.
//!
//! There is no weighting or resampling; every particle stays equally
//! probable and uncertainty only grows.

use std::f64::consts::FRAC_PI_2;

use yantra_io::NoiseGenerator;

use super::cloud::ParticleCloud;
use crate::error::{Error, Result};
use crate::event::MotionEvent;

/// Heading change applied by every rotate update (radians).
///
/// The drive turns by a raw encoder-displacement count that is not tied to
/// a specific angle; the filter assumes each turn is a right angle
/// regardless of the commanded value.
pub const QUARTER_TURN: f64 = FRAC_PI_2;

/// Source of zero-mean Gaussian samples (abstracted for testing).
pub trait NoiseSource {
    /// Sample from N(0, std_dev); must return exactly 0.0 for `std_dev == 0`.
    fn gaussian(&mut self, std_dev: f64) -> f64;
}

impl NoiseSource for NoiseGenerator {
    fn gaussian(&mut self, std_dev: f64) -> f64 {
        NoiseGenerator::gaussian(self, std_dev)
    }
}

/// Noise standard deviations for the motion model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionModelConfig {
    /// Translational noise on the commanded distance (cm).
    pub e_error: f64,
    /// Heading drift per straight segment (rad).
    pub f_error: f64,
    /// Heading noise per turn (rad).
    pub g_error: f64,
}

impl Default for MotionModelConfig {
    fn default() -> Self {
        Self {
            e_error: 0.01,
            f_error: 0.002,
            g_error: 0.01,
        }
    }
}

impl MotionModelConfig {
    /// All noise disabled; updates become exact.
    pub fn noiseless() -> Self {
        Self {
            e_error: 0.0,
            f_error: 0.0,
            g_error: 0.0,
        }
    }

    fn validate(&self) -> Result<()> {
        for (name, sigma) in [
            ("e_error", self.e_error),
            ("f_error", self.f_error),
            ("g_error", self.g_error),
        ] {
            if !sigma.is_finite() || sigma < 0.0 {
                return Err(Error::InvalidArgument(format!(
                    "{} must be a finite, non-negative standard deviation, got {}",
                    name, sigma
                )));
            }
        }
        Ok(())
    }
}

/// Motion model with an injected noise source.
#[derive(Debug, Clone)]
pub struct MotionModel<N: NoiseSource = NoiseGenerator> {
    config: MotionModelConfig,
    noise: N,
}

fn require_finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!("{} must be finite, got {}", name, value)))
    }
}

impl<N: NoiseSource> MotionModel<N> {
    /// Create a motion model drawing from `noise`.
    pub fn new(config: MotionModelConfig, noise: N) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, noise })
    }

    /// Propagate every particle through a straight segment.
    ///
    /// Draws `e` then `f` for each particle in index order.
    pub fn translate(
        &mut self,
        cloud: &mut ParticleCloud,
        distance_cm: f64,
        scaling_factor: f64,
    ) -> Result<()> {
        require_finite("distance_cm", distance_cm)?;
        require_finite("scaling_factor", scaling_factor)?;

        for p in cloud.particles_mut() {
            let e = self.noise.gaussian(self.config.e_error);
            let f = self.noise.gaussian(self.config.f_error);
            let travel = distance_cm + e;
            let (sin, cos) = p.theta.sin_cos();
            p.x += travel * cos * scaling_factor;
            p.y += travel * sin * scaling_factor;
            p.theta += f;
        }

        log::trace!(
            "translate {} cm x{} over {} particles",
            distance_cm,
            scaling_factor,
            cloud.len()
        );
        Ok(())
    }

    /// Propagate every particle through an in-place turn.
    ///
    /// The commanded value is validated but the update is always
    /// [`QUARTER_TURN`] plus noise.
    pub fn rotate(&mut self, cloud: &mut ParticleCloud, commanded_degrees: f64) -> Result<()> {
        require_finite("commanded_degrees", commanded_degrees)?;

        for p in cloud.particles_mut() {
            let g = self.noise.gaussian(self.config.g_error);
            p.theta = p.theta + QUARTER_TURN + g;
        }

        log::trace!(
            "rotate (commanded {}) over {} particles",
            commanded_degrees,
            cloud.len()
        );
        Ok(())
    }

    /// Apply a completed motion event.
    pub fn apply(
        &mut self,
        cloud: &mut ParticleCloud,
        event: &MotionEvent,
        scaling_factor: f64,
    ) -> Result<()> {
        match *event {
            MotionEvent::Translate { distance_cm } => {
                self.translate(cloud, distance_cm, scaling_factor)
            }
            MotionEvent::Rotate { degrees } => self.rotate(cloud, degrees),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::localization::cloud::Particle;
    use approx::assert_relative_eq;
    use std::collections::VecDeque;

    const START: Particle = Particle::new(100.0, 100.0, 0.0);

    /// Replays a fixed list of samples, scaled by the requested sigma.
    struct ScriptedNoise {
        samples: VecDeque<f64>,
    }

    impl ScriptedNoise {
        fn new(samples: &[f64]) -> Self {
            Self {
                samples: samples.iter().copied().collect(),
            }
        }
    }

    impl NoiseSource for ScriptedNoise {
        fn gaussian(&mut self, std_dev: f64) -> f64 {
            self.samples.pop_front().unwrap_or(0.0) * std_dev
        }
    }

    fn seeded(seed: u64) -> MotionModel {
        MotionModel::new(MotionModelConfig::default(), NoiseGenerator::new(seed)).unwrap()
    }

    #[test]
    fn test_noiseless_scenario() {
        let mut cloud = ParticleCloud::new(3, START).unwrap();
        let mut model =
            MotionModel::new(MotionModelConfig::noiseless(), NoiseGenerator::new(1)).unwrap();

        model.translate(&mut cloud, 40.0, 10.0).unwrap();
        for p in cloud.particles() {
            assert_eq!(*p, Particle::new(500.0, 100.0, 0.0));
        }

        model.rotate(&mut cloud, 90.0).unwrap();
        for p in cloud.particles() {
            assert_eq!(*p, Particle::new(500.0, 100.0, FRAC_PI_2));
        }
    }

    #[test]
    fn test_noiseless_translate_follows_heading() {
        let heading = 0.7;
        let mut cloud = ParticleCloud::new(2, Particle::new(3.0, -4.0, heading)).unwrap();
        let mut model =
            MotionModel::new(MotionModelConfig::noiseless(), NoiseGenerator::new(1)).unwrap();

        model.translate(&mut cloud, 12.5, 2.0).unwrap();
        for p in cloud.particles() {
            assert_relative_eq!(p.x, 3.0 + 25.0 * heading.cos(), epsilon = 1e-12);
            assert_relative_eq!(p.y, -4.0 + 25.0 * heading.sin(), epsilon = 1e-12);
            assert_eq!(p.theta, heading);
        }
    }

    #[test]
    fn test_deterministic_under_seed() {
        let run = |seed| {
            let mut cloud = ParticleCloud::new(10, START).unwrap();
            let mut model = seeded(seed);
            for _ in 0..4 {
                model.translate(&mut cloud, 10.0, 10.0).unwrap();
            }
            model.rotate(&mut cloud, 300.0).unwrap();
            cloud
                .particles()
                .iter()
                .flat_map(|p| [p.x.to_bits(), p.y.to_bits(), p.theta.to_bits()])
                .collect::<Vec<_>>()
        };

        assert_eq!(run(42), run(42));
        assert_ne!(run(42), run(43));
    }

    #[test]
    fn test_size_invariant() {
        let mut cloud = ParticleCloud::new(7, START).unwrap();
        let mut model = seeded(5);
        for i in 0..25 {
            if i % 5 == 4 {
                model.rotate(&mut cloud, 300.0).unwrap();
            } else {
                model.translate(&mut cloud, 10.0, 10.0).unwrap();
            }
            assert_eq!(cloud.len(), 7);
        }
    }

    #[test]
    fn test_noise_spreads_cloud() {
        let mut cloud = ParticleCloud::new(50, START).unwrap();
        let mut model = seeded(11);
        for _ in 0..4 {
            model.translate(&mut cloud, 10.0, 10.0).unwrap();
        }

        let xs: Vec<f64> = cloud.particles().iter().map(|p| p.x).collect();
        let min = xs.iter().copied().fold(f64::INFINITY, f64::min);
        let max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert!(max > min, "particles should diverge");
        // 4 segments of 10 cm scaled by 10 from x = 100
        let mean = xs.iter().sum::<f64>() / xs.len() as f64;
        assert!((mean - 500.0).abs() < 2.0, "mean x = {}", mean);
    }

    #[test]
    fn test_draws_are_independent_per_particle() {
        let config = MotionModelConfig {
            e_error: 1.0,
            f_error: 1.0,
            g_error: 1.0,
        };
        // Draw order: (e0, f0), (e1, f1), (e2, f2)
        let baseline = [0.5, 0.01, -0.3, 0.02, 0.1, -0.01];
        let mut perturbed = baseline;
        perturbed[2] = 3.0; // only e1 changes
        perturbed[3] = -0.4; // and f1

        let mut a = ParticleCloud::new(3, START).unwrap();
        let mut b = ParticleCloud::new(3, START).unwrap();
        MotionModel::new(config, ScriptedNoise::new(&baseline))
            .unwrap()
            .translate(&mut a, 10.0, 10.0)
            .unwrap();
        MotionModel::new(config, ScriptedNoise::new(&perturbed))
            .unwrap()
            .translate(&mut b, 10.0, 10.0)
            .unwrap();

        assert_eq!(a.get(0).unwrap(), b.get(0).unwrap());
        assert_eq!(a.get(2).unwrap(), b.get(2).unwrap());
        assert_ne!(a.get(1).unwrap(), b.get(1).unwrap());

        // e1 = 3.0 moves particle 1 by (10 + 3) * 10 along heading 0
        assert_relative_eq!(b.get(1).unwrap().x, 230.0, epsilon = 1e-12);
        assert_relative_eq!(b.get(1).unwrap().theta, -0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_rotate_ignores_commanded_value() {
        let mut a = ParticleCloud::new(4, START).unwrap();
        let mut b = ParticleCloud::new(4, START).unwrap();
        seeded(8).rotate(&mut a, 90.0).unwrap();
        seeded(8).rotate(&mut b, 300.0).unwrap();
        assert_eq!(a.particles(), b.particles());
        for p in a.particles() {
            assert_relative_eq!(p.theta, QUARTER_TURN, epsilon = 0.1);
        }
    }

    #[test]
    fn test_headings_accumulate_without_wrap() {
        let mut cloud = ParticleCloud::new(1, START).unwrap();
        let mut model =
            MotionModel::new(MotionModelConfig::noiseless(), NoiseGenerator::new(1)).unwrap();
        for _ in 0..8 {
            model.rotate(&mut cloud, 90.0).unwrap();
        }
        let theta = cloud.get(0).unwrap().theta;
        assert_relative_eq!(theta, 4.0 * std::f64::consts::PI, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_non_finite_input() {
        let mut cloud = ParticleCloud::new(2, START).unwrap();
        let mut model = seeded(3);

        assert!(matches!(
            model.translate(&mut cloud, f64::NAN, 10.0),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            model.translate(&mut cloud, 10.0, f64::INFINITY),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            model.rotate(&mut cloud, f64::NEG_INFINITY),
            Err(Error::InvalidArgument(_))
        ));
        // Rejected updates leave the cloud untouched
        assert!(cloud.particles().iter().all(|p| *p == START));
    }

    #[test]
    fn test_rejects_bad_config() {
        let config = MotionModelConfig {
            f_error: -0.1,
            ..Default::default()
        };
        assert!(MotionModel::new(config, NoiseGenerator::new(1)).is_err());
    }

    #[test]
    fn test_apply_dispatches_events() {
        let mut cloud = ParticleCloud::new(2, START).unwrap();
        let mut model =
            MotionModel::new(MotionModelConfig::noiseless(), NoiseGenerator::new(1)).unwrap();

        model
            .apply(&mut cloud, &MotionEvent::Translate { distance_cm: 10.0 }, 10.0)
            .unwrap();
        model
            .apply(&mut cloud, &MotionEvent::Rotate { degrees: 300.0 }, 10.0)
            .unwrap();

        assert_eq!(cloud.get(1).unwrap(), Particle::new(200.0, 100.0, FRAC_PI_2));
    }
}
