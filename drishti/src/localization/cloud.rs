//! Particle cloud: the fixed-size set of pose hypotheses.

use crate::error::{Error, Result};

/// A single pose hypothesis.
///
/// `x` and `y` are in display units (centimeters times the scaling factor),
/// `theta` in radians. Headings accumulate without wrapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
}

impl Particle {
    pub const fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }
}

/// Ordered, fixed-size collection of particles.
///
/// The size is set at construction and never changes. Every particle
/// starts at the same pose: there is no initial uncertainty, it only
/// builds up through motion updates.
#[derive(Debug, Clone)]
pub struct ParticleCloud {
    particles: Vec<Particle>,
    initial: Particle,
}

impl ParticleCloud {
    /// Create `n` particles at `start`.
    pub fn new(n: usize, start: Particle) -> Result<Self> {
        if n == 0 {
            return Err(Error::EmptyCloud);
        }
        Ok(Self {
            particles: vec![start; n],
            initial: start,
        })
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Always false for a constructed cloud.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Particle at `index`.
    pub fn get(&self, index: usize) -> Result<Particle> {
        self.particles
            .get(index)
            .copied()
            .ok_or(Error::IndexOutOfRange {
                index,
                len: self.particles.len(),
            })
    }

    /// Overwrite the particle at `index`.
    pub fn set(&mut self, index: usize, particle: Particle) -> Result<()> {
        let len = self.particles.len();
        let slot = self
            .particles
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;
        *slot = particle;
        Ok(())
    }

    /// First particle; a cloud is never empty.
    pub fn lead(&self) -> Particle {
        self.particles[0]
    }

    /// All particles in order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Pose every particle started from.
    pub fn initial_pose(&self) -> Particle {
        self.initial
    }

    /// In-place access for the motion model; a slice cannot change the size.
    pub(crate) fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Mean pose for diagnostics.
    ///
    /// Position is the arithmetic mean; heading is the circular mean, so
    /// the result lies in (-pi, pi] even though particle headings do not.
    pub fn mean_pose(&self) -> Particle {
        let n = self.particles.len() as f64;
        let (mut sum_x, mut sum_y, mut sum_sin, mut sum_cos) = (0.0, 0.0, 0.0, 0.0);
        for p in &self.particles {
            sum_x += p.x;
            sum_y += p.y;
            sum_sin += p.theta.sin();
            sum_cos += p.theta.cos();
        }
        Particle::new(sum_x / n, sum_y / n, sum_sin.atan2(sum_cos))
    }
}
