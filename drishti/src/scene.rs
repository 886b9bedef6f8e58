//! Scene export for the external plotting process.
//!
//! The renderer reads standard output line by line and understands two
//! shapes:
//!
//! ```text
//! drawLine:(x1, y1, x2, y2)
//! drawParticles:(x0, y0, theta0)(x1, y1, theta1)...
//! ```
//!
//! Scalars use the shortest round-trip decimal form with an exponent only
//! below 1e-4 or from 1e16 up (`100.0`, `0.001`, `1e-05`, `1.5e+16`).
//! Existing renderers parse exactly this text, so [`format_scalar`] must
//! not change.

use std::fmt;
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::localization::{Particle, ParticleCloud};

/// Where the boundary square is anchored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryAnchor {
    /// Current position of particle 0; the square follows its drift.
    #[default]
    LeadParticle,
    /// Pose the cloud was created at; a fixed frame.
    InitialPose,
}

/// One boundary edge in display units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            format_scalar(self.x1),
            format_scalar(self.y1),
            format_scalar(self.x2),
            format_scalar(self.y2)
        )
    }
}

/// Format a float the way the renderer protocol expects.
pub fn format_scalar(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // Debug already picks shortest digits and the same exponent thresholds;
    // only the exponent spelling differs ("1e-5" vs "1e-05").
    let repr = format!("{:?}", value);
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => repr,
    }
}

fn format_pose(p: &Particle) -> String {
    format!(
        "({}, {}, {})",
        format_scalar(p.x),
        format_scalar(p.y),
        format_scalar(p.theta)
    )
}

/// Renders the cloud and its boundary square as protocol lines.
///
/// Rendering only reads the cloud.
#[derive(Debug, Clone)]
pub struct SceneExporter {
    distance_cm: f64,
    scaling_factor: f64,
    anchor: BoundaryAnchor,
}

impl SceneExporter {
    /// Exporter for a square of side `distance_cm * scaling_factor`.
    pub fn new(distance_cm: f64, scaling_factor: f64) -> Result<Self> {
        for (name, value) in [
            ("distance_cm", distance_cm),
            ("scaling_factor", scaling_factor),
        ] {
            if !value.is_finite() {
                return Err(Error::InvalidArgument(format!("{} must be finite, got {}", name, value)));
            }
        }
        Ok(Self {
            distance_cm,
            scaling_factor,
            anchor: BoundaryAnchor::default(),
        })
    }

    pub fn with_anchor(mut self, anchor: BoundaryAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn scaling_factor(&self) -> f64 {
        self.scaling_factor
    }

    /// Side of the boundary square in display units.
    pub fn side_length(&self) -> f64 {
        self.distance_cm * self.scaling_factor
    }

    /// The four edges, counter-clockwise from the anchor corner.
    pub fn boundary_segments(&self, cloud: &ParticleCloud) -> [Segment; 4] {
        let origin = match self.anchor {
            BoundaryAnchor::LeadParticle => cloud.lead(),
            BoundaryAnchor::InitialPose => cloud.initial_pose(),
        };
        let (x, y) = (origin.x, origin.y);
        let s = self.side_length();
        let corners = [(x, y), (x + s, y), (x + s, y + s), (x, y + s)];

        std::array::from_fn(|i| {
            let (x1, y1) = corners[i];
            let (x2, y2) = corners[(i + 1) % corners.len()];
            Segment { x1, y1, x2, y2 }
        })
    }

    /// Four `drawLine:` lines.
    pub fn render_boundary(&self, cloud: &ParticleCloud) -> Vec<String> {
        self.boundary_segments(cloud)
            .iter()
            .map(|segment| format!("drawLine:{}", segment))
            .collect()
    }

    /// One `drawParticles:` line holding every pose, no separators.
    pub fn render_particles(&self, cloud: &ParticleCloud) -> String {
        let mut line = String::from("drawParticles:");
        for p in cloud.particles() {
            line.push_str(&format_pose(p));
        }
        line
    }

    pub fn write_boundary<W: Write>(&self, cloud: &ParticleCloud, out: &mut W) -> Result<()> {
        for line in self.render_boundary(cloud) {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }

    pub fn write_particles<W: Write>(&self, cloud: &ParticleCloud, out: &mut W) -> Result<()> {
        writeln!(out, "{}", self.render_particles(cloud))?;
        Ok(())
    }
}
