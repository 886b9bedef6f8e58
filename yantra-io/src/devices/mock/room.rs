//! Rectangular room for ultrasonic ray casting

/// Longest distance the NXT ultrasonic sensor reports (cm)
pub const MAX_RANGE_CM: f64 = 255.0;

/// Axis-aligned room, walls on all four sides (cm)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Room {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Room {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }

    /// Distance from (x, y) along `heading` to the first wall.
    ///
    /// Saturates at [`MAX_RANGE_CM`]; a point outside the room sees nothing.
    pub fn range_from(&self, x: f64, y: f64, heading: f64) -> f64 {
        if !self.contains(x, y) {
            return MAX_RANGE_CM;
        }
        let (sin, cos) = heading.sin_cos();
        let mut nearest = f64::INFINITY;

        if cos > 1e-9 {
            nearest = nearest.min((self.max_x - x) / cos);
        } else if cos < -1e-9 {
            nearest = nearest.min((self.min_x - x) / cos);
        }
        if sin > 1e-9 {
            nearest = nearest.min((self.max_y - y) / sin);
        } else if sin < -1e-9 {
            nearest = nearest.min((self.min_y - y) / sin);
        }

        nearest.min(MAX_RANGE_CM)
    }
}
