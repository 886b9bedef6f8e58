//! Low-level port interface of the motor/sensor brick
//!
//! Mirrors the register-level view of a BrickPi-style controller: four
//! motor ports reporting cumulative encoder degrees and four sensor ports
//! that must be configured with a sensor type before they can be read.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Motor port on the brick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum MotorPort {
    A,
    B,
    C,
    D,
}

impl MotorPort {
    /// Slot index (A = 0 .. D = 3)
    pub fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
            Self::D => 3,
        }
    }
}

impl fmt::Display for MotorPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PORT_{:?}", self)
    }
}

/// Sensor port on the brick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum SensorPort {
    S1,
    S2,
    S3,
    S4,
}

impl SensorPort {
    /// Slot index (S1 = 0 .. S4 = 3)
    pub fn index(self) -> usize {
        match self {
            Self::S1 => 0,
            Self::S2 => 1,
            Self::S3 => 2,
            Self::S4 => 3,
        }
    }
}

impl fmt::Display for SensorPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PORT_{}", self.index() + 1)
    }
}

/// Sensor type a port is configured for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorType {
    /// Port unconfigured
    #[default]
    None,
    /// NXT ultrasonic ranger, reports centimeters (0-255)
    NxtUltrasonic,
}

/// Brick port interface
///
/// Implementations are expected to be cheap to poll: the drive primitives
/// read encoders in a tight loop until a segment completes.
pub trait Brick: Send {
    /// Configure a sensor port
    fn set_sensor_type(&mut self, port: SensorPort, sensor: SensorType) -> Result<()>;

    /// Set motor power in percent, clamped to [-100, 100]
    fn set_motor_power(&mut self, port: MotorPort, percent: f32) -> Result<()>;

    /// Cumulative encoder position in degrees
    fn motor_encoder(&mut self, port: MotorPort) -> Result<i32>;

    /// Current sensor reading
    ///
    /// Fails with [`crate::Error::SensorFault`] when the sensor has no valid value.
    fn sensor(&mut self, port: SensorPort) -> Result<f32>;

    /// Unconfigure sensors and release all motors
    fn reset_all(&mut self) -> Result<()>;
}

impl<B: Brick + ?Sized> Brick for Box<B> {
    fn set_sensor_type(&mut self, port: SensorPort, sensor: SensorType) -> Result<()> {
        (**self).set_sensor_type(port, sensor)
    }

    fn set_motor_power(&mut self, port: MotorPort, percent: f32) -> Result<()> {
        (**self).set_motor_power(port, percent)
    }

    fn motor_encoder(&mut self, port: MotorPort) -> Result<i32> {
        (**self).motor_encoder(port)
    }

    fn sensor(&mut self, port: SensorPort) -> Result<f32> {
        (**self).sensor(port)
    }

    fn reset_all(&mut self) -> Result<()> {
        (**self).reset_all()
    }
}
