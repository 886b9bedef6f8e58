//! YantraIO - Hardware abstraction for a two-motor brick robot
//!
//! This library provides the segment-level drive interface used by the
//! pose tracker, together with a simulated brick for hardware-free runs.
//!
//! ```text
//! RobotDriver (move_forward, turn, stop, read_range, shutdown)
//!      │
//! EncoderDrive<B>      ← encoder polling, calibration, timeouts
//!      │
//! Brick                ← motor power, encoder degrees, sensor ports
//!      │
//! MockBrick            ← differential-drive + ultrasonic simulation
//! ```

pub mod brick;
pub mod config;
pub mod devices;
pub mod drive;
pub mod driver;
pub mod error;
pub mod noise;

// Re-export commonly used types
pub use brick::{Brick, MotorPort, SensorPort, SensorType};
pub use config::{DeviceConfig, RobotConfig, SimulationConfig};
pub use devices::create_device;
pub use drive::{EncoderDrive, approach_power};
pub use driver::RobotDriver;
pub use error::{Error, Result};
pub use noise::NoiseGenerator;
