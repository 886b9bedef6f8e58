//! Configuration for YantraIO devices and drive primitives
//!
//! All structures deserialize from TOML sections with every field optional;
//! missing values fall back to the calibration of the two-motor
//! brick robot (3.24 cm wheels, motors on ports A and D, ultrasonic on S1).

use crate::brick::{MotorPort, SensorPort};
use serde::{Deserialize, Serialize};

/// Device selection (`[device]` section)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Device type: currently only "mock"
    #[serde(rename = "type")]
    pub device_type: String,
    /// Human readable name for logs
    pub name: String,
    /// Simulation parameters, used by the mock device
    pub simulation: SimulationConfig,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            device_type: "mock".to_string(),
            name: "Simulated brick".to_string(),
            simulation: SimulationConfig::default(),
        }
    }
}

/// Simulated brick parameters (`[device.simulation]` section)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Start pose of the simulated robot (cm, cm, rad)
    pub start_x: f64,
    pub start_y: f64,
    pub start_theta: f64,

    /// Room walls, axis aligned (cm)
    pub room_min_x: f64,
    pub room_min_y: f64,
    pub room_max_x: f64,
    pub room_max_y: f64,

    /// Encoder degrees advanced per percent of power per simulation step
    pub degrees_per_power_step: f64,
    /// Distance between wheel contact points (cm)
    pub track_width_cm: f64,
    /// Wheel radius (cm)
    pub wheel_radius_cm: f64,

    /// Multiplicative wheel slip standard deviation
    pub slip_stddev: f64,
    /// Ultrasonic range noise standard deviation (cm)
    pub range_stddev: f64,
    /// Probability of an ultrasonic read fault (0.0-1.0)
    pub sensor_fault_rate: f64,

    /// Random seed (0 = random each run)
    pub random_seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_x: 20.0,
            start_y: 20.0,
            start_theta: 0.0,
            room_min_x: 0.0,
            room_min_y: 0.0,
            room_max_x: 120.0,
            room_max_y: 120.0,
            degrees_per_power_step: 0.05,
            track_width_cm: 11.5,
            wheel_radius_cm: 3.24,
            slip_stddev: 0.01,
            range_stddev: 0.5,
            sensor_fault_rate: 0.02,
            random_seed: 0,
        }
    }
}

/// Drive primitive calibration (`[drive]` section)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RobotConfig {
    /// Left drive motor
    pub left_motor: MotorPort,
    /// Right drive motor, also the reference encoder for straight moves
    pub right_motor: MotorPort,
    /// Ultrasonic ranger port
    pub sonar_port: SensorPort,

    /// Wheel radius (cm)
    pub wheel_radius_cm: f64,
    /// Empirical correction applied to the straight-line encoder target
    pub distance_calibration: f64,

    /// Motor power for straight segments (percent)
    pub forward_power: f32,
    /// Motor power for in-place turns (percent, left wheel reversed)
    pub turn_power: f32,

    /// Settle delay after stop (ms)
    pub settle_ms: u64,
    /// Encoder polling interval (us, 0 = busy poll)
    pub poll_interval_us: u64,
    /// Abort a primitive after this long (ms, 0 = wait forever)
    pub timeout_ms: u64,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            left_motor: MotorPort::A,
            right_motor: MotorPort::D,
            sonar_port: SensorPort::S1,
            wheel_radius_cm: 3.24,
            distance_calibration: 0.997,
            forward_power: 30.0,
            turn_power: 20.0,
            settle_ms: 1000,
            poll_interval_us: 0,
            timeout_ms: 0,
        }
    }
}
