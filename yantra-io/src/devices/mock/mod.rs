//! Mock brick for hardware-free runs
//!
//! Simulates the two drive motors, their encoders and an NXT ultrasonic
//! ranger inside a rectangular room.
//!
//! # Simulation Loop
//!
//! There is no background thread. Simulated time advances one step every
//! time an encoder is read, which is exactly what the drive primitives do
//! while they wait for a segment to complete:
//!
//! ```text
//! motor_encoder(port):
//! 1. every powered motor turns power * degrees_per_power_step degrees
//! 2. wheel travel on the floor is perturbed by multiplicative slip noise
//! 3. true pose advances with differential-drive kinematics
//! 4. the requested encoder count is returned (whole degrees)
//! ```
//!
//! The ultrasonic reading ray-casts from the true pose along its heading.

mod room;

pub use room::{MAX_RANGE_CM, Room};

use crate::brick::{Brick, MotorPort, SensorPort, SensorType};
use crate::config::SimulationConfig;
use crate::error::{Error, Result};
use crate::noise::NoiseGenerator;
use std::f64::consts::PI;

/// Ground-truth pose of the simulated robot (cm, cm, rad)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimPose {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
}

/// Simulated brick
pub struct MockBrick {
    config: SimulationConfig,
    noise: NoiseGenerator,
    room: Room,
    left: MotorPort,
    right: MotorPort,
    power: [f32; 4],
    encoder: [f64; 4],
    sensors: [SensorType; 4],
    pose: SimPose,
}

impl MockBrick {
    /// Create a simulated brick with wheels on the given motor ports
    pub fn new(config: SimulationConfig, left: MotorPort, right: MotorPort) -> Self {
        let noise = NoiseGenerator::new(config.random_seed);
        let room = Room::new(
            config.room_min_x,
            config.room_min_y,
            config.room_max_x,
            config.room_max_y,
        );
        let pose = SimPose {
            x: config.start_x,
            y: config.start_y,
            theta: config.start_theta,
        };
        log::debug!(
            "Mock brick: start ({:.1}, {:.1}, {:.3}), seed {}",
            pose.x,
            pose.y,
            pose.theta,
            noise.seed()
        );
        Self {
            config,
            noise,
            room,
            left,
            right,
            power: [0.0; 4],
            encoder: [0.0; 4],
            sensors: [SensorType::None; 4],
            pose,
        }
    }

    /// Ground-truth pose
    pub fn pose(&self) -> SimPose {
        self.pose
    }

    /// Current power on a motor port
    pub fn motor_power(&self, port: MotorPort) -> f32 {
        self.power[port.index()]
    }

    /// Configured type of a sensor port
    pub fn sensor_type(&self, port: SensorPort) -> SensorType {
        self.sensors[port.index()]
    }

    fn step(&mut self) {
        let rate = self.config.degrees_per_power_step;
        let mut turned = [0.0; 4];
        for (i, t) in turned.iter_mut().enumerate() {
            *t = f64::from(self.power[i]) * rate;
            self.encoder[i] += *t;
        }

        let cm_per_degree = 2.0 * PI * self.config.wheel_radius_cm / 360.0;
        let slip_l = 1.0 + self.noise.gaussian(self.config.slip_stddev);
        let slip_r = 1.0 + self.noise.gaussian(self.config.slip_stddev);
        let dl = turned[self.left.index()] * cm_per_degree * slip_l;
        let dr = turned[self.right.index()] * cm_per_degree * slip_r;

        let ds = (dl + dr) / 2.0;
        let dtheta = (dr - dl) / self.config.track_width_cm;
        let mid = self.pose.theta + dtheta / 2.0;
        self.pose.x += ds * mid.cos();
        self.pose.y += ds * mid.sin();
        self.pose.theta += dtheta;
    }

    fn fault(port: SensorPort, reason: &str) -> Error {
        Error::SensorFault {
            port: port.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl Brick for MockBrick {
    fn set_sensor_type(&mut self, port: SensorPort, sensor: SensorType) -> Result<()> {
        self.sensors[port.index()] = sensor;
        Ok(())
    }

    fn set_motor_power(&mut self, port: MotorPort, percent: f32) -> Result<()> {
        if percent.is_nan() {
            return Err(Error::InvalidParameter(format!("motor power for {} is NaN", port)));
        }
        self.power[port.index()] = percent.clamp(-100.0, 100.0);
        Ok(())
    }

    fn motor_encoder(&mut self, port: MotorPort) -> Result<i32> {
        self.step();
        Ok(self.encoder[port.index()] as i32)
    }

    fn sensor(&mut self, port: SensorPort) -> Result<f32> {
        if self.sensors[port.index()] != SensorType::NxtUltrasonic {
            return Err(Self::fault(port, "sensor not configured"));
        }
        if self.noise.chance(self.config.sensor_fault_rate) {
            return Err(Self::fault(port, "no valid reading"));
        }
        let SimPose { x, y, theta } = self.pose;
        let range =
            self.room.range_from(x, y, theta) + self.noise.gaussian(self.config.range_stddev);
        Ok(range.clamp(0.0, MAX_RANGE_CM).round() as f32)
    }

    fn reset_all(&mut self) -> Result<()> {
        self.power = [0.0; 4];
        self.sensors = [SensorType::None; 4];
        Ok(())
    }
}
