//! Device implementations

pub mod mock;

use crate::brick::Brick;
use crate::config::{DeviceConfig, RobotConfig};
use crate::error::{Error, Result};
use mock::MockBrick;

/// Create a brick based on configuration
///
/// The drive calibration tells the simulation which motor ports carry the
/// left and right wheels.
pub fn create_device(device: &DeviceConfig, robot: &RobotConfig) -> Result<Box<dyn Brick>> {
    match device.device_type.as_str() {
        "mock" => {
            log::info!("Device: {} (simulated)", device.name);
            let brick = MockBrick::new(
                device.simulation.clone(),
                robot.left_motor,
                robot.right_motor,
            );
            Ok(Box::new(brick))
        }
        _ => Err(Error::UnknownDevice(device.device_type.clone())),
    }
}
