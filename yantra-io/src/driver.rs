//! RobotDriver trait definition

use crate::error::Result;

/// Segment-level robot driver
///
/// Every motion primitive blocks until encoder feedback confirms the
/// segment is physically complete.
pub trait RobotDriver {
    /// Drive straight ahead until the wheels have covered `distance_cm`
    fn move_forward(&mut self, distance_cm: f64) -> Result<()>;

    /// Rotate in place until the encoder differential reaches `degrees`
    fn turn(&mut self, degrees: f64) -> Result<()>;

    /// Cut motor power and wait for the robot to settle
    fn stop(&mut self) -> Result<()>;

    /// Current ultrasonic range reading (cm)
    fn read_range(&mut self) -> Result<f64>;

    /// Run both drive motors at the same power without waiting
    fn drive(&mut self, power: f32) -> Result<()>;

    /// Return all actuators to a safe idle state
    fn shutdown(&mut self) -> Result<()>;
}

impl<D: RobotDriver + ?Sized> RobotDriver for &mut D {
    fn move_forward(&mut self, distance_cm: f64) -> Result<()> {
        (**self).move_forward(distance_cm)
    }

    fn turn(&mut self, degrees: f64) -> Result<()> {
        (**self).turn(degrees)
    }

    fn stop(&mut self) -> Result<()> {
        (**self).stop()
    }

    fn read_range(&mut self) -> Result<f64> {
        (**self).read_range()
    }

    fn drive(&mut self, power: f32) -> Result<()> {
        (**self).drive(power)
    }

    fn shutdown(&mut self) -> Result<()> {
        (**self).shutdown()
    }
}
