//! Encoder-feedback drive primitives
//!
//! Implements [`RobotDriver`] on top of any [`Brick`]. Straight segments
//! convert centimeters to encoder degrees through the wheel circumference;
//! turns compare the summed wheel displacement against the raw argument.

use crate::brick::{Brick, SensorType};
use crate::config::RobotConfig;
use crate::driver::RobotDriver;
use crate::error::{Error, Result};
use std::f64::consts::PI;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Drive power for approaching an obstacle
///
/// Full speed when far away, a crawl just outside the stopping distance and
/// proportional power in between. Returns zero or negative power once the
/// obstacle is inside the stopping distance.
pub fn approach_power(distance_cm: f64, stopping_distance_cm: f64) -> f32 {
    let remaining = distance_cm - stopping_distance_cm;
    if remaining > 100.0 {
        75.0
    } else if remaining > 0.0 && remaining < 15.0 {
        10.0
    } else {
        (remaining * 0.75) as f32
    }
}

/// [`RobotDriver`] backed by brick encoder polling
pub struct EncoderDrive<B: Brick> {
    brick: B,
    config: RobotConfig,
    running: Option<Arc<AtomicBool>>,
}

impl<B: Brick> EncoderDrive<B> {
    /// Wrap a brick and configure its ultrasonic port
    ///
    /// Fails with [`Error::InvalidParameter`] on a calibration that could
    /// never complete a primitive.
    pub fn new(mut brick: B, config: RobotConfig) -> Result<Self> {
        check_calibration(&config)?;
        brick.set_sensor_type(config.sonar_port, SensorType::NxtUltrasonic)?;
        log::debug!(
            "Drive ready: left={} right={} sonar={}",
            config.left_motor,
            config.right_motor,
            config.sonar_port
        );
        Ok(Self {
            brick,
            config,
            running: None,
        })
    }

    /// Abort waits with [`Error::Interrupted`] once `running` is cleared
    pub fn with_running_flag(mut self, running: Arc<AtomicBool>) -> Self {
        self.running = Some(running);
        self
    }

    /// Underlying brick
    pub fn brick(&self) -> &B {
        &self.brick
    }

    /// Encoder degrees the reference wheel turns to cover `distance_cm`
    pub fn encoder_target(&self, distance_cm: f64) -> f64 {
        let circumference = 2.0 * PI * self.config.wheel_radius_cm;
        distance_cm / circumference * 360.0 * self.config.distance_calibration
    }

    fn set_power(&mut self, left: f32, right: f32) -> Result<()> {
        self.brick.set_motor_power(self.config.left_motor, left)?;
        self.brick.set_motor_power(self.config.right_motor, right)
    }

    fn wait_until<F>(&mut self, primitive: &'static str, mut done: F) -> Result<()>
    where
        F: FnMut(&mut B) -> Result<bool>,
    {
        let started = Instant::now();
        let poll = Duration::from_micros(self.config.poll_interval_us);
        loop {
            if done(&mut self.brick)? {
                return Ok(());
            }
            if let Some(running) = &self.running
                && !running.load(Ordering::Relaxed)
            {
                return Err(Error::Interrupted(primitive));
            }
            if self.config.timeout_ms > 0 {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                if elapsed_ms >= self.config.timeout_ms {
                    return Err(Error::Timeout {
                        primitive,
                        elapsed_ms,
                    });
                }
            }
            if !poll.is_zero() {
                thread::sleep(poll);
            }
        }
    }

    /// Release the motors if a wait failed, keeping the wait error
    fn release_on_error(&mut self, result: Result<()>) -> Result<()> {
        if let Err(e) = &result {
            log::warn!("Motion aborted: {}", e);
            if let Err(stop_err) = self.set_power(0.0, 0.0) {
                log::error!("Failed to release motors: {}", stop_err);
            }
        }
        result
    }
}

fn check_calibration(config: &RobotConfig) -> Result<()> {
    for (name, value) in [
        ("wheel_radius_cm", config.wheel_radius_cm),
        ("distance_calibration", config.distance_calibration),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "{} must be finite and positive, got {}",
                name, value
            )));
        }
    }
    for (name, power) in [
        ("forward_power", config.forward_power),
        ("turn_power", config.turn_power),
    ] {
        if !power.is_finite() || power == 0.0 {
            return Err(Error::InvalidParameter(format!(
                "{} must be finite and non-zero, got {}",
                name, power
            )));
        }
    }
    Ok(())
}

fn check_magnitude(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidParameter(format!(
            "{} must be finite and non-negative, got {}",
            name, value
        )));
    }
    Ok(())
}

fn displacement(now: i32, start: i32) -> i64 {
    (i64::from(now) - i64::from(start)).abs()
}

impl<B: Brick> RobotDriver for EncoderDrive<B> {
    fn move_forward(&mut self, distance_cm: f64) -> Result<()> {
        check_magnitude("distance_cm", distance_cm)?;
        let target = self.encoder_target(distance_cm);
        let reference = self.config.right_motor;
        let start = self.brick.motor_encoder(reference)?;
        log::debug!(
            "move_forward {:.1} cm -> {:.1} encoder degrees",
            distance_cm,
            target
        );

        let power = self.config.forward_power;
        self.set_power(power, power)?;
        let result = self.wait_until("move_forward", |brick| {
            Ok(displacement(brick.motor_encoder(reference)?, start) as f64 >= target)
        });
        self.release_on_error(result)
    }

    fn turn(&mut self, degrees: f64) -> Result<()> {
        check_magnitude("degrees", degrees)?;
        let (left, right) = (self.config.left_motor, self.config.right_motor);
        let start_right = self.brick.motor_encoder(right)?;
        let start_left = self.brick.motor_encoder(left)?;
        log::debug!("turn until wheel displacement reaches {:.1}", degrees);

        let power = self.config.turn_power;
        self.set_power(-power, power)?;
        let result = self.wait_until("turn", |brick| {
            let moved = displacement(brick.motor_encoder(right)?, start_right)
                + displacement(brick.motor_encoder(left)?, start_left);
            Ok(moved as f64 >= degrees)
        });
        self.release_on_error(result)
    }

    fn stop(&mut self) -> Result<()> {
        self.set_power(0.0, 0.0)?;
        if self.config.settle_ms > 0 {
            thread::sleep(Duration::from_millis(self.config.settle_ms));
        }
        Ok(())
    }

    fn read_range(&mut self) -> Result<f64> {
        self.brick.sensor(self.config.sonar_port).map(f64::from)
    }

    fn drive(&mut self, power: f32) -> Result<()> {
        self.set_power(power, power)
    }

    fn shutdown(&mut self) -> Result<()> {
        log::info!("Resetting brick to idle");
        self.brick.reset_all()
    }
}
