//! Motion sequencer.
//!
//! Drives the robot through the square choreography one primitive at a
//! time and reports each physically completed primitive as a
//! [`MotionEvent`]. The sequencer knows nothing about the filter; whoever
//! consumes the events decides what to do with them.
//!
//! ```text
//! for each side:
//!     steps_per_side x (move_forward(step) -> Translate -> stop)
//!     turn(turn_degrees) -> Rotate -> stop
//! ```

use std::iter;

use serde::{Deserialize, Serialize};
use yantra_io::RobotDriver;

use crate::error::{Error, Result};
use crate::event::MotionEvent;

/// Shape of the driven path (`[choreography]` section).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Choreography {
    /// Number of sides driven, each followed by a turn
    pub sides: usize,
    /// Straight segments per side
    pub steps_per_side: usize,
    /// Length of one side (cm)
    pub side_cm: f64,
    /// Argument passed to the turn primitive after each side
    pub turn_degrees: f64,
}

impl Default for Choreography {
    fn default() -> Self {
        Self {
            sides: 4,
            steps_per_side: 4,
            side_cm: 40.0,
            turn_degrees: 300.0,
        }
    }
}

impl Choreography {
    /// Length of each straight segment (cm).
    pub fn step_cm(&self) -> f64 {
        self.side_cm / self.steps_per_side as f64
    }

    /// Total number of primitives, `None` if it does not fit in `usize`.
    pub fn primitive_count(&self) -> Option<usize> {
        self.sides.checked_mul(self.steps_per_side.checked_add(1)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.steps_per_side == 0 {
            return Err(Error::InvalidArgument(
                "choreography needs at least one step per side".to_string(),
            ));
        }
        if self.primitive_count().is_none() {
            return Err(Error::InvalidArgument(format!(
                "{} sides of {} steps is too many primitives",
                self.sides, self.steps_per_side
            )));
        }
        if !self.side_cm.is_finite() || self.side_cm < 0.0 {
            return Err(Error::InvalidArgument(format!(
                "side_cm must be finite and non-negative, got {}",
                self.side_cm
            )));
        }
        if !self.turn_degrees.is_finite() || self.turn_degrees < 0.0 {
            return Err(Error::InvalidArgument(format!(
                "turn_degrees must be finite and non-negative, got {}",
                self.turn_degrees
            )));
        }
        Ok(())
    }

    /// Ordered primitives for the whole run, generated on demand.
    pub fn plan(&self) -> impl Iterator<Item = MotionEvent> + '_ {
        let step = MotionEvent::Translate {
            distance_cm: self.step_cm(),
        };
        let turn = MotionEvent::Rotate {
            degrees: self.turn_degrees,
        };
        (0..self.sides)
            .flat_map(move |_| iter::repeat_n(step, self.steps_per_side).chain(iter::once(turn)))
    }
}

/// Executes a choreography on a [`RobotDriver`].
pub struct MotionSequencer<D: RobotDriver> {
    driver: D,
    choreography: Choreography,
    total: usize,
}

impl<D: RobotDriver> MotionSequencer<D> {
    pub fn new(driver: D, choreography: &Choreography) -> Result<Self> {
        choreography.validate()?;
        Ok(Self {
            driver,
            choreography: choreography.clone(),
            total: choreography.primitive_count().unwrap_or(usize::MAX),
        })
    }

    /// Run the plan, handing each completed primitive to `on_event`.
    ///
    /// The robot is stopped after every primitive, once the event has been
    /// consumed. Returns the number of completed primitives; the first
    /// driver or consumer error aborts the run. A consumer error still
    /// stops the robot.
    pub fn run<F>(&mut self, mut on_event: F) -> Result<usize>
    where
        F: FnMut(&MotionEvent) -> Result<()>,
    {
        log::info!("Starting choreography: {} primitives", self.total);
        let mut completed = 0;
        for event in self.choreography.plan() {
            match event {
                MotionEvent::Translate { distance_cm } => self.driver.move_forward(distance_cm)?,
                MotionEvent::Rotate { degrees } => self.driver.turn(degrees)?,
            }
            completed += 1;
            log::debug!("[{}/{}] completed {}", completed, self.total, event);

            if let Err(e) = on_event(&event) {
                if let Err(stop_err) = self.driver.stop() {
                    log::error!("Failed to stop after rejected event: {}", stop_err);
                }
                return Err(e);
            }
            self.driver.stop()?;
        }
        log::info!("Choreography complete");
        Ok(completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Forward(f64),
        Turn(f64),
        Stop,
    }

    #[derive(Default)]
    struct RecordingDriver {
        calls: Vec<Call>,
        fail_on_call: Option<usize>,
    }

    impl RecordingDriver {
        fn record(&mut self, call: Call) -> yantra_io::Result<()> {
            if self.fail_on_call == Some(self.calls.len()) {
                return Err(yantra_io::Error::Interrupted("recording"));
            }
            self.calls.push(call);
            Ok(())
        }
    }

    impl RobotDriver for RecordingDriver {
        fn move_forward(&mut self, distance_cm: f64) -> yantra_io::Result<()> {
            self.record(Call::Forward(distance_cm))
        }

        fn turn(&mut self, degrees: f64) -> yantra_io::Result<()> {
            self.record(Call::Turn(degrees))
        }

        fn stop(&mut self) -> yantra_io::Result<()> {
            self.record(Call::Stop)
        }

        fn read_range(&mut self) -> yantra_io::Result<f64> {
            Ok(0.0)
        }

        fn drive(&mut self, _power: f32) -> yantra_io::Result<()> {
            Ok(())
        }

        fn shutdown(&mut self) -> yantra_io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_default_plan() {
        let choreography = Choreography::default();
        let plan: Vec<MotionEvent> = choreography.plan().collect();
        assert_eq!(plan.len(), 20);
        assert_eq!(choreography.primitive_count(), Some(20));
        assert_eq!(plan[0], MotionEvent::Translate { distance_cm: 10.0 });
        assert_eq!(plan[4], MotionEvent::Rotate { degrees: 300.0 });
        let rotations = plan
            .iter()
            .filter(|e| matches!(e, MotionEvent::Rotate { .. }))
            .count();
        assert_eq!(rotations, 4);
    }

    #[test]
    fn test_run_orders_primitive_event_stop() {
        let choreography = Choreography {
            sides: 1,
            steps_per_side: 2,
            side_cm: 20.0,
            turn_degrees: 90.0,
        };
        let mut driver = RecordingDriver::default();
        let mut sequencer = MotionSequencer::new(&mut driver, &choreography).unwrap();

        let mut seen = Vec::new();
        let completed = sequencer
            .run(|event| {
                seen.push(*event);
                Ok(())
            })
            .unwrap();

        assert_eq!(completed, 3);
        assert_eq!(
            seen,
            vec![
                MotionEvent::Translate { distance_cm: 10.0 },
                MotionEvent::Translate { distance_cm: 10.0 },
                MotionEvent::Rotate { degrees: 90.0 },
            ]
        );
        assert_eq!(
            driver.calls,
            vec![
                Call::Forward(10.0),
                Call::Stop,
                Call::Forward(10.0),
                Call::Stop,
                Call::Turn(90.0),
                Call::Stop,
            ]
        );
    }

    #[test]
    fn test_driver_error_aborts() {
        let driver = RecordingDriver {
            fail_on_call: Some(2),
            ..Default::default()
        };
        let mut sequencer = MotionSequencer::new(driver, &Choreography::default()).unwrap();

        let mut events = 0;
        let err = sequencer
            .run(|_| {
                events += 1;
                Ok(())
            })
            .unwrap_err();

        assert!(err.is_interrupted());
        assert_eq!(events, 1);
    }

    #[test]
    fn test_consumer_error_still_stops() {
        let mut driver = RecordingDriver::default();
        let mut sequencer = MotionSequencer::new(&mut driver, &Choreography::default()).unwrap();
        let result = sequencer.run(|_| Err(Error::InvalidArgument("rejected".to_string())));

        assert!(matches!(result, Err(Error::InvalidArgument(_))));
        assert_eq!(driver.calls, vec![Call::Forward(10.0), Call::Stop]);
    }

    #[test]
    fn test_validate() {
        let bad = Choreography {
            steps_per_side: 0,
            ..Default::default()
        };
        assert!(MotionSequencer::new(RecordingDriver::default(), &bad).is_err());

        let bad = Choreography {
            turn_degrees: f64::NAN,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_plan() {
        let huge: Choreography = toml::from_str("sides = 9223372036854775807").unwrap();
        assert_eq!(huge.primitive_count(), None);
        assert!(matches!(huge.validate(), Err(Error::InvalidArgument(_))));
        assert!(MotionSequencer::new(RecordingDriver::default(), &huge).is_err());

        // The plan is lazy, so even an unrunnable one can be inspected
        assert_eq!(huge.plan().take(6).count(), 6);
    }
}
