//! Sonar monitor.
//!
//! Polls the ultrasonic ranger and prints one reading per line. Sensor
//! faults are logged and polling continues; any other driver error ends
//! the loop. In approach mode every reading also sets the drive power so
//! the robot slows down and halts at the stopping distance.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use yantra_io::{RobotDriver, approach_power};

use crate::error::Result;

/// Sonar loop settings (`[sonar]` section).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SonarConfig {
    /// Delay between readings (ms)
    pub poll_interval_ms: u64,
    /// Distance at which approach mode halts (cm)
    pub stopping_distance_cm: f64,
    /// Drive toward the obstacle while monitoring
    pub approach: bool,
    /// Stop after this many polls (0 = until interrupted)
    pub max_samples: usize,
}

impl Default for SonarConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 20,
            stopping_distance_cm: 30.0,
            approach: false,
            max_samples: 0,
        }
    }
}

/// Counters for a finished monitor run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SonarStats {
    pub readings: usize,
    pub faults: usize,
}

impl SonarStats {
    pub fn polls(&self) -> usize {
        self.readings + self.faults
    }
}

/// Poll the ranger until `running` drops or the sample limit is reached.
pub fn monitor<D, W>(
    driver: &mut D,
    config: &SonarConfig,
    running: &AtomicBool,
    out: &mut W,
) -> Result<SonarStats>
where
    D: RobotDriver,
    W: Write,
{
    let poll = Duration::from_millis(config.poll_interval_ms);
    let mut stats = SonarStats::default();
    log::info!(
        "Sonar monitor started (approach: {}, stopping distance: {} cm)",
        config.approach,
        config.stopping_distance_cm
    );

    while running.load(Ordering::Relaxed) {
        if config.max_samples > 0 && stats.polls() >= config.max_samples {
            break;
        }

        match driver.read_range() {
            Ok(range) => {
                stats.readings += 1;
                writeln!(out, "{}", range)?;
                out.flush()?;
                if config.approach {
                    driver.drive(approach_power(range, config.stopping_distance_cm))?;
                }
            }
            Err(e) if e.is_sensor_fault() => {
                stats.faults += 1;
                log::warn!("{}", e);
            }
            Err(e) => return Err(e.into()),
        }

        if !poll.is_zero() {
            thread::sleep(poll);
        }
    }

    if config.approach {
        driver.drive(0.0)?;
    }
    log::info!(
        "Sonar monitor stopped: {} readings, {} faults",
        stats.readings,
        stats.faults
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct ScriptedRanger {
        readings: VecDeque<yantra_io::Result<f64>>,
        powers: Vec<f32>,
    }

    impl ScriptedRanger {
        fn new(readings: Vec<yantra_io::Result<f64>>) -> Self {
            Self {
                readings: readings.into(),
                powers: Vec::new(),
            }
        }
    }

    fn fault() -> yantra_io::Result<f64> {
        Err(yantra_io::Error::SensorFault {
            port: "PORT_1".to_string(),
            reason: "no valid reading".to_string(),
        })
    }

    impl RobotDriver for ScriptedRanger {
        fn move_forward(&mut self, _distance_cm: f64) -> yantra_io::Result<()> {
            Ok(())
        }

        fn turn(&mut self, _degrees: f64) -> yantra_io::Result<()> {
            Ok(())
        }

        fn stop(&mut self) -> yantra_io::Result<()> {
            Ok(())
        }

        fn read_range(&mut self) -> yantra_io::Result<f64> {
            self.readings.pop_front().unwrap_or(Ok(255.0))
        }

        fn drive(&mut self, power: f32) -> yantra_io::Result<()> {
            self.powers.push(power);
            Ok(())
        }

        fn shutdown(&mut self) -> yantra_io::Result<()> {
            Ok(())
        }
    }

    fn config(max_samples: usize) -> SonarConfig {
        SonarConfig {
            poll_interval_ms: 0,
            max_samples,
            ..Default::default()
        }
    }

    #[test]
    fn test_prints_readings_and_skips_faults() {
        let mut ranger = ScriptedRanger::new(vec![Ok(100.0), fault(), Ok(42.0)]);
        let running = AtomicBool::new(true);
        let mut out = Vec::new();

        let stats = monitor(&mut ranger, &config(3), &running, &mut out).unwrap();

        assert_eq!(
            stats,
            SonarStats {
                readings: 2,
                faults: 1
            }
        );
        assert_eq!(String::from_utf8(out).unwrap(), "100\n42\n");
        assert!(ranger.powers.is_empty());
    }

    #[test]
    fn test_stops_when_not_running() {
        let mut ranger = ScriptedRanger::new(vec![Ok(100.0)]);
        let running = AtomicBool::new(false);
        let mut out = Vec::new();

        let stats = monitor(&mut ranger, &config(0), &running, &mut out).unwrap();
        assert_eq!(stats.polls(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_other_errors_end_the_loop() {
        let mut ranger = ScriptedRanger::new(vec![
            Ok(80.0),
            Err(yantra_io::Error::Interrupted("read_range")),
        ]);
        let running = AtomicBool::new(true);
        let mut out = Vec::new();

        let err = monitor(&mut ranger, &config(0), &running, &mut out).unwrap_err();
        assert!(err.is_interrupted());
    }

    #[test]
    fn test_approach_sets_power() {
        let mut ranger = ScriptedRanger::new(vec![Ok(200.0), Ok(40.0), Ok(25.0)]);
        let running = AtomicBool::new(true);
        let mut out = Vec::new();
        let config = SonarConfig {
            approach: true,
            ..config(3)
        };

        monitor(&mut ranger, &config, &running, &mut out).unwrap();
        assert_eq!(ranger.powers, vec![75.0, 10.0, -3.75, 0.0]);
    }
}
