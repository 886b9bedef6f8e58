//! Drishti command-line entry point
//!
//! Protocol lines go to stdout, logs to stderr.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::{Parser, Subcommand};
use yantra_io::{EncoderDrive, RobotDriver, create_device};

use drishti::{Config, Result, sonar, track_choreography};

/// Particle pose tracker for a two-motor brick robot
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path (default: drishti.toml, /etc/drishti.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the filter noise and the simulated brick (0 = random)
    #[arg(short, long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
enum Command {
    /// Drive the square choreography and stream the particle cloud (default)
    Run,
    /// Print ultrasonic readings until interrupted
    Sonar {
        /// Drive toward the obstacle and halt at the stopping distance
        #[arg(long)]
        approach: bool,

        /// Stop after this many polls
        #[arg(long)]
        samples: Option<usize>,
    },
    /// Print the effective configuration as TOML
    Config,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.filter.seed = seed;
        config.device.simulation.random_seed = seed;
    }

    let command = args.command.unwrap_or(Command::Run);
    if command == Command::Config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(false, Ordering::Relaxed);
    })?;

    log::info!(
        "Using device '{}' ({})",
        config.device.name,
        config.device.device_type
    );
    let brick = create_device(&config.device, &config.drive)?;
    let mut driver =
        EncoderDrive::new(brick, config.drive.clone())?.with_running_flag(running.clone());

    let result = match command {
        Command::Sonar { approach, samples } => {
            let mut sonar_config = config.sonar.clone();
            sonar_config.approach |= approach;
            if let Some(samples) = samples {
                sonar_config.max_samples = samples;
            }
            let mut out = io::stdout().lock();
            sonar::monitor(&mut driver, &sonar_config, &running, &mut out).map(|_| ())
        }
        _ => track_choreography(&config, &mut driver, io::stdout().lock()).map(|tracker| {
            let mean = tracker.cloud().mean_pose();
            log::info!(
                "Tracked {} updates, mean pose ({:.1}, {:.1}, {:.3})",
                tracker.updates(),
                mean.x,
                mean.y,
                mean.theta
            );
        }),
    };

    // Always leave the brick idle, whatever ended the run
    let shutdown = driver.shutdown();

    match result {
        Err(e) if e.is_interrupted() => log::info!("Stopped: {}", e),
        other => other?,
    }
    shutdown?;
    log::info!("drishti shutdown complete");
    Ok(())
}
