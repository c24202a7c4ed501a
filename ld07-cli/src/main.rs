use anyhow::{Context, Result};
use clap::Parser;
use ld07_cli::{SerialArgs, open_session, setup_logging, stop_and_drain};
use ld07_lib::{ErrorKind, LinearSweep};
use std::process;
use tracing::{error, info, warn};

/// Stream distance frames from an LD07 rangefinder.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    serial: SerialArgs,

    /// Number of frames to print (0 = until an error)
    #[arg(short = 'n', long, default_value_t = 10)]
    frames: u64,

    /// Angle of the first sample, in degrees
    #[arg(long, default_value_t = -30.0, allow_negative_numbers = true)]
    start_angle: f64,

    /// Angle of the last sample, in degrees
    #[arg(long, default_value_t = 30.0, allow_negative_numbers = true)]
    end_angle: f64,

    /// Print each frame as a JSON line
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = setup_logging(cli.serial.log_file.as_ref(), &cli.serial.verbose)?;

    if let Err(e) = run(&cli) {
        error!("Streaming failed: {:?}", e);
        process::exit(1);
    }

    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let mut device = open_session(cli.serial.device_config(), &cli.serial.port)?;

    stop_and_drain(&mut device)?;

    let coefficients = device
        .get_correction_coefficients()
        .context("Failed to fetch correction coefficients")?;
    info!("Calibration: {}", coefficients);

    let sweep = LinearSweep::new(cli.start_angle, cli.end_angle);
    device.begin_distance_stream().context("Failed to start streaming")?;

    let mut printed = 0u64;
    let result = loop {
        if cli.frames != 0 && printed >= cli.frames {
            break Ok(());
        }

        match device.receive_distance_frame(coefficients.points, &sweep) {
            Ok(frame) => {
                if cli.json {
                    println!("{}", serde_json::to_string(&frame)?);
                } else {
                    println!("{}", frame);
                }
                printed += 1;
            }
            // the bad frame has been consumed, the next one is still aligned
            Err(e) if e.kind() == ErrorKind::Checksum => warn!("Dropping frame: {}", e),
            Err(e) => break Err(anyhow::Error::from(e).context("Failed to read distance frame")),
        }
    };

    device.stop_distance_stream().context("Failed to stop streaming")?;
    info!("Received {} frame(s)", printed);
    result
}
