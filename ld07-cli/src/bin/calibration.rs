use anyhow::{Context, Result};
use clap::Parser;
use ld07_cli::{SerialArgs, open_session, setup_logging, stop_and_drain};

/// Fetch and print the correction coefficients of an LD07.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    serial: SerialArgs,

    /// Print the coefficients as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = setup_logging(cli.serial.log_file.as_ref(), &cli.serial.verbose)?;

    let mut device = open_session(cli.serial.device_config(), &cli.serial.port)?;
    stop_and_drain(&mut device)?;

    let coefficients = device
        .get_correction_coefficients()
        .context("Failed to fetch correction coefficients")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&coefficients)?);
        return Ok(());
    }

    println!("Correction coefficients (device {:#04x}):", device.config().device_address);
    println!("  k0:     {:>8.4}", coefficients.k0);
    println!("  k1:     {:>8.4}", coefficients.k1);
    println!("  b0:     {:>8.4}", coefficients.b0);
    println!("  b1:     {:>8.4}", coefficients.b1);
    println!("  points: {:>8}", coefficients.points);

    Ok(())
}
