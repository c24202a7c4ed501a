use anyhow::{Context, Result};
use clap::Parser;
use ld07_cli::{SerialArgs, open_session, setup_logging, stop_and_drain};

/// Run address configuration on a chain of LD07 units and report how many answered.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    serial: SerialArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = setup_logging(cli.serial.log_file.as_ref(), &cli.serial.verbose)?;

    let mut device = open_session(cli.serial.device_config(), &cli.serial.port)?;
    stop_and_drain(&mut device)?;

    let count = device.configure_address().context("Address configuration failed")?;
    println!("{} device(s) on the bus", count);

    Ok(())
}
