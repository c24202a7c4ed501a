//! Plumbing shared by the `ld07-cli` binaries: serial port options, logging
//! setup and session construction.

use anyhow::{Context, Result};
use clap::Args;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use ld07_lib::constants::{DEFAULT_BAUD_RATE, DEFAULT_DEVICE_ADDRESS};
use ld07_lib::{DeviceConfig, Ld07};
use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::fs::File;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub type SerialSession = Ld07<Box<dyn SerialPort>>;

/// Options common to every binary.
#[derive(Args, Debug)]
pub struct SerialArgs {
    /// Serial port the LD07 is attached to (e.g. /dev/ttyUSB0)
    #[arg(short, long)]
    pub port: String,

    /// UART speed
    #[arg(short, long, default_value_t = DEFAULT_BAUD_RATE)]
    pub baud: u32,

    /// Read timeout in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub timeout_ms: u64,

    /// Device address commands are sent to
    #[arg(short, long, default_value_t = DEFAULT_DEVICE_ADDRESS)]
    pub address: u8,

    /// Optional path to a file to write logs to, in addition to the console
    #[arg(short, long)]
    pub log_file: Option<PathBuf>,

    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

impl SerialArgs {
    pub fn device_config(&self) -> DeviceConfig {
        DeviceConfig::default()
            .with_device_address(self.address)
            .with_baud_rate(self.baud)
            .with_read_timeout(Duration::from_millis(self.timeout_ms))
    }
}

/// Console logging plus an optional log file. Keep the returned guard alive
/// for as long as the file should be written.
pub fn setup_logging(
    log_file_path: Option<&PathBuf>,
    verbosity: &Verbosity<InfoLevel>,
) -> Result<Option<WorkerGuard>> {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    let (file_layer, guard) = if let Some(path) = log_file_path {
        let log_file = File::create(path).with_context(|| format!("Failed to create log file at: {:?}", path))?;
        let (non_blocking_writer, guard) = tracing_appender::non_blocking(log_file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking_writer)
            .with_ansi(false)
            .with_target(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    // INFO by default, DEBUG (frame hex dumps) with -v, TRACE with -vv
    let filter = EnvFilter::builder()
        .with_default_directive(verbosity.tracing_level_filter().into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    if let Some(path) = log_file_path {
        info!("Logging to file: {:?}", path);
    }

    Ok(guard)
}

/// Open the port 8N1 without flow control and wrap it in a session.
pub fn open_session(config: DeviceConfig, port: &str) -> Result<SerialSession> {
    info!("Opening {} at {} baud", port, config.baud_rate);
    let serial = serialport::new(port, config.baud_rate)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .timeout(config.read_timeout)
        .open()
        .with_context(|| format!("Failed to open serial port {}", port))?;

    Ok(Ld07::with_config(serial, config))
}

/// Bring the device to a clean state: stop any stream left running by an
/// earlier process and drop whatever frames were already buffered.
pub fn stop_and_drain(device: &mut SerialSession) -> Result<()> {
    device.stop_distance_stream().context("Failed to stop a running stream")?;
    thread::sleep(Duration::from_millis(50));
    match device.get_ref().bytes_to_read() {
        Ok(pending) => debug!("Discarding {} buffered byte(s)", pending),
        Err(e) => warn!("Failed to query buffered byte count: {}", e),
    }
    device
        .get_mut()
        .clear(ClearBuffer::Input)
        .context("Failed to clear serial input buffer")?;
    Ok(())
}
