use crate::constants::{DEFAULT_BAUD_RATE, DEFAULT_DEVICE_ADDRESS};
use std::time::Duration;

/// Session and link settings.
///
/// The session only reads `device_address`; `baud_rate` and `read_timeout`
/// are carried for whoever opens the serial port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Address commands are sent to and replies are checked against
    pub device_address: u8,
    pub baud_rate: u32,
    pub read_timeout: Duration,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            device_address: DEFAULT_DEVICE_ADDRESS,
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: Duration::from_secs(1),
        }
    }
}

impl DeviceConfig {
    pub fn with_device_address(mut self, device_address: u8) -> Self {
        self.device_address = device_address;
        self
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }
}
