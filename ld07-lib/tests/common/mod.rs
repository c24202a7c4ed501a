//! Common test utilities and shared imports

// Allow unused imports and dead code since this is a shared module
// used across multiple test files - not all items are used in every test file
#[allow(unused_imports)]
pub use bytes::Bytes;
#[allow(unused_imports)]
pub use hex;
#[allow(unused_imports)]
pub use ld07_lib::calibration::CalibrationCoefficients;
#[allow(unused_imports)]
pub use ld07_lib::command::CommandCode;
#[allow(unused_imports)]
pub use ld07_lib::config::DeviceConfig;
#[allow(unused_imports)]
pub use ld07_lib::device::{Ld07, SessionState};
#[allow(unused_imports)]
pub use ld07_lib::distance::{AngleTransform, DistanceFrame, LinearSweep};
#[allow(unused_imports)]
pub use ld07_lib::error::{ErrorKind, LdError};
#[allow(unused_imports)]
pub use ld07_lib::packet::Packet;

use std::collections::VecDeque;
use std::io::{self, Read, Write};

/// Serial port stand-in: replies are queued up front, writes are captured.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct MockTransport {
    rx: VecDeque<u8>,
    pub written: Vec<u8>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rx(bytes: impl AsRef<[u8]>) -> Self {
        let mut mock = Self::new();
        mock.push_rx(bytes);
        mock
    }

    pub fn push_rx(&mut self, bytes: impl AsRef<[u8]>) {
        self.rx.extend(bytes.as_ref().iter().copied());
    }

    /// Bytes queued but not read yet
    pub fn remaining(&self) -> usize {
        self.rx.len()
    }
}

impl Read for MockTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.rx.len());
        for (slot, byte) in buf.iter_mut().zip(self.rx.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

impl Write for MockTransport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Decode hex string to bytes for testing
#[allow(dead_code)]
pub fn hex_to_bytes(hex_data: &str) -> Bytes {
    Bytes::from(hex::decode(hex_data.replace(' ', "")).expect("Failed to decode hex"))
}

/// Build a frame by hand, independent of the codec under test
#[allow(dead_code)]
pub fn raw_frame(device_address: u8, command: u8, offset_address: u16, payload: &[u8]) -> Vec<u8> {
    let mut out = vec![0xAA; 4];
    out.push(device_address);
    out.push(command);
    out.extend_from_slice(&offset_address.to_le_bytes());
    out.extend_from_slice(&(payload.len() as u16).to_le_bytes());
    out.extend_from_slice(payload);
    let cs = out[4..].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    out.push(cs);
    out
}

/// Distance payload: timestamp followed by (distance, confidence) pairs
#[allow(dead_code)]
pub fn distance_payload(timestamp: u32, samples: &[(u16, u8)]) -> Vec<u8> {
    let mut out = timestamp.to_le_bytes().to_vec();
    for (distance, confidence) in samples {
        let word = (*distance << 7) | u16::from(*confidence & 0x7F);
        out.extend_from_slice(&word.to_le_bytes());
    }
    out
}

/// ConfigureAddress frame for device 1, no payload
#[allow(dead_code)]
pub const CONFIGURE_ADDRESS_FRAME: &str = "aaaaaaaa 01 16 0000 0000 17";

/// Correction coefficient payload: 0.0123, 0.0121, 0.4993, 0.5508, 80 points
#[allow(dead_code)]
pub const CALIBRATION_PAYLOAD: &str = "7b000000 79000000 81130000 84150000 5000";
