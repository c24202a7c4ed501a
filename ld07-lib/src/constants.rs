// Protocol constants for the LD07

/// Every frame opens with four 0xAA bytes
pub const START_MARKER: [u8; 4] = [0xAA; 4];

/// Size of the start marker (4 bytes)
pub const START_MARKER_SIZE: usize = 4;

/// Size of the frame header including the start marker (10 bytes)
pub const HEADER_SIZE: usize = 10;

/// Size of the trailing checksum (1 byte)
pub const CHECKSUM_SIZE: usize = 1;

/// Header plus checksum; a frame is `FRAME_OVERHEAD + payload length` bytes
pub const FRAME_OVERHEAD: usize = HEADER_SIZE + CHECKSUM_SIZE;

/// Largest payload the 16-bit length field can describe
pub const MAX_PAYLOAD_SIZE: usize = u16::MAX as usize;

/// Size of the correction coefficient payload (18 bytes)
pub const CALIBRATION_PAYLOAD_SIZE: usize = 18;

/// Coefficients travel as integers scaled by this factor
pub const COEFFICIENT_SCALE: f64 = 10_000.0;

/// Size of the timestamp leading every distance payload (4 bytes)
pub const TIMESTAMP_SIZE: usize = 4;

/// Size of one packed distance sample (2 bytes)
pub const SAMPLE_SIZE: usize = 2;

/// Address used by single-device setups
pub const DEFAULT_DEVICE_ADDRESS: u8 = 0x01;

/// Address configuration is always sent to address 0
pub const CONFIG_ADDRESS_BROADCAST: u8 = 0x00;

/// Factory UART speed (8N1)
pub const DEFAULT_BAUD_RATE: u32 = 921_600;
