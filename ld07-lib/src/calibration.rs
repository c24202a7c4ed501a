use crate::command::CommandCode;
use crate::constants::{CALIBRATION_PAYLOAD_SIZE, COEFFICIENT_SCALE};
use crate::error::{LdError, Result};
use std::fmt;
use zerocopy::byteorder::little_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Correction parameter payload (18 bytes)
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
pub struct CalibrationRaw {
    pub k0: U32,     // x10000
    pub k1: U32,     // x10000
    pub b0: U32,     // x10000
    pub b1: U32,     // x10000
    pub points: U16, // Samples per distance frame
}

/// Per-device correction coefficients as returned by `GetCorrectionCoefficients`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalibrationCoefficients {
    pub k0: f64,
    pub k1: f64,
    pub b0: f64,
    pub b1: f64,
    /// Number of samples the device puts in each distance frame
    pub points: u16,
}

impl CalibrationCoefficients {
    /// Decode a `GetCorrectionCoefficients` reply payload.
    pub fn from_payload(payload: &[u8]) -> Result<Self> {
        let raw = CalibrationRaw::ref_from_bytes(payload).map_err(|_| LdError::UnexpectedPayloadLength {
            command: CommandCode::GetCorrectionCoefficients,
            expected: CALIBRATION_PAYLOAD_SIZE,
            actual: payload.len(),
        })?;
        Ok(Self::from(*raw))
    }
}

impl From<CalibrationRaw> for CalibrationCoefficients {
    fn from(raw: CalibrationRaw) -> Self {
        Self {
            k0: raw.k0.get() as f64 / COEFFICIENT_SCALE,
            k1: raw.k1.get() as f64 / COEFFICIENT_SCALE,
            b0: raw.b0.get() as f64 / COEFFICIENT_SCALE,
            b1: raw.b1.get() as f64 / COEFFICIENT_SCALE,
            points: raw.points.get(),
        }
    }
}

impl From<CalibrationCoefficients> for CalibrationRaw {
    fn from(c: CalibrationCoefficients) -> Self {
        let scale = |v: f64| U32::new((v * COEFFICIENT_SCALE).round() as u32);
        CalibrationRaw {
            k0: scale(c.k0),
            k1: scale(c.k1),
            b0: scale(c.b0),
            b1: scale(c.b1),
            points: U16::new(c.points),
        }
    }
}

impl fmt::Display for CalibrationCoefficients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "k0: {:.4}, k1: {:.4}, b0: {:.4}, b1: {:.4}, points: {}",
            self.k0, self.k1, self.b0, self.b1, self.points
        )
    }
}
