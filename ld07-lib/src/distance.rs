//! Distance frame payloads.
//!
//! A `GetDistance` frame carries a 32-bit timestamp followed by one packed
//! 16-bit word per sample. Turning the sample index into an angle is left to
//! an [`AngleTransform`] supplied by the caller, since the mapping depends
//! on the unit and its firmware.

use crate::command::CommandCode;
use crate::constants::{SAMPLE_SIZE, TIMESTAMP_SIZE};
use crate::error::{LdError, Result};
use bytes::Buf;
use modular_bitfield::prelude::*;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[bitfield(bytes = 2)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackedSample {
    pub confidence: B7,
    pub distance: B9,
}

/// Maps a sample index within a frame to an angle.
pub trait AngleTransform {
    fn angle(&self, index: usize, point_count: u16) -> f64;
}

impl<F> AngleTransform for F
where
    F: Fn(usize, u16) -> f64,
{
    fn angle(&self, index: usize, point_count: u16) -> f64 {
        self(index, point_count)
    }
}

/// Spreads samples evenly from `start` to `end` (inclusive), in whatever unit
/// the caller picks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearSweep {
    pub start: f64,
    pub end: f64,
}

impl LinearSweep {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
}

impl AngleTransform for LinearSweep {
    fn angle(&self, index: usize, point_count: u16) -> f64 {
        if point_count <= 1 {
            return self.start;
        }
        let step = (self.end - self.start) / f64::from(point_count - 1);
        self.start + step * index as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DistanceSample {
    /// Position within the frame
    pub index: usize,
    pub distance: u16,
    pub confidence: u8,
    pub angle: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DistanceFrame {
    /// Device timestamp shared by every sample in the frame
    pub timestamp: u32,
    pub samples: Vec<DistanceSample>,
}

impl DistanceFrame {
    /// Decode a `GetDistance` payload holding exactly `expected_points` samples.
    pub fn decode<A: AngleTransform + ?Sized>(payload: &[u8], expected_points: u16, transform: &A) -> Result<Self> {
        let sample_bytes = payload.len().saturating_sub(TIMESTAMP_SIZE);
        if payload.len() < TIMESTAMP_SIZE || sample_bytes % SAMPLE_SIZE != 0 {
            return Err(LdError::UnexpectedPayloadLength {
                command: CommandCode::GetDistance,
                expected: TIMESTAMP_SIZE + expected_points as usize * SAMPLE_SIZE,
                actual: payload.len(),
            });
        }

        let count = sample_bytes / SAMPLE_SIZE;
        if count != expected_points as usize {
            return Err(LdError::PointCountMismatch {
                expected: expected_points as usize,
                actual: count,
            });
        }

        let mut buf = payload;
        let timestamp = buf.get_u32_le();
        let samples = buf
            .chunks_exact(SAMPLE_SIZE)
            .enumerate()
            .map(|(index, word)| {
                let packed = PackedSample::from_bytes([word[0], word[1]]);
                DistanceSample {
                    index,
                    distance: packed.distance(),
                    confidence: packed.confidence(),
                    angle: transform.angle(index, expected_points),
                }
            })
            .collect();

        Ok(Self { timestamp, samples })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples whose confidence reaches `min_confidence`
    pub fn confident(&self, min_confidence: u8) -> impl Iterator<Item = &DistanceSample> {
        self.samples.iter().filter(move |s| s.confidence >= min_confidence)
    }
}

impl fmt::Display for DistanceFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={} points={}", self.timestamp, self.samples.len())?;
        if let Some(nearest) = self.samples.iter().min_by_key(|s| s.distance) {
            write!(
                f,
                " nearest={} @ {:.2} (conf {})",
                nearest.distance, nearest.angle, nearest.confidence
            )?;
        }
        Ok(())
    }
}
