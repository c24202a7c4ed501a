use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum_macros::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Command codes understood by the LD07.
///
/// The set is closed: a frame carrying any other code is rejected when it is
/// decoded (see [`crate::error::LdError::UnknownCommand`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum CommandCode {
    /// Start continuous distance output
    GetDistance = 0x02,
    /// Stop distance output
    Stop = 0x0F,
    /// Answerback
    Acknowledge = 0x10,
    /// Fetch the angle correction parameters
    GetCorrectionCoefficients = 0x12,
    /// Enumerate cascaded devices; the reply carries the device mask
    ConfigureAddress = 0x16,
}

impl CommandCode {
    /// Whether the device answers this command with a frame of the same code.
    ///
    /// `GetDistance` answers with a continuous stream rather than one reply.
    pub fn expects_reply(&self) -> bool {
        matches!(
            self,
            CommandCode::GetCorrectionCoefficients | CommandCode::ConfigureAddress
        )
    }
}
