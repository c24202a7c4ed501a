pub mod calibration;
pub mod command;
pub mod config;
pub mod constants;
pub mod device;
pub mod distance;
pub mod error;
pub mod packet;
pub mod transport;


// Re-export the session type and the common value types for easy access
pub use calibration::CalibrationCoefficients;
pub use command::CommandCode;
pub use config::DeviceConfig;
pub use device::{Ld07, SessionState};
pub use distance::{AngleTransform, DistanceFrame, DistanceSample, LinearSweep};
pub use error::{ErrorKind, LdError, Result};
pub use packet::Packet;
pub use transport::Transport;
