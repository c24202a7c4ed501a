use crate::calibration::CalibrationCoefficients;
use crate::command::CommandCode;
use crate::config::DeviceConfig;
use crate::constants::CONFIG_ADDRESS_BROADCAST;
use crate::distance::{AngleTransform, DistanceFrame};
use crate::error::{LdError, Result};
use crate::packet::Packet;
use crate::transport::Transport;
use bytes::Bytes;
use strum_macros::Display;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SessionState {
    #[strum(to_string = "idle")]
    Idle,
    /// The device is pushing distance frames on its own
    #[strum(to_string = "streaming")]
    Streaming,
}

/// Number of cascaded devices encoded in an address configuration reply.
///
/// Each responding device sets one bit, so one to three devices report
/// 0x1, 0x3 and 0x7. Anything else is rejected rather than guessed at.
pub fn device_count(mask: u8) -> Result<u8> {
    match mask {
        0x01 => Ok(1),
        0x03 => Ok(2),
        0x07 => Ok(3),
        other => Err(LdError::UnsupportedAddressPattern(other)),
    }
}

/// A session with one LD07 over an exclusively owned transport.
pub struct Ld07<T> {
    transport: T,
    config: DeviceConfig,
    state: SessionState,
    stream_address: u8,
}

impl<T: Transport> Ld07<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, DeviceConfig::default())
    }

    pub fn with_config(transport: T, config: DeviceConfig) -> Self {
        Self {
            transport,
            config,
            state: SessionState::Idle,
            stream_address: config.device_address,
        }
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn get_ref(&self) -> &T {
        &self.transport
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Give the transport back, e.g. to reopen a session after a framing error.
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Encode and write a frame. Does not wait for a reply.
    pub fn send(&mut self, packet: &Packet) -> Result<()> {
        let data = packet.to_bytes();
        debug!(bytes = hex::encode(&data), command = %packet.command, "Serial Write");
        self.transport.write_all(&data)?;
        self.transport.flush()?;
        Ok(())
    }

    /// Send `command` with an explicit address, offset and payload.
    ///
    /// Goes through the same state machine as the typed operations:
    /// `GetDistance` starts a stream, `Stop` ends it, and commands that wait
    /// for a reply are refused while a stream is running. Does not read the
    /// reply.
    pub fn issue(
        &mut self,
        command: CommandCode,
        device_address: u8,
        offset_address: u16,
        payload: impl Into<Bytes>,
    ) -> Result<()> {
        let packet = Packet::new(device_address, command, offset_address, payload)?;
        self.dispatch("issue", &packet)
    }

    fn dispatch(&mut self, operation: &'static str, packet: &Packet) -> Result<()> {
        // a reply could not be told apart from the distance frames
        if packet.command == CommandCode::GetDistance || packet.command.expects_reply() {
            self.ensure_idle(operation)?;
        }
        self.send(packet)?;

        match packet.command {
            CommandCode::GetDistance => {
                self.stream_address = packet.device_address;
                self.state = SessionState::Streaming;
                info!("Distance stream started on device {:#04x}", packet.device_address);
            }
            CommandCode::Stop => {
                if self.state == SessionState::Streaming {
                    info!("Distance stream stopped on device {:#04x}", packet.device_address);
                }
                self.state = SessionState::Idle;
            }
            _ => {}
        }
        Ok(())
    }

    /// Block until one frame has been read and validated.
    pub fn receive(&mut self) -> Result<Packet> {
        let packet = Packet::read_from(&mut self.transport).inspect_err(|e| warn!("Failed to read frame: {}", e))?;
        debug!(
            bytes = hex::encode(packet.to_bytes()),
            command = %packet.command,
            address = packet.device_address,
            "Serial Read"
        );
        Ok(packet)
    }

    fn ensure_idle(&self, operation: &'static str) -> Result<()> {
        if self.state != SessionState::Idle {
            return Err(LdError::InvalidState {
                operation,
                state: self.state,
            });
        }
        Ok(())
    }

    fn expect_reply(reply: &Packet, command: CommandCode, device_address: u8) -> Result<()> {
        if reply.command != command {
            warn!("Expected {} reply, got {}", command, reply.command);
            return Err(LdError::UnexpectedCommand {
                expected: command,
                actual: reply.command,
            });
        }
        if reply.device_address != device_address {
            warn!(
                "{} reply from device {:#04x}, expected {:#04x}",
                command, reply.device_address, device_address
            );
            return Err(LdError::AddressMismatch {
                expected: device_address,
                actual: reply.device_address,
            });
        }
        Ok(())
    }

    /// Enumerate cascaded devices and return how many answered (1 to 3).
    ///
    /// Only needed when several units are daisy-chained. The request always
    /// goes to address 0.
    pub fn configure_address(&mut self) -> Result<u8> {
        self.dispatch(
            "configure_address",
            &Packet::command(CONFIG_ADDRESS_BROADCAST, CommandCode::ConfigureAddress),
        )?;

        let reply = self.receive()?;
        if reply.command != CommandCode::ConfigureAddress {
            warn!("Expected ConfigureAddress reply, got {}", reply.command);
            return Err(LdError::UnexpectedCommand {
                expected: CommandCode::ConfigureAddress,
                actual: reply.command,
            });
        }

        let count = device_count(reply.device_address)?;
        info!("Address configuration: {} device(s), mask {:#04x}", count, reply.device_address);
        Ok(count)
    }

    /// Fetch correction coefficients from the configured device.
    pub fn get_correction_coefficients(&mut self) -> Result<CalibrationCoefficients> {
        self.get_correction_coefficients_from(self.config.device_address)
    }

    pub fn get_correction_coefficients_from(&mut self, device_address: u8) -> Result<CalibrationCoefficients> {
        self.dispatch(
            "get_correction_coefficients",
            &Packet::command(device_address, CommandCode::GetCorrectionCoefficients),
        )?;

        let reply = self.receive()?;
        Self::expect_reply(&reply, CommandCode::GetCorrectionCoefficients, device_address)?;

        let coefficients = CalibrationCoefficients::from_payload(reply.payload())?;
        info!("Correction coefficients: {}", coefficients);
        Ok(coefficients)
    }

    /// Ask the configured device to start pushing distance frames.
    pub fn begin_distance_stream(&mut self) -> Result<()> {
        self.begin_distance_stream_at(self.config.device_address)
    }

    pub fn begin_distance_stream_at(&mut self, device_address: u8) -> Result<()> {
        self.dispatch("begin_distance_stream", &Packet::command(device_address, CommandCode::GetDistance))
    }

    /// Stop the distance stream. No reply is expected.
    ///
    /// Also valid while idle, to silence a device left streaming by an
    /// earlier session.
    pub fn stop_distance_stream(&mut self) -> Result<()> {
        let device_address = match self.state {
            SessionState::Streaming => self.stream_address,
            SessionState::Idle => self.config.device_address,
        };
        self.dispatch("stop_distance_stream", &Packet::command(device_address, CommandCode::Stop))
    }

    /// Read the next distance frame of a running stream.
    ///
    /// `expected_points` normally comes from
    /// [`CalibrationCoefficients::points`]; a frame with another sample
    /// count is an error, never truncated.
    pub fn receive_distance_frame<A: AngleTransform + ?Sized>(
        &mut self,
        expected_points: u16,
        transform: &A,
    ) -> Result<DistanceFrame> {
        if self.state != SessionState::Streaming {
            return Err(LdError::InvalidState {
                operation: "receive_distance_frame",
                state: self.state,
            });
        }

        let reply = self.receive()?;
        Self::expect_reply(&reply, CommandCode::GetDistance, self.stream_address)?;
        DistanceFrame::decode(reply.payload(), expected_points, transform)
    }
}
