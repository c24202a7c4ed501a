use crate::command::CommandCode;
use crate::constants::{FRAME_OVERHEAD, HEADER_SIZE, MAX_PAYLOAD_SIZE, START_MARKER, START_MARKER_SIZE};
use crate::error::{LdError, Result};
use crate::transport::Transport;
use bytes::{BufMut, Bytes, BytesMut};
use zerocopy::byteorder::little_endian::U16;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// The 10-byte header exactly as it sits on the wire.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
pub struct FrameHeaderRaw {
    pub start: [u8; 4],
    pub device_address: u8,
    pub command: u8,
    pub offset_address: U16,
    pub payload_len: U16,
}

impl FrameHeaderRaw {
    fn check_start(&self) -> Result<()> {
        if self.start != START_MARKER {
            return Err(LdError::Framing { observed: self.start });
        }
        Ok(())
    }

    /// Header bytes covered by the checksum (everything after the marker)
    fn summed_bytes(&self) -> &[u8] {
        &self.as_bytes()[START_MARKER_SIZE..]
    }
}

/// One protocol frame.
///
/// The payload length is never stored separately: it is always taken from
/// the payload itself, so an encoded frame cannot disagree with its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub device_address: u8,
    pub command: CommandCode,
    pub offset_address: u16,
    payload: Bytes,
}

/// Mod-256 sum of `bytes`.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

impl Packet {
    /// Build a frame, rejecting payloads the 16-bit length field cannot carry.
    pub fn new(device_address: u8, command: CommandCode, offset_address: u16, payload: impl Into<Bytes>) -> Result<Self> {
        let payload = payload.into();
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(LdError::PayloadTooLarge(payload.len()));
        }
        Ok(Self {
            device_address,
            command,
            offset_address,
            payload,
        })
    }

    /// A frame without payload and with offset 0, the shape of every host command.
    pub fn command(device_address: u8, command: CommandCode) -> Self {
        Self {
            device_address,
            command,
            offset_address: 0,
            payload: Bytes::new(),
        }
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Size of the encoded frame in bytes
    pub fn encoded_len(&self) -> usize {
        FRAME_OVERHEAD + self.payload.len()
    }

    fn header(&self) -> FrameHeaderRaw {
        FrameHeaderRaw {
            start: START_MARKER,
            device_address: self.device_address,
            command: self.command.into(),
            offset_address: U16::new(self.offset_address),
            // guarded by `new`
            payload_len: U16::new(self.payload.len() as u16),
        }
    }

    /// Encode into the wire representation, checksum included.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        buf.put_slice(self.header().as_bytes());
        buf.put_slice(&self.payload);
        let cs = checksum(&buf[START_MARKER_SIZE..]);
        buf.put_u8(cs);
        buf.freeze()
    }

    /// Read one frame from `transport`.
    ///
    /// Reads the header, then exactly the declared payload length, then the
    /// checksum byte. There is no resynchronization: if the stream is not
    /// positioned on a start marker this fails with [`LdError::Framing`] and
    /// realigning is up to the caller.
    pub fn read_from<T: Transport + ?Sized>(transport: &mut T) -> Result<Self> {
        let mut header_bytes = [0u8; HEADER_SIZE];
        transport.read_exact(&mut header_bytes)?;
        let header: FrameHeaderRaw = zerocopy::transmute!(header_bytes);
        header.check_start()?;

        let declared = header.payload_len.get() as usize;
        let mut payload = vec![0u8; declared];
        if declared > 0 {
            transport.read_exact(&mut payload)?;
        }

        let mut received = [0u8; 1];
        transport.read_exact(&mut received)?;

        Self::assemble(header, Bytes::from(payload), received[0])
    }

    /// Verify the checksum, then resolve the command code.
    fn assemble(header: FrameHeaderRaw, payload: Bytes, received: u8) -> Result<Self> {
        let computed = checksum(header.summed_bytes()).wrapping_add(checksum(&payload));
        if received != computed {
            return Err(LdError::Checksum { received, computed });
        }

        let command = CommandCode::try_from(header.command).map_err(|e| LdError::UnknownCommand(e.number))?;

        Ok(Self {
            device_address: header.device_address,
            command,
            offset_address: header.offset_address.get(),
            payload,
        })
    }
}

impl From<Packet> for Bytes {
    fn from(packet: Packet) -> Self {
        packet.to_bytes()
    }
}

impl TryFrom<Bytes> for Packet {
    type Error = LdError;

    /// Decode one complete, in-memory frame. The buffer must hold exactly one frame.
    fn try_from(frame: Bytes) -> Result<Self> {
        let (header, _) = FrameHeaderRaw::read_from_prefix(frame.as_ref()).map_err(|_| LdError::InsufficientData {
            expected: FRAME_OVERHEAD,
            actual: frame.len(),
        })?;
        header.check_start()?;

        let declared = header.payload_len.get() as usize;
        let total = FRAME_OVERHEAD + declared;
        if frame.len() < total {
            return Err(LdError::InsufficientData {
                expected: total,
                actual: frame.len(),
            });
        }
        if frame.len() > total {
            return Err(LdError::TrailingData(frame.len() - total));
        }

        let payload = frame.slice(HEADER_SIZE..HEADER_SIZE + declared);
        Self::assemble(header, payload, frame[total - 1])
    }
}

impl TryFrom<&[u8]> for Packet {
    type Error = LdError;

    fn try_from(frame: &[u8]) -> Result<Self> {
        Packet::try_from(Bytes::copy_from_slice(frame))
    }
}
