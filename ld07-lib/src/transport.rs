//! Byte-stream link to the sensor.
//!
//! The codec never deals with partial reads: `read_exact` either fills the
//! whole buffer or fails. Anything implementing [`std::io::Read`] and
//! [`std::io::Write`] (a `serialport` handle, a TCP bridge, a test double)
//! is a transport through the blanket impl below.

use std::io::{self, Read, Write};

pub trait Transport {
    /// Fill `buf` completely, blocking until the bytes arrive, the link
    /// times out or the stream ends.
    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()>;

    /// Write every byte of `data`.
    fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;
}

impl<T: Read + Write + ?Sized> Transport for T {
    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        Read::read_exact(self, buf)
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        Write::write_all(self, data)
    }

    fn flush(&mut self) -> io::Result<()> {
        Write::flush(self)
    }
}
