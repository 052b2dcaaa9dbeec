use std::io::{ErrorKind, Write};

use crate::checksum::{Crc8, FrameChecksum};
use crate::codec::MAX_PAYLOAD;
use crate::error::{FrameError, Result};
use crate::packer::Packer;

/// Writes framed payloads to any `Write` sink.
///
/// Each payload is built into a frame by an internal [`Packer`] and drained
/// one byte at a time onto the link, the way the builder is meant to feed a
/// byte-oriented transport.
pub struct FrameWriter<T, C = Crc8> {
    inner: T,
    packer: Packer<C>,
}

impl<T: Write> FrameWriter<T> {
    /// Create a frame writer with the default CRC-8 checksum.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            packer: Packer::new(),
        }
    }
}

impl<T: Write, C: FrameChecksum> FrameWriter<T, C> {
    /// Create a frame writer with an explicit checksum implementation.
    pub fn with_checksum(inner: T, checksum: C) -> Self {
        Self {
            inner,
            packer: Packer::with_checksum(checksum),
        }
    }

    /// Frame a payload and send it (blocking).
    pub fn send(&mut self, payload: &[u8]) -> Result<()> {
        self.packer.reset();
        let accepted = self.packer.write_bytes(payload);
        if accepted < payload.len() {
            self.packer.reset();
            return Err(FrameError::PayloadTooLarge {
                size: payload.len(),
                max: MAX_PAYLOAD,
            });
        }
        self.packer.close();

        tracing::trace!(
            payload = payload.len(),
            frame = self.packer.packet_length(),
            "sending frame"
        );

        while let Some(byte) = self.packer.read() {
            self.write_byte(byte)?;
        }
        self.flush()
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        loop {
            match self.inner.write(&[byte]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(_) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying sink.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying sink.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner sink.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
