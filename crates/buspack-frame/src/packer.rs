use std::fmt;

use crate::checksum::{Crc8, FrameChecksum};
use crate::codec::{BUFFER_CAPACITY, FRAME_END, FRAME_OVERHEAD, FRAME_START};

/// Frame builder over a fixed-capacity buffer.
///
/// A `Packer` is a byte sink while open and a byte source once closed:
/// append payload bytes with [`write`](Packer::write), seal the frame with
/// [`close`](Packer::close), then drain it one byte at a time with
/// [`available`](Packer::available) and [`read`](Packer::read) for
/// transmission. [`reset`](Packer::reset) discards the frame and reopens
/// the builder for the next payload.
///
/// Misuse never panics and never errors: writing while closed or full
/// reports 0 bytes accepted, reading while open reports `None`. The buffer
/// is owned inline; no operation allocates.
pub struct Packer<C = Crc8> {
    buf: [u8; BUFFER_CAPACITY],
    /// Write position while open, read position once closed.
    cursor: usize,
    /// Bytes of the frame accumulated so far, start and length included.
    total_len: usize,
    mode: Mode,
    checksum: C,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Open,
    Closed,
}

impl Packer {
    /// Create an open packer with the default CRC-8 checksum.
    pub fn new() -> Self {
        Self::with_checksum(Crc8::new())
    }
}

impl Default for Packer {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: FrameChecksum> Packer<C> {
    /// Create an open packer with an explicit checksum implementation.
    ///
    /// Both peers must agree on the algorithm; the framer itself only relies
    /// on the [`FrameChecksum`] contract.
    pub fn with_checksum(checksum: C) -> Self {
        let mut packer = Self {
            buf: [0; BUFFER_CAPACITY],
            cursor: 0,
            total_len: 0,
            mode: Mode::Closed,
            checksum,
        };
        packer.reset();
        packer
    }

    /// Append one payload byte.
    ///
    /// Returns 1 if the byte was accepted, 0 if the packer is closed or the
    /// buffer is full. Two slots stay reserved for the checksum and end
    /// marker, so at most [`MAX_PAYLOAD`](crate::MAX_PAYLOAD) payload bytes
    /// fit.
    pub fn write(&mut self, byte: u8) -> usize {
        if self.mode == Mode::Closed {
            return 0;
        }
        if self.total_len >= BUFFER_CAPACITY - 2 {
            return 0;
        }
        self.buf[self.cursor] = byte;
        self.cursor += 1;
        self.total_len = self.cursor;
        1
    }

    /// Append payload bytes in order, stopping at the first rejected byte.
    ///
    /// Returns the number of bytes accepted. A short count means the buffer
    /// filled up (or the packer was closed); callers must check it.
    pub fn write_bytes(&mut self, data: &[u8]) -> usize {
        for (i, &byte) in data.iter().enumerate() {
            if self.write(byte) == 0 {
                return i;
            }
        }
        data.len()
    }

    /// Frame length so far.
    ///
    /// While open this counts the payload plus the start and length bytes, a
    /// provisional size with the checksum and end marker not yet appended.
    /// Once closed it is the exact frame length carried in the length field.
    pub fn packet_length(&self) -> usize {
        self.total_len
    }

    /// True while the packer accepts payload bytes.
    pub fn is_open(&self) -> bool {
        self.mode == Mode::Open
    }

    /// Seal the frame: write the final length into the length field, append
    /// the checksum and end marker, and rewind the cursor for reading.
    ///
    /// The checksum covers the length byte followed by the payload — never
    /// the markers, never itself. Calling `close` on an already-closed
    /// packer is a no-op: the frame is finalized exactly once per cycle.
    pub fn close(&mut self) {
        if self.mode == Mode::Closed {
            return;
        }
        self.mode = Mode::Closed;

        // Reserve the checksum slot, then terminate the frame.
        self.cursor += 1;
        self.buf[self.cursor] = FRAME_END;
        self.cursor += 1;
        self.total_len = self.cursor;
        self.buf[1] = self.total_len as u8;

        let payload_len = self.total_len - FRAME_OVERHEAD;
        self.checksum.prime(&[self.total_len as u8]);
        let crc = self.checksum.update(&self.buf[2..2 + payload_len]);
        self.buf[self.cursor - 2] = crc;

        self.cursor = 0;
    }

    /// Bytes of the finished frame still to be read. Always 0 while open.
    pub fn available(&self) -> usize {
        if self.mode == Mode::Open {
            return 0;
        }
        self.total_len - self.cursor
    }

    /// Read the next frame byte and advance the read cursor.
    ///
    /// Returns `None` while the packer is open and once the frame has been
    /// fully drained. There is no rewind short of [`reset`](Packer::reset).
    pub fn read(&mut self) -> Option<u8> {
        if self.mode == Mode::Open || self.cursor >= self.total_len {
            return None;
        }
        let byte = self.buf[self.cursor];
        self.cursor += 1;
        Some(byte)
    }

    /// Discard any frame content and reopen the packer for a new payload.
    ///
    /// The start marker is rewritten and the write position moves past the
    /// length-field placeholder; stale bytes from a previous frame are never
    /// reachable through [`available`](Packer::available) or
    /// [`read`](Packer::read) because both derive from the reset length.
    pub fn reset(&mut self) {
        self.buf[0] = FRAME_START;
        self.cursor = 2;
        self.total_len = 2;
        self.mode = Mode::Open;
    }
}

impl<C> fmt::Debug for Packer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("Packer");
        dbg.field("mode", &self.mode)
            .field("length", &self.total_len)
            .field("cursor", &self.cursor);
        if self.total_len > 2 {
            dbg.field("bytes", &HexBytes(&self.buf[..self.total_len]));
        }
        dbg.finish()
    }
}

struct HexBytes<'a>(&'a [u8]);

impl fmt::Debug for HexBytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}
