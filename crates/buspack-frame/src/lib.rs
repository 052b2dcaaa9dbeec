//! Delimited packet framing with CRC-8 integrity for raw byte links.
//!
//! The target medium is a byte-oriented peer-to-peer link — an inter-chip
//! bus, a serial line — that offers no native message boundaries and no
//! integrity guarantees. Every frame carries:
//! - A start marker (0x02) for stream synchronization
//! - A 1-byte total frame length
//! - The payload bytes
//! - A CRC-8 over the length byte and payload
//! - An end marker (0x04)
//!
//! [`Packer`] builds a frame in a fixed 128-byte buffer and hands it out one
//! byte at a time for transmission. [`decode_frame`] and [`FrameReader`]
//! recover and validate payloads on the receiving side.

pub mod checksum;
pub mod codec;
pub mod error;
pub mod packer;
pub mod reader;
pub mod writer;

pub use checksum::{Crc8, FrameChecksum};
pub use codec::{
    decode_frame, encode_frame, BUFFER_CAPACITY, FRAME_END, FRAME_OVERHEAD, FRAME_START,
    MAX_PAYLOAD,
};
pub use error::{FrameError, Result};
pub use packer::Packer;
pub use reader::FrameReader;
pub use writer::FrameWriter;
