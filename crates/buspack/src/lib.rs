//! Delimited packet framing with CRC-8 integrity for raw byte links.
//!
//! buspack frames variable-length payloads for byte-oriented peer-to-peer
//! links — inter-chip buses, serial lines — that offer no native message
//! boundaries or integrity guarantees. Frames carry a start marker, a
//! length field, the payload, a CRC-8 over length and payload, and an end
//! marker.
//!
//! # Crate Structure
//!
//! - [`frame`] — The framing core: [`frame::Packer`] builder,
//!   [`frame::FrameChecksum`] collaborator, buffer-level codec, and
//!   stream adapters.
//!
//! The `buspack` binary (feature `cli`) wraps the library with `pack`,
//! `unpack` and `inspect` commands.

/// Re-export framing types.
pub mod frame {
    pub use buspack_frame::*;
}
