/// Errors that can occur while decoding or streaming frames.
///
/// The [`Packer`](crate::Packer) never produces these: misuse of the builder
/// degrades to sentinel return values instead. Errors exist only on the
/// decode and stream-adapter paths, where a corrupt or truncated frame is
/// something the caller has to act on.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The first byte of a frame is not the start marker.
    #[error("invalid start byte 0x{0:02X} (expected 0x02)")]
    InvalidStartByte(u8),

    /// The final byte of a frame is not the end marker.
    #[error("invalid end byte 0x{0:02X} (expected 0x04)")]
    InvalidEndByte(u8),

    /// The length field is below the fixed overhead or above the capacity.
    #[error("length field {len} out of range ({min}..={max})")]
    LengthOutOfRange { len: u8, min: u8, max: u8 },

    /// The stored checksum does not match the received length and payload.
    #[error("checksum mismatch (computed 0x{computed:02X}, frame carries 0x{stored:02X})")]
    ChecksumMismatch { computed: u8, stored: u8 },

    /// The payload exceeds what one frame can carry.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The link was closed before a complete frame was transferred.
    #[error("link closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
