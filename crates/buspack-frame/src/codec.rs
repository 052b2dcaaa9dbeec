use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::checksum::{Crc8, FrameChecksum};
use crate::error::{FrameError, Result};

/// Start-of-frame marker.
pub const FRAME_START: u8 = 0x02;

/// End-of-frame marker.
pub const FRAME_END: u8 = 0x04;

/// Fixed per-frame overhead: start marker, length, checksum, end marker.
pub const FRAME_OVERHEAD: usize = 4;

/// Total capacity of one frame, overhead included.
pub const BUFFER_CAPACITY: usize = 128;

/// Maximum payload bytes one frame can carry.
pub const MAX_PAYLOAD: usize = BUFFER_CAPACITY - FRAME_OVERHEAD;

/// Encode a payload into the wire format.
///
/// Wire format:
/// ```text
/// ┌───────────┬──────────┬──────────────────┬──────────┬───────────┐
/// │ Start     │ Length   │ Payload          │ CRC-8    │ End       │
/// │ 0x02      │ (1B)     │ (Length-4 bytes) │ (1B)     │ 0x04      │
/// └───────────┴──────────┴──────────────────┴──────────┴───────────┘
/// ```
/// The length field counts the whole frame, overhead included. The CRC
/// covers the length byte followed by the payload.
pub fn encode_frame(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.len() > MAX_PAYLOAD {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD,
        });
    }
    let total = payload.len() + FRAME_OVERHEAD;
    let mut crc = Crc8::new();
    crc.prime(&[total as u8]);
    let checksum = crc.update(payload);

    dst.reserve(total);
    dst.put_u8(FRAME_START);
    dst.put_u8(total as u8);
    dst.put_slice(payload);
    dst.put_u8(checksum);
    dst.put_u8(FRAME_END);
    Ok(())
}

/// Decode one frame from the front of a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes and returns the payload.
pub fn decode_frame(src: &mut BytesMut) -> Result<Option<Bytes>> {
    if src.len() < 2 {
        return Ok(None); // Need more data
    }

    if src[0] != FRAME_START {
        return Err(FrameError::InvalidStartByte(src[0]));
    }

    let total = src[1] as usize;
    if !(FRAME_OVERHEAD..=BUFFER_CAPACITY).contains(&total) {
        return Err(FrameError::LengthOutOfRange {
            len: src[1],
            min: FRAME_OVERHEAD as u8,
            max: BUFFER_CAPACITY as u8,
        });
    }

    if src.len() < total {
        return Ok(None); // Need more data
    }

    let payload_len = total - FRAME_OVERHEAD;
    if src[total - 1] != FRAME_END {
        return Err(FrameError::InvalidEndByte(src[total - 1]));
    }

    let stored = src[2 + payload_len];
    let mut crc = Crc8::new();
    crc.prime(&src[1..2]);
    let computed = crc.update(&src[2..2 + payload_len]);
    if computed != stored {
        return Err(FrameError::ChecksumMismatch { computed, stored });
    }

    src.advance(2);
    let payload = src.split_to(payload_len).freeze();
    src.advance(2);

    Ok(Some(payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_roundtrip() {
        let mut buf = BytesMut::new();
        let payload = b"hello, buspack!";

        encode_frame(payload, &mut buf).unwrap();
        assert_eq!(buf.len(), payload.len() + FRAME_OVERHEAD);

        let decoded = decode_frame(&mut buf).unwrap().unwrap();
        assert_eq!(decoded.as_ref(), payload);
        assert!(buf.is_empty());
    }

    #[test]
    fn encode_matches_reference_frame() {
        let mut buf = BytesMut::new();
        encode_frame(b"AB", &mut buf).unwrap();
        assert_eq!(buf.as_ref(), &[0x02, 0x06, 0x41, 0x42, 0xFA, 0x04]);
    }

    #[test]
    fn empty_payload_roundtrip() {
        let mut buf = BytesMut::new();
        encode_frame(b"", &mut buf).unwrap();
        assert_eq!(buf.as_ref(), &[0x02, 0x04, 0x1C, 0x04]);

        let decoded = decode_frame(&mut buf).unwrap().unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn max_payload_roundtrip() {
        let payload = vec![0x5A; MAX_PAYLOAD];
        let mut buf = BytesMut::new();
        encode_frame(&payload, &mut buf).unwrap();
        assert_eq!(buf.len(), BUFFER_CAPACITY);

        let decoded = decode_frame(&mut buf).unwrap().unwrap();
        assert_eq!(decoded.as_ref(), payload.as_slice());
    }

    #[test]
    fn oversized_payload_rejected() {
        let payload = vec![0x00; MAX_PAYLOAD + 1];
        let mut buf = BytesMut::new();
        let err = encode_frame(&payload, &mut buf).unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { .. }));
        assert!(buf.is_empty());
    }

    #[test]
    fn decode_incomplete_header() {
        let mut buf = BytesMut::from(&[0x02][..]);
        assert!(decode_frame(&mut buf).unwrap().is_none());
    }

    #[test]
    fn decode_incomplete_payload() {
        let mut buf = BytesMut::new();
        encode_frame(b"hello", &mut buf).unwrap();
        buf.truncate(4);

        assert!(decode_frame(&mut buf).unwrap().is_none());
        assert_eq!(buf.len(), 4);
    }

    #[test]
    fn decode_invalid_start_byte() {
        let mut buf = BytesMut::from(&[0xFF, 0x06, 0x41, 0x42, 0xFA, 0x04][..]);
        let err = decode_frame(&mut buf).unwrap_err();
        assert!(matches!(err, FrameError::InvalidStartByte(0xFF)));
    }

    #[test]
    fn decode_length_below_overhead() {
        let mut buf = BytesMut::from(&[0x02, 0x03, 0x00, 0x04][..]);
        let err = decode_frame(&mut buf).unwrap_err();
        assert!(matches!(err, FrameError::LengthOutOfRange { len: 3, .. }));
    }

    #[test]
    fn decode_length_above_capacity() {
        let mut buf = BytesMut::from(&[0x02, 0xC0][..]);
        let err = decode_frame(&mut buf).unwrap_err();
        assert!(matches!(err, FrameError::LengthOutOfRange { len: 0xC0, .. }));
    }

    #[test]
    fn decode_invalid_end_byte() {
        let mut buf = BytesMut::from(&[0x02, 0x06, 0x41, 0x42, 0xFA, 0x99][..]);
        let err = decode_frame(&mut buf).unwrap_err();
        assert!(matches!(err, FrameError::InvalidEndByte(0x99)));
    }

    #[test]
    fn decode_corrupted_payload() {
        let mut buf = BytesMut::new();
        encode_frame(b"AB", &mut buf).unwrap();
        buf[2] ^= 0x01;

        let err = decode_frame(&mut buf).unwrap_err();
        assert!(matches!(err, FrameError::ChecksumMismatch { stored: 0xFA, .. }));
    }

    #[test]
    fn decode_corrupted_length_field() {
        let mut buf = BytesMut::new();
        encode_frame(b"ABCD", &mut buf).unwrap();
        // still a plausible length, but no longer what the CRC covers
        buf[1] -= 1;

        let err = decode_frame(&mut buf).unwrap_err();
        assert!(matches!(
            err,
            FrameError::ChecksumMismatch { .. } | FrameError::InvalidEndByte(_)
        ));
    }

    #[test]
    fn decode_multiple_frames_in_sequence() {
        let mut buf = BytesMut::new();
        encode_frame(b"first", &mut buf).unwrap();
        encode_frame(b"second", &mut buf).unwrap();

        let f1 = decode_frame(&mut buf).unwrap().unwrap();
        let f2 = decode_frame(&mut buf).unwrap().unwrap();

        assert_eq!(f1.as_ref(), b"first");
        assert_eq!(f2.as_ref(), b"second");
        assert!(buf.is_empty());
    }

    #[test]
    fn decodes_frame_built_by_packer() {
        let mut packer = crate::Packer::new();
        packer.write_bytes(b"cross-check");
        packer.close();

        let mut buf = BytesMut::new();
        while let Some(byte) = packer.read() {
            buf.put_u8(byte);
        }

        let decoded = decode_frame(&mut buf).unwrap().unwrap();
        assert_eq!(decoded.as_ref(), b"cross-check");
    }
}
