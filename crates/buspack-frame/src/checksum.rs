use crc::{Crc, CRC_8_SMBUS};

/// Integrity function consumed by the framing layer.
///
/// The framer only depends on two operations: [`prime`](FrameChecksum::prime)
/// resets the internal state and folds in a seed, and
/// [`update`](FrameChecksum::update) folds in further bytes and returns the
/// finalized checksum for everything fed since the last prime. The framer
/// primes with the 1-byte length field and updates with the payload region;
/// both peers must run the same algorithm over the same range.
pub trait FrameChecksum {
    /// Reset the checksum state and fold in `seed`.
    fn prime(&mut self, seed: &[u8]);

    /// Fold in `data` and return the finalized checksum byte.
    fn update(&mut self, data: &[u8]) -> u8;
}

const CRC8: Crc<u8> = Crc::<u8>::new(&CRC_8_SMBUS);

/// CRC-8/SMBUS: polynomial 0x07, init 0x00, no reflection, xorout 0x00.
///
/// The running value is carried between calls, so a prime followed by any
/// number of updates is equivalent to checksumming the concatenated input
/// in one pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct Crc8 {
    state: u8,
}

impl Crc8 {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameChecksum for Crc8 {
    fn prime(&mut self, seed: &[u8]) {
        self.state = CRC8.checksum(seed);
    }

    fn update(&mut self, data: &[u8]) -> u8 {
        let mut digest = CRC8.digest_with_initial(self.state);
        digest.update(data);
        self.state = digest.finalize();
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_answer_vector() {
        // CRC-8/SMBUS check value
        assert_eq!(CRC8.checksum(b"123456789"), 0xF4);
    }

    #[test]
    fn prime_then_update_matches_whole_slice() {
        let mut crc = Crc8::new();
        crc.prime(&[0x06]);
        let split = crc.update(&[0x41, 0x42]);

        assert_eq!(split, CRC8.checksum(&[0x06, 0x41, 0x42]));
    }

    #[test]
    fn updates_accumulate_across_calls() {
        let mut crc = Crc8::new();
        crc.prime(b"ab");
        crc.update(b"cd");
        let chained = crc.update(b"ef");

        assert_eq!(chained, CRC8.checksum(b"abcdef"));
    }

    #[test]
    fn prime_discards_previous_state() {
        let mut crc = Crc8::new();
        crc.prime(b"garbage");
        crc.update(b"more garbage");

        crc.prime(&[0x04]);
        let value = crc.update(&[]);

        assert_eq!(value, CRC8.checksum(&[0x04]));
    }

    #[test]
    fn empty_update_finalizes_seed_only() {
        let mut crc = Crc8::new();
        crc.prime(&[0x04]);
        assert_eq!(crc.update(&[]), 0x1C);
    }
}
