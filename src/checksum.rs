//! CRC-32 (reflected, polynomial `0xEDB88320`) over a byte sequence.
//!
//! This is the IEEE 802.3 variant: reflected input, reflected output, initial
//! value `0xFFFFFFFF`, final XOR `0xFFFFFFFF`. `crc32fast` implements exactly
//! this table-driven algorithm, so packets checksummed here are bit-identical
//! to any other implementation of the same definition.

use crc32fast::Hasher;

/// Compute the CRC-32 of `data`.
pub fn crc32(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Verify that `data`'s CRC-32 matches `expected`.
pub fn verify(data: &[u8], expected: u32) -> bool {
    crc32(data) == expected
}
