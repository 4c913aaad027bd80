//! One fixed-size framed packet: a 19-byte header plus payload, zero-padded
//! to exactly [`config::FRAME_BYTES`].
//!
//! ```text
//! offset  size  field
//! 0       2     magic         constant 0xDB02
//! 2       1     flags         bit0 = encrypted (meta only), bit1 = repair
//! 3       4     packet_index  this packet's ordinal in the stream
//! 7       4     total_packets total count emitted for this file
//! 11      4     payload_length bytes of payload that are meaningful
//! 15      4     checksum      CRC-32 over payload[0..payload_length]
//! ```

use byteorder::{ByteOrder, LittleEndian};

use crate::checksum;
use crate::config;

const OFF_MAGIC: usize = 0;
const OFF_FLAGS: usize = 2;
const OFF_PACKET_INDEX: usize = 3;
const OFF_TOTAL_PACKETS: usize = 7;
const OFF_PAYLOAD_LEN: usize = 11;
const OFF_CHECKSUM: usize = 15;

/// Parsed packet header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    pub magic: u16,
    pub flags: u8,
    pub packet_index: u32,
    pub total_packets: u32,
    pub payload_length: u32,
    pub checksum: u32,
}

impl PacketHeader {
    pub fn is_encrypted(&self) -> bool {
        self.flags & config::FLAG_ENCRYPTED != 0
    }

    pub fn is_repair(&self) -> bool {
        self.flags & config::FLAG_REPAIR != 0
    }
}

/// Serialize a packet: header + payload, zero-padded to `frame_bytes`.
///
/// `payload.len()` must not exceed `frame_bytes - PACKET_HEADER_SIZE`.
pub fn encode_packet(
    packet_index: u32,
    total_packets: u32,
    payload: &[u8],
    flags: u8,
    frame_bytes: usize,
) -> Vec<u8> {
    debug_assert!(payload.len() <= frame_bytes - config::PACKET_HEADER_SIZE);

    let mut buf = vec![0u8; frame_bytes];
    LittleEndian::write_u16(&mut buf[OFF_MAGIC..], config::MAGIC);
    buf[OFF_FLAGS] = flags;
    LittleEndian::write_u32(&mut buf[OFF_PACKET_INDEX..], packet_index);
    LittleEndian::write_u32(&mut buf[OFF_TOTAL_PACKETS..], total_packets);
    LittleEndian::write_u32(&mut buf[OFF_PAYLOAD_LEN..], payload.len() as u32);

    let crc = checksum::crc32(payload);
    LittleEndian::write_u32(&mut buf[OFF_CHECKSUM..], crc);

    buf[config::PACKET_HEADER_SIZE..config::PACKET_HEADER_SIZE + payload.len()]
        .copy_from_slice(payload);
    buf
}

/// Parse a packet's header and payload out of a raw buffer.
///
/// Returns `None` when `raw` is shorter than the header, the magic doesn't
/// match, or the declared payload length doesn't fit in `raw`. Does *not*
/// verify the checksum — that's a separate step ([`verify_packet`]) so a
/// caller can classify a CRC-failed packet as "present but corrupt" rather
/// than discarding it outright.
pub fn decode_packet(raw: &[u8]) -> Option<(PacketHeader, &[u8])> {
    if raw.len() < config::PACKET_HEADER_SIZE {
        return None;
    }

    let magic = LittleEndian::read_u16(&raw[OFF_MAGIC..]);
    if magic != config::MAGIC {
        return None;
    }

    let flags = raw[OFF_FLAGS];
    let packet_index = LittleEndian::read_u32(&raw[OFF_PACKET_INDEX..]);
    let total_packets = LittleEndian::read_u32(&raw[OFF_TOTAL_PACKETS..]);
    let payload_length = LittleEndian::read_u32(&raw[OFF_PAYLOAD_LEN..]);
    let checksum = LittleEndian::read_u32(&raw[OFF_CHECKSUM..]);

    let payload_end = config::PACKET_HEADER_SIZE.checked_add(payload_length as usize)?;
    if raw.len() < payload_end {
        return None;
    }

    let header = PacketHeader {
        magic,
        flags,
        packet_index,
        total_packets,
        payload_length,
        checksum,
    };
    Some((header, &raw[config::PACKET_HEADER_SIZE..payload_end]))
}

/// Verify that `payload`'s CRC-32 matches the header's declared `checksum`.
pub fn verify_packet(payload: &[u8], checksum: u32) -> bool {
    checksum::verify(payload, checksum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let payload = vec![0xAB; 128];
        let raw = encode_packet(3, 10, &payload, config::FLAG_REPAIR, config::FRAME_BYTES);
        assert_eq!(raw.len(), config::FRAME_BYTES);

        let (header, decoded_payload) = decode_packet(&raw).unwrap();
        assert_eq!(header.magic, config::MAGIC);
        assert_eq!(header.packet_index, 3);
        assert_eq!(header.total_packets, 10);
        assert_eq!(header.payload_length, 128);
        assert_eq!(header.checksum, checksum::crc32(&payload));
        assert!(header.is_repair());
        assert!(!header.is_encrypted());
        assert_eq!(decoded_payload, payload.as_slice());
        assert!(verify_packet(decoded_payload, header.checksum));
    }

    #[test]
    fn bad_magic_is_none() {
        let mut raw = encode_packet(0, 1, b"hi", 0, config::FRAME_BYTES);
        raw[0] ^= 0xFF;
        assert!(decode_packet(&raw).is_none());
    }

    #[test]
    fn too_short_is_none() {
        assert!(decode_packet(&[0u8; 10]).is_none());
    }

    #[test]
    fn crc_failure_is_detected_separately() {
        let payload = vec![1, 2, 3, 4];
        let mut raw = encode_packet(0, 1, &payload, 0, config::FRAME_BYTES);
        // Corrupt the payload without touching the header; decode still succeeds.
        raw[config::PACKET_HEADER_SIZE] ^= 0xFF;
        let (header, decoded_payload) = decode_packet(&raw).unwrap();
        assert!(!verify_packet(decoded_payload, header.checksum));
    }

    #[test]
    fn max_payload_fits_exactly() {
        let payload = vec![7u8; config::MAX_PAYLOAD];
        let raw = encode_packet(0, 1, &payload, 0, config::FRAME_BYTES);
        assert_eq!(raw.len(), config::FRAME_BYTES);
        let (header, decoded) = decode_packet(&raw).unwrap();
        assert_eq!(header.payload_length as usize, config::MAX_PAYLOAD);
        assert_eq!(decoded, payload.as_slice());
    }
}
