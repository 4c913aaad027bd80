//! Fixed geometry and on-wire constants for the storage codec.

/// Frame width in pixels.
pub const FRAME_WIDTH: usize = 1920;
/// Frame height in pixels.
pub const FRAME_HEIGHT: usize = 1080;
/// Bytes per pixel in the RGB-triplet frame layout the muxer contract expects.
pub const BYTES_PER_PIXEL: usize = 3;

/// Total bytes a single frame can carry: `width * height * 3`.
pub const FRAME_BYTES: usize = FRAME_WIDTH * FRAME_HEIGHT * BYTES_PER_PIXEL;

/// Packet header size in bytes (see `packet` module).
pub const PACKET_HEADER_SIZE: usize = 19;

/// Largest payload a single packet can carry.
pub const MAX_PAYLOAD: usize = FRAME_BYTES - PACKET_HEADER_SIZE;

/// 16-bit magic identifying a codec packet.
pub const MAGIC: u16 = 0xDB02;

/// Packet flag: metadata payload is wrapped in an AEAD envelope.
pub const FLAG_ENCRYPTED: u8 = 0b01;
/// Packet flag: this packet carries a fountain repair symbol.
pub const FLAG_REPAIR: u8 = 0b10;

/// Default fraction of repair packets generated relative to source count.
pub const DEFAULT_REPAIR_RATIO: f64 = 0.3;

/// Salt length for the PBKDF2-HMAC-SHA256 key derivation.
pub const SALT_LEN: usize = 16;
/// IV length for AES-256-GCM.
pub const IV_LEN: usize = 12;
/// GCM authentication tag length.
pub const TAG_LEN: usize = 16;
/// Total non-plaintext overhead of an encryption envelope: `salt + iv + tag`.
pub const ENVELOPE_OVERHEAD: usize = SALT_LEN + IV_LEN + TAG_LEN;

/// PBKDF2 iteration count.
pub const PBKDF2_ITERATIONS: u32 = 100_000;
/// Derived key length in bytes (AES-256 key).
pub const KEY_LEN: usize = 32;

/// Runtime configuration for an encode operation.
///
/// The frame geometry is fixed by the on-wire format and is not meant to vary
/// between encoder and decoder, but is still threaded through as a struct
/// (rather than hardcoded at every call site) so a future format revision
/// with a different resolution doesn't need to touch the codec's call
/// signatures.
#[derive(Debug, Clone)]
pub struct Config {
    pub frame_width: usize,
    pub frame_height: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frame_width: FRAME_WIDTH,
            frame_height: FRAME_HEIGHT,
        }
    }
}

impl Config {
    /// Total bytes a frame can carry under this configuration.
    pub fn frame_bytes(&self) -> usize {
        self.frame_width * self.frame_height * BYTES_PER_PIXEL
    }

    /// Largest payload a single packet can carry under this configuration.
    pub fn max_payload(&self) -> usize {
        self.frame_bytes() - PACKET_HEADER_SIZE
    }
}
