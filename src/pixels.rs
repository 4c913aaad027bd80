//! Conversion between a flat packet byte buffer and an RGBA pixel buffer.
//!
//! The packet bytes themselves are already the RGB-triplet `FrameBytes` the
//! external muxer contract expects; these functions exist for the delegated
//! frame-image serialization step, which typically wants a real RGBA canvas
//! (e.g. to build an `image::RgbaImage`). Alpha is always fully opaque and is
//! discarded on the way back.

/// Convert a `frame_bytes`-length byte buffer into an RGBA pixel buffer.
/// Bytes past the end of `bytes` are treated as zero.
pub fn bytes_to_pixels(bytes: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut rgba = vec![0u8; width * height * 4];
    for i in 0..width * height {
        let src = i * 3;
        let dst = i * 4;
        rgba[dst] = bytes.get(src).copied().unwrap_or(0);
        rgba[dst + 1] = bytes.get(src + 1).copied().unwrap_or(0);
        rgba[dst + 2] = bytes.get(src + 2).copied().unwrap_or(0);
        rgba[dst + 3] = 255;
    }
    rgba
}

/// Convert an RGBA pixel buffer back into a flat RGB byte buffer, discarding alpha.
pub fn pixels_to_bytes(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; width * height * 3];
    for i in 0..width * height {
        let src = i * 4;
        let dst = i * 3;
        bytes[dst] = rgba[src];
        bytes[dst + 1] = rgba[src + 1];
        bytes[dst + 2] = rgba[src + 2];
    }
    bytes
}
