//! The top-level encode/decode pipeline: chunk → packetize → generate repair
//! → emit frames (encode), and collect frames → classify → peel → reassemble
//! → decrypt (decode).
//!
//! The core is pure byte-in/byte-out: it never touches a filesystem or image
//! library directly. [`FrameSink`]/[`FrameSource`] are the seam a caller
//! plugs a real muxer (or, for testing, an in-memory buffer) into.

pub mod decode;
pub mod encode;
pub mod frames;

use thiserror::Error;

pub use decode::decode;
pub use encode::encode;

/// Errors surfaced by the codec core.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("input bytes are empty")]
    EmptyInput,
    #[error("encryption failed")]
    CryptoFailure,
    #[error("decryption failed: wrong password or corrupted data")]
    DecryptionAuthFailure,
    #[error("no decodable frames in the input stream")]
    NoFrames,
    #[error("frame 0 (metadata) is missing or CRC-invalid")]
    MetadataLost,
    #[error("source packet {0} could not be recovered")]
    UnrecoverableLoss(usize),
    #[error("frame-0 payload is malformed: {0}")]
    MalformedMetadata(String),
    #[error("file is encrypted but no password was given")]
    PasswordRequired,
    #[error("frame sink/source error: {0}")]
    Frame(String),
}

impl From<crate::cipher::CryptoError> for CodecError {
    fn from(e: crate::cipher::CryptoError) -> Self {
        match e {
            crate::cipher::CryptoError::CryptoFailure => CodecError::CryptoFailure,
            crate::cipher::CryptoError::DecryptionAuthFailure => CodecError::DecryptionAuthFailure,
        }
    }
}

impl From<crate::metadata::MetadataError> for CodecError {
    fn from(e: crate::metadata::MetadataError) -> Self {
        CodecError::MalformedMetadata(e.to_string())
    }
}

/// The file handed to [`encode`].
#[derive(Debug, Clone)]
pub struct EncodeInput {
    pub name: String,
    pub bytes: Vec<u8>,
    pub mime: String,
}

/// The file produced by [`decode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// A sink that consumes ordered RGB-triplet frame buffers (each exactly
/// `frame_bytes` long) and produces a container of type `Output` once
/// finished. Stands in for the external video muxer, whose actual container
/// format is out of scope for this crate.
pub trait FrameSink {
    type Output;

    fn push(&mut self, frame_rgb: &[u8]) -> Result<(), CodecError>;
    fn finish(self) -> Result<Self::Output, CodecError>;
}

/// A source that yields ordered RGB-triplet frame buffers, or `None` once
/// exhausted. Stands in for the external video demuxer.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<Vec<u8>>, CodecError>;
}
