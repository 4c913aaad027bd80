pub mod checksum;
pub mod cipher;
pub mod codec;
pub mod config;
pub mod fountain;
pub mod metadata;
pub mod packet;
pub mod pixels;

pub use codec::frames::{DirPngSink, DirPngSource, VecSink, VecSource};
pub use codec::{decode, encode, CodecError, DecodedFile, EncodeInput, FrameSink, FrameSource};
pub use config::Config;
