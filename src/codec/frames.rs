//! Concrete [`FrameSink`]/[`FrameSource`] implementations.
//!
//! `VecSink`/`VecSource` are in-memory, used by tests and by callers that
//! already have all frames in hand. `DirPngSink`/`DirPngSource` write/read
//! each frame as a lossless PNG in a directory, standing in for the real
//! video muxer (whose container format is out of scope for this crate) so
//! the CLI has something runnable to drive end to end.

use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageBuffer, Rgba};

use crate::pixels;

use super::{CodecError, FrameSink, FrameSource};

/// An in-memory sink that collects pushed frames into a `Vec`.
#[derive(Debug, Default)]
pub struct VecSink {
    pub frames: Vec<Vec<u8>>,
}

impl FrameSink for VecSink {
    type Output = Vec<Vec<u8>>;

    fn push(&mut self, frame_rgb: &[u8]) -> Result<(), CodecError> {
        self.frames.push(frame_rgb.to_vec());
        Ok(())
    }

    fn finish(self) -> Result<Self::Output, CodecError> {
        Ok(self.frames)
    }
}

/// An in-memory source that yields frames from a `Vec` in order. Frames can
/// be removed or corrupted before decoding to simulate lossy transport.
#[derive(Debug, Default)]
pub struct VecSource {
    frames: std::vec::IntoIter<Vec<u8>>,
}

impl VecSource {
    pub fn new(frames: Vec<Vec<u8>>) -> Self {
        Self {
            frames: frames.into_iter(),
        }
    }
}

impl FrameSource for VecSource {
    fn next_frame(&mut self) -> Result<Option<Vec<u8>>, CodecError> {
        Ok(self.frames.next())
    }
}

/// A sink that writes each frame as a lossless PNG (`frame_000000.png`, ...)
/// into a directory, creating it if necessary.
pub struct DirPngSink {
    dir: PathBuf,
    width: usize,
    height: usize,
    count: usize,
}

impl DirPngSink {
    pub fn new(dir: impl AsRef<Path>, width: usize, height: usize) -> Result<Self, CodecError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| CodecError::Frame(e.to_string()))?;
        Ok(Self {
            dir,
            width,
            height,
            count: 0,
        })
    }
}

impl FrameSink for DirPngSink {
    type Output = PathBuf;

    fn push(&mut self, frame_rgb: &[u8]) -> Result<(), CodecError> {
        let rgba = pixels::bytes_to_pixels(frame_rgb, self.width, self.height);
        let image: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_raw(self.width as u32, self.height as u32, rgba)
                .ok_or_else(|| CodecError::Frame("frame buffer has the wrong size".to_string()))?;

        let path = self.dir.join(format!("frame_{:06}.png", self.count));
        image
            .save(&path)
            .map_err(|e| CodecError::Frame(e.to_string()))?;
        self.count += 1;
        Ok(())
    }

    fn finish(self) -> Result<Self::Output, CodecError> {
        Ok(self.dir)
    }
}

/// A source that reads `frame_NNNNNN.png` files out of a directory, in
/// ascending filename order.
pub struct DirPngSource {
    paths: std::vec::IntoIter<PathBuf>,
    width: usize,
    height: usize,
}

impl DirPngSource {
    pub fn new(dir: impl AsRef<Path>, width: usize, height: usize) -> Result<Self, CodecError> {
        let mut paths: Vec<PathBuf> = fs::read_dir(dir.as_ref())
            .map_err(|e| CodecError::Frame(e.to_string()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("png"))
            .collect();
        paths.sort();

        Ok(Self {
            paths: paths.into_iter(),
            width,
            height,
        })
    }
}

impl FrameSource for DirPngSource {
    fn next_frame(&mut self) -> Result<Option<Vec<u8>>, CodecError> {
        let Some(path) = self.paths.next() else {
            return Ok(None);
        };
        let image = image::open(&path).map_err(|e| CodecError::Frame(e.to_string()))?;
        let rgba = image.to_rgba8();
        if rgba.width() as usize != self.width || rgba.height() as usize != self.height {
            return Err(CodecError::Frame(format!(
                "{} has unexpected dimensions {}x{}",
                path.display(),
                rgba.width(),
                rgba.height()
            )));
        }
        Ok(Some(pixels::pixels_to_bytes(
            rgba.as_raw(),
            self.width,
            self.height,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_then_source_roundtrips_frames() {
        let frame_a = vec![1u8; 100];
        let frame_b = vec![2u8; 100];

        let mut sink = VecSink::default();
        sink.push(&frame_a).unwrap();
        sink.push(&frame_b).unwrap();
        let frames = sink.finish().unwrap();

        let mut source = VecSource::new(frames);
        assert_eq!(source.next_frame().unwrap(), Some(frame_a));
        assert_eq!(source.next_frame().unwrap(), Some(frame_b));
        assert_eq!(source.next_frame().unwrap(), None);
    }

    #[test]
    fn dir_png_sink_source_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let width = 8;
        let height = 8;
        let frame: Vec<u8> = (0..width * height * 3).map(|i| (i % 256) as u8).collect();

        let mut sink = DirPngSink::new(dir.path(), width, height).unwrap();
        sink.push(&frame).unwrap();
        sink.finish().unwrap();

        let mut source = DirPngSource::new(dir.path(), width, height).unwrap();
        let decoded = source.next_frame().unwrap().unwrap();
        assert_eq!(decoded, frame);
        assert_eq!(source.next_frame().unwrap(), None);
    }
}
