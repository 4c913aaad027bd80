use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use crate::cipher;
use crate::config::{self, Config};
use crate::fountain;
use crate::metadata::{encode_metadata, FileMetadata};
use crate::packet::encode_packet;

use super::{CodecError, EncodeInput, FrameSink};

/// Encode `input` into a stream of fixed-size frames handed to `sink`.
///
/// Pipeline: `(optional encrypt) → split into zero-padded chunks → generate
/// repair packets → emit metadata, source, and repair frames`. Each frame is
/// pushed to `sink` as soon as it's built and then dropped, so peak memory
/// never holds more than one frame alongside the source/repair buffers.
pub fn encode<S: FrameSink>(
    input: &EncodeInput,
    password: Option<&str>,
    cfg: &Config,
    sink: &mut S,
) -> Result<(), CodecError> {
    if input.bytes.is_empty() {
        return Err(CodecError::EmptyInput);
    }

    let frame_bytes = cfg.frame_bytes();
    let max_payload = cfg.max_payload();

    let (payload_bytes, is_encrypted) = match password {
        Some(pw) => (cipher::encrypt(&input.bytes, pw)?, true),
        None => (input.bytes.clone(), false),
    };

    let n = payload_bytes.len().div_ceil(max_payload);
    info!("splitting {} bytes into {} source chunks", payload_bytes.len(), n);

    let sources: Vec<Vec<u8>> = (0..n)
        .map(|i| {
            let start = i * max_payload;
            let end = std::cmp::min(start + max_payload, payload_bytes.len());
            let mut chunk = vec![0u8; max_payload];
            chunk[..end - start].copy_from_slice(&payload_bytes[start..end]);
            chunk
        })
        .collect();

    let repairs = fountain::generate_repair_packets(&sources, config::DEFAULT_REPAIR_RATIO);
    let m = repairs.len();
    let total = (1 + n + m) as u32;
    info!("generated {} repair packets ({} total frames)", m, total);

    let progress = ProgressBar::new(total as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} frames ({eta})")
            .unwrap()
            .progress_chars("##-"),
    );

    let meta = FileMetadata {
        name: input.name.clone(),
        original_size: input.bytes.len() as u32,
        mime: input.mime.clone(),
        encrypted: is_encrypted,
    };
    let meta_flags = if is_encrypted { config::FLAG_ENCRYPTED } else { 0 };
    let meta_packet = encode_packet(0, total, &encode_metadata(&meta), meta_flags, frame_bytes);
    sink.push(&meta_packet)?;
    progress.inc(1);

    for (i, chunk) in sources.iter().enumerate() {
        let start = i * max_payload;
        let real_len = std::cmp::min(max_payload, payload_bytes.len() - start);
        let packet = encode_packet((i + 1) as u32, total, &chunk[..real_len], 0, frame_bytes);
        sink.push(&packet)?;
        progress.inc(1);
    }

    for repair in &repairs {
        let index = 1 + n + repair.repair_index as usize;
        let packet = encode_packet(
            index as u32,
            total,
            &repair.data,
            config::FLAG_REPAIR,
            frame_bytes,
        );
        sink.push(&packet)?;
        progress.inc(1);
    }

    progress.finish_with_message("encode complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::frames::VecSink;

    #[test]
    fn rejects_empty_input() {
        let input = EncodeInput {
            name: "empty.bin".to_string(),
            bytes: Vec::new(),
            mime: "application/octet-stream".to_string(),
        };
        let mut sink = VecSink::default();
        let result = encode(&input, None, &Config::default(), &mut sink);
        assert!(matches!(result, Err(CodecError::EmptyInput)));
    }

    #[test]
    fn small_file_produces_three_frames() {
        let input = EncodeInput {
            name: "a.bin".to_string(),
            bytes: (0u16..=255).map(|b| b as u8).collect(),
            mime: "application/octet-stream".to_string(),
        };
        let mut sink = VecSink::default();
        encode(&input, None, &Config::default(), &mut sink).unwrap();
        assert_eq!(sink.frames.len(), 3);
        for frame in &sink.frames {
            assert_eq!(frame.len(), config::FRAME_BYTES);
        }
    }
}
