use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use crate::cipher;
use crate::config::{self, Config};
use crate::fountain::{self, ReceivedRepair};
use crate::metadata::decode_metadata;
use crate::packet::{decode_packet, verify_packet, PacketHeader};

use super::{CodecError, DecodedFile, FrameSource};

struct DecodedFrame {
    header: PacketHeader,
    raw: Vec<u8>,
    valid: bool,
}

/// Decode a stream of frames yielded by `source` back into the original file.
///
/// Pipeline: `collect frames → classify (metadata / source / repair) →
/// peeling recovery of missing sources → reassemble → (optional decrypt)`.
///
/// Classification of a received, CRC-valid frame into its source or repair
/// role, and its position within that role, is done from two facts carried
/// in every packet's own header: `packet_index` and `total_packets`. Since
/// the encoder always lays sources out contiguously over `1..=n` followed by
/// repairs over `n+1..=n+m`, and the repair ratio is a fixed constant, `n`
/// (the original source count) is fully recoverable from `total_packets`
/// alone — it does not depend on which frames happened to survive. This
/// avoids the ambiguity of classifying by order of arrival, which silently
/// misaligns once frames are dropped out of the middle of the stream.
pub fn decode<T: FrameSource>(
    source: &mut T,
    password: Option<&str>,
    cfg: &Config,
) -> Result<DecodedFile, CodecError> {
    let max_payload = cfg.max_payload();

    let mut frames = Vec::new();
    while let Some(raw) = source.next_frame()? {
        if let Some((header, payload)) = decode_packet(&raw) {
            let valid = verify_packet(payload, header.checksum);
            frames.push(DecodedFrame { header, raw, valid });
        }
    }
    info!("collected {} decodable frames", frames.len());

    if frames.is_empty() {
        return Err(CodecError::NoFrames);
    }

    let meta_frame = frames
        .iter()
        .find(|f| f.header.packet_index == 0 && f.valid)
        .ok_or(CodecError::MetadataLost)?;

    let meta_payload = &meta_frame.raw[config::PACKET_HEADER_SIZE
        ..config::PACKET_HEADER_SIZE + meta_frame.header.payload_length as usize];
    let meta = decode_metadata(meta_payload)?;
    let total = meta_frame.header.total_packets;

    if meta.encrypted && password.is_none() {
        return Err(CodecError::PasswordRequired);
    }

    let n = source_count_from_total(total, config::DEFAULT_REPAIR_RATIO);
    let m = total as usize - 1 - n;
    info!("expecting {} source chunks and {} repair chunks", n, m);

    let mut sources: Vec<Option<Vec<u8>>> = vec![None; n];
    let mut repairs: Vec<ReceivedRepair> = Vec::new();

    for frame in &frames {
        if !frame.valid || frame.header.packet_index == 0 {
            continue;
        }
        let idx = frame.header.packet_index as usize;
        let chunk = &frame.raw[config::PACKET_HEADER_SIZE..config::PACKET_HEADER_SIZE + max_payload];

        if frame.header.is_repair() {
            if idx > n && idx <= n + m {
                let repair_index = (idx - n - 1) as u32;
                let source_indices = fountain::get_repair_sources(repair_index, n);
                repairs.push(ReceivedRepair {
                    source_indices,
                    data: chunk.to_vec(),
                });
            }
        } else if idx >= 1 && idx <= n {
            sources[idx - 1] = Some(chunk.to_vec());
        }
    }

    let progress = ProgressBar::new(n as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.green/black} peeling recovery")
            .unwrap(),
    );
    fountain::recover_packets(&mut sources, &repairs);
    progress.finish_and_clear();

    if let Some(missing) = sources.iter().position(|s| s.is_none()) {
        return Err(CodecError::UnrecoverableLoss(missing));
    }

    let mut reassembled = Vec::with_capacity(n * max_payload);
    for chunk in sources {
        reassembled.extend_from_slice(&chunk.unwrap());
    }

    let bytes = if meta.encrypted {
        let expected_len = meta.original_size as usize + config::ENVELOPE_OVERHEAD;
        reassembled.truncate(expected_len);
        cipher::decrypt(&reassembled, password.expect("checked above"))?
    } else {
        reassembled.truncate(meta.original_size as usize);
        reassembled
    };

    Ok(DecodedFile { name: meta.name, bytes })
}

/// Recover the original source count from `total_packets` and the (fixed,
/// known) repair ratio: `total = 1 + n + max(1, ceil(n * ratio))`.
fn source_count_from_total(total: u32, ratio: f64) -> usize {
    for n in 1..total as usize {
        let m = std::cmp::max(1, (n as f64 * ratio).ceil() as usize);
        if 1 + n + m == total as usize {
            return n;
        }
    }
    // total == 1 (metadata only, no sources) never happens for non-empty
    // input, but fall back to zero sources rather than panicking.
    0
}
