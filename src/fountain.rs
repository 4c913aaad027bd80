//! Deterministic LT-style erasure code: repair-packet generation and
//! iterative peeling decode.
//!
//! The PRNG (xorshift32) and the seed derivation from a repair index must be
//! bit-identical between encoder and decoder, since a repair packet's source
//! indices are never transmitted — they're rederived from `(repair_index,
//! source_count)` on both sides.

use std::collections::BTreeSet;

use rayon::prelude::*;

/// A repair packet, held in memory only. `source_indices` are rederived at
/// decode time rather than transmitted.
#[derive(Debug, Clone)]
pub struct RepairPacket {
    pub repair_index: u32,
    pub source_indices: BTreeSet<usize>,
    pub data: Vec<u8>,
}

/// A received repair symbol, as seen by the decoder: the index and payload it
/// carried on the wire, plus its rederived source set.
#[derive(Debug, Clone)]
pub struct ReceivedRepair {
    pub source_indices: BTreeSet<usize>,
    pub data: Vec<u8>,
}

fn xorshift32_next(state: &mut u32) -> u32 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    x
}

fn seed_for(repair_index: u32) -> u32 {
    (repair_index.wrapping_mul(2_654_435_761).wrapping_add(1)) | 1
}

/// Deterministically select the source indices covered by repair packet `r`
/// out of `n` total sources. Bit-identical in encoder and decoder.
///
/// When `n == 1` there is only one possible source, so the "repair" is
/// trivially a copy of it (degree 1); the general formula (which requires
/// `n >= 2`) doesn't apply to this case.
pub fn get_repair_sources(repair_index: u32, n: usize) -> BTreeSet<usize> {
    assert!(n >= 1, "fountain code requires at least one source");

    if n == 1 {
        let mut set = BTreeSet::new();
        set.insert(0);
        return set;
    }

    let mut state = seed_for(repair_index);
    let span = std::cmp::min(4, n - 1) as u32;
    let degree = 2 + (xorshift32_next(&mut state) % span) as usize;

    let mut indices = BTreeSet::new();
    while indices.len() < degree {
        let idx = (xorshift32_next(&mut state) % n as u32) as usize;
        indices.insert(idx);
    }
    indices
}

/// XOR `sources` at `indices` byte-wise into a fresh buffer of length
/// `symbol_size`. All source buffers must be exactly `symbol_size` long.
fn xor_sources(sources: &[Vec<u8>], indices: &BTreeSet<usize>, symbol_size: usize) -> Vec<u8> {
    let mut out = vec![0u8; symbol_size];
    for &idx in indices {
        let src = &sources[idx];
        for (o, &b) in out.iter_mut().zip(src.iter()) {
            *o ^= b;
        }
    }
    out
}

/// Generate repair packets covering `sources`. `ratio` is the fraction of
/// repair packets relative to `sources.len()`; at least one repair packet is
/// always emitted. Every source buffer must be the same length.
pub fn generate_repair_packets(sources: &[Vec<u8>], ratio: f64) -> Vec<RepairPacket> {
    let n = sources.len();
    if n == 0 {
        return Vec::new();
    }
    let symbol_size = sources[0].len();

    let repair_count = std::cmp::max(1, (n as f64 * ratio).ceil() as usize);

    (0..repair_count as u32)
        .into_par_iter()
        .map(|r| {
            let indices = get_repair_sources(r, n);
            let data = xor_sources(sources, &indices, symbol_size);
            RepairPacket {
                repair_index: r,
                source_indices: indices,
                data,
            }
        })
        .collect()
}

/// Iterative peeling decode. `sources` is a list of slots, each either filled
/// or absent; `repairs` carries rederived source sets. Mutates `sources` in
/// place, filling in any slot it can recover. Returns the number of slots
/// recovered during this call.
pub fn recover_packets(sources: &mut [Option<Vec<u8>>], repairs: &[ReceivedRepair]) -> usize {
    let mut recovered_count = 0;

    loop {
        let mut changed = false;

        for repair in repairs {
            let missing: Vec<usize> = repair
                .source_indices
                .iter()
                .copied()
                .filter(|idx| sources[*idx].is_none())
                .collect();

            if missing.len() != 1 {
                continue;
            }

            let target = missing[0];
            let mut buf = repair.data.clone();
            for &idx in &repair.source_indices {
                if idx == target {
                    continue;
                }
                if let Some(known) = &sources[idx] {
                    for (o, &b) in buf.iter_mut().zip(known.iter()) {
                        *o ^= b;
                    }
                }
            }

            sources[target] = Some(buf);
            recovered_count += 1;
            changed = true;
        }

        if !changed {
            break;
        }
    }

    recovered_count
}
