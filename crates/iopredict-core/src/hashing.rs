//! MurmurHash2-64A, used for context hashes and call-stack ids.
//!
//! Blocks are read little-endian so the digest of a word sequence does not
//! depend on the host byte order.

use crate::types::{CallStackId, ContextHash};

const M: u64 = 0xc6a4_a793_5bd1_e995;
const R: u32 = 47;

/// Hash an arbitrary byte buffer.
pub fn murmur64a(bytes: &[u8], seed: u64) -> u64 {
    let mut h = seed ^ (bytes.len() as u64).wrapping_mul(M);

    let mut blocks = bytes.chunks_exact(8);
    for block in &mut blocks {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(block);
        h = mix_block(h, u64::from_le_bytes(buf));
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        for (i, byte) in tail.iter().enumerate().rev() {
            h ^= u64::from(*byte) << (8 * i);
        }
        h = h.wrapping_mul(M);
    }

    finalize(h)
}

/// Hash a sequence of 64-bit words as their little-endian byte image.
///
/// Equivalent to `murmur64a` over the concatenated `to_le_bytes` of each word,
/// without building the intermediate buffer.
pub fn hash_words(words: &[u64], seed: u64) -> u64 {
    let len = (words.len() as u64).wrapping_mul(8);
    let mut h = seed ^ len.wrapping_mul(M);
    for &word in words {
        h = mix_block(h, word);
    }
    finalize(h)
}

/// Digest of a context window given oldest-to-newest.
pub fn context_hash(ordered: &[u64], seed: u64) -> ContextHash {
    ContextHash(hash_words(ordered, seed))
}

/// Reduce a list of normalized frame offsets to a call-stack id.
pub fn call_stack_id(frame_offsets: &[u64], seed: u64) -> CallStackId {
    CallStackId(hash_words(frame_offsets, seed))
}

#[inline]
fn mix_block(h: u64, mut k: u64) -> u64 {
    k = k.wrapping_mul(M);
    k ^= k >> R;
    k = k.wrapping_mul(M);
    (h ^ k).wrapping_mul(M)
}

#[inline]
fn finalize(mut h: u64) -> u64 {
    h ^= h >> R;
    h = h.wrapping_mul(M);
    h ^= h >> R;
    h
}
