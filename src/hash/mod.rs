//! 32-bit MurmurHash3 (x86_32 variant).
//!
//! A fast non-cryptographic hash for callers building their own hashed
//! structures. Unrelated to the tree itself.
//!
//! ```rust
//! use std::collections::HashMap;
//! use llrb_map::hash::{BuildMurmur3, murmur3_32};
//!
//! assert_eq!(murmur3_32(b"", 0), 0);
//!
//! let mut seen: HashMap<&str, u32, BuildMurmur3> = HashMap::with_hasher(BuildMurmur3::new(42));
//! seen.insert("alpha", 1);
//! assert_eq!(seen.get("alpha"), Some(&1));
//! ```

use std::hash::{BuildHasher, Hasher};

const C1: u32 = 0xcc9e_2d51;
const C2: u32 = 0x1b87_3593;

/// Hash `data` with the given `seed`.
pub fn murmur3_32(data: &[u8], seed: u32) -> u32 {
    let mut h1 = seed;

    let mut blocks = data.chunks_exact(4);
    for block in &mut blocks {
        let k1 = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);
        h1 ^= mix_k1(k1);
        h1 = h1.rotate_left(13);
        h1 = h1.wrapping_mul(5).wrapping_add(0xe654_6b64);
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        let mut k1 = 0u32;
        for (shift, byte) in tail.iter().enumerate() {
            k1 ^= u32::from(*byte) << (8 * shift);
        }
        h1 ^= mix_k1(k1);
    }

    // Only the low 32 bits of the length take part, as in the reference.
    h1 ^= data.len() as u32;
    fmix32(h1)
}

#[inline]
fn mix_k1(k1: u32) -> u32 {
    k1.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2)
}

/// Final avalanche.
#[inline]
fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

/// `std::hash::Hasher` adapter. Bytes written are buffered and hashed as a
/// single message on `finish`, so the result equals [`murmur3_32`] over the
/// concatenated input.
#[derive(Debug, Clone, Default)]
pub struct Murmur3Hasher {
    seed: u32,
    buffer: Vec<u8>,
}

impl Murmur3Hasher {
    pub fn with_seed(seed: u32) -> Self {
        Murmur3Hasher {
            seed,
            buffer: Vec::new(),
        }
    }
}

impl Hasher for Murmur3Hasher {
    fn write(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    fn finish(&self) -> u64 {
        u64::from(murmur3_32(&self.buffer, self.seed))
    }
}

/// Builds [`Murmur3Hasher`]s sharing one seed, for use with `HashMap`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildMurmur3 {
    pub seed: u32,
}

impl BuildMurmur3 {
    pub fn new(seed: u32) -> Self {
        BuildMurmur3 { seed }
    }
}

impl BuildHasher for BuildMurmur3 {
    type Hasher = Murmur3Hasher;

    fn build_hasher(&self) -> Self::Hasher {
        Murmur3Hasher::with_seed(self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vectors() {
        assert_eq!(murmur3_32(b"", 0), 0);
        assert_eq!(murmur3_32(b"", 1), 0x514e_28b7);
        assert_eq!(murmur3_32(b"", 0xffff_ffff), 0x81f1_6f39);
        assert_eq!(murmur3_32(&[0xff, 0xff, 0xff, 0xff], 0), 0x7629_3b50);
        assert_eq!(murmur3_32(&[0x21, 0x43, 0x65, 0x87], 0), 0xf55b_516b);
        assert_eq!(murmur3_32(&[0x21, 0x43, 0x65], 0), 0x7e4a_8634);
        assert_eq!(murmur3_32(&[0x21, 0x43], 0), 0xa0f7_b07a);
        assert_eq!(murmur3_32(&[0x21], 0), 0x7266_1cf4);
    }

    #[test]
    fn test_hasher_matches_function() {
        let mut hasher = Murmur3Hasher::with_seed(7);
        hasher.write(b"hello ");
        hasher.write(b"world");
        assert_eq!(hasher.finish(), u64::from(murmur3_32(b"hello world", 7)));
    }
}
