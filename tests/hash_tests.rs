// MurmurHash3 x86_32 against the reference verification value and as a
// BuildHasher for std collections.

use std::collections::HashMap;
use std::hash::{BuildHasher, Hasher};

use llrb_map::hash::{BuildMurmur3, Murmur3Hasher, murmur3_32};

// =============================================================================
// Test 1: SMHasher verification value
// =============================================================================
#[test]
fn smhasher_verification_value() {
    // Hash keys {0}, {0,1}, ... {0..254} with seed 256 - len, concatenate the
    // little-endian results and hash that with seed 0.
    let mut key = [0u8; 256];
    let mut hashes = Vec::with_capacity(256 * 4);
    for i in 0..256usize {
        key[i] = i as u8;
        let hash = murmur3_32(&key[..i], (256 - i) as u32);
        hashes.extend_from_slice(&hash.to_le_bytes());
    }
    assert_eq!(murmur3_32(&hashes, 0), 0xB0F5_7EE3);
}

// =============================================================================
// Test 2: Seeds change the output
// =============================================================================
#[test]
fn seed_changes_hash() {
    let data = b"The quick brown fox jumps over the lazy dog";
    assert_ne!(murmur3_32(data, 0), murmur3_32(data, 1));
    assert_eq!(murmur3_32(data, 0x9747_b28c), murmur3_32(data, 0x9747_b28c));
}

// =============================================================================
// Test 3: Every tail length is handled
// =============================================================================
#[test]
fn tail_lengths_produce_distinct_hashes() {
    let data: Vec<u8> = (1..=8).collect();
    let hashes: Vec<u32> = (0..=data.len()).map(|len| murmur3_32(&data[..len], 0)).collect();
    for (i, a) in hashes.iter().enumerate() {
        for b in &hashes[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

// =============================================================================
// Test 4: Split writes hash like one contiguous write
// =============================================================================
#[test]
fn hasher_buffers_split_writes() {
    let build = BuildMurmur3::new(99);
    let mut split = build.build_hasher();
    split.write(&[1, 2, 3]);
    split.write(&[4, 5]);

    let mut whole = Murmur3Hasher::with_seed(99);
    whole.write(&[1, 2, 3, 4, 5]);

    assert_eq!(split.finish(), whole.finish());
    assert_eq!(whole.finish(), u64::from(murmur3_32(&[1, 2, 3, 4, 5], 99)));
}

// =============================================================================
// Test 5: Usable as a HashMap hasher
// =============================================================================
#[test]
fn hash_map_with_murmur3() {
    let mut counts: HashMap<String, usize, BuildMurmur3> = HashMap::with_hasher(BuildMurmur3::new(7));
    for word in "to be or not to be".split_whitespace() {
        *counts.entry(word.to_string()).or_default() += 1;
    }

    assert_eq!(counts.len(), 4);
    assert_eq!(counts["to"], 2);
    assert_eq!(counts["be"], 2);
    assert_eq!(counts["or"], 1);
    assert_eq!(BuildMurmur3::new(7).hash_one("to"), BuildMurmur3::new(7).hash_one("to"));
}
