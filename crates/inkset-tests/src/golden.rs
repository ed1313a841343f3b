//! Golden hash tests for merge output.
//!
//! The merged output of a fixed fixture is hashed (SHA-256 over the
//! interleaved samples, little endian) and compared with the hashes in
//! `tests/golden/merge_hashes.json`. Any change to the overprint
//! arithmetic, the rounding or the channel order shows up here.
//!
//! # Running
//!
//! ```bash
//! cargo test --package inkset-tests golden
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use inkset_core::{BitDepth, Sample, SeparationBufferSet};
use inkset_ops::{assemble, merge, MergeOptions, Quantization};
use sha2::{Digest, Sha256};

use crate::{demo_catalog, golden_texture, init_tracing, reference_merge, textured_set};

// ---------------------------------------------------------------------------
// Golden data loader
// ---------------------------------------------------------------------------

#[derive(Debug, serde::Deserialize)]
struct GoldenData {
    #[allow(dead_code)]
    version: String,
    #[allow(dead_code)]
    catalog: String,
    tests: HashMap<String, GoldenEntry>,
}

#[derive(Debug, serde::Deserialize)]
struct GoldenEntry {
    depth: BitDepth,
    width: u32,
    height: u32,
    quantization: Quantization,
    hash: String,
}

fn golden_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../tests/golden/merge_hashes.json")
}

fn load_golden() -> GoldenData {
    let path = golden_path();
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));
    serde_json::from_str(&content).expect("golden JSON")
}

// ---------------------------------------------------------------------------
// Hash utilities
// ---------------------------------------------------------------------------

fn hash_samples<T: Sample>(data: &[T]) -> String {
    let mut hasher = Sha256::new();
    for &s in data {
        let v = s.to_u32();
        if T::BITS == 8 {
            hasher.update([v as u8]);
        } else {
            hasher.update((v as u16).to_le_bytes());
        }
    }
    hex::encode(hasher.finalize())
}

fn merge_fixture<T: Sample>(entry: &GoldenEntry, options: &MergeOptions) -> Vec<T> {
    let catalog = demo_catalog();
    let set: SeparationBufferSet<T> =
        textured_set(&catalog, entry.width, entry.height, entry.depth, golden_texture(entry.depth));
    let merged = merge(&catalog, &set, options).expect("merge");
    assemble::interleave(&merged).into_data()
}

fn check_entry(name: &str, entry: &GoldenEntry, options: &MergeOptions) {
    let hash = match entry.depth {
        BitDepth::U8 => hash_samples(&merge_fixture::<u8>(entry, options)),
        _ => hash_samples(&merge_fixture::<u16>(entry, options)),
    };
    println!("{name}: {hash}");
    assert_eq!(hash, entry.hash, "golden mismatch for {name}");
}

#[test]
fn test_golden_hashes() {
    init_tracing();
    let golden = load_golden();
    assert_eq!(golden.tests.len(), 6);
    for (name, entry) in &golden.tests {
        let options = MergeOptions::default().with_quantization(entry.quantization);
        check_entry(name, entry, &options);
    }
}

#[test]
fn test_golden_hashes_sequential() {
    let golden = load_golden();
    for (name, entry) in &golden.tests {
        check_entry(name, entry, &MergeOptions::sequential(entry.quantization));
    }
}

#[test]
fn test_per_pass_golden_matches_reference_loop() {
    let golden = load_golden();
    for (name, entry) in golden.tests.iter().filter(|(_, e)| e.quantization == Quantization::PerPass) {
        let catalog = demo_catalog();
        let reference = match entry.depth {
            BitDepth::U8 => {
                let set: SeparationBufferSet<u8> =
                    textured_set(&catalog, entry.width, entry.height, entry.depth, golden_texture(entry.depth));
                let samples: Vec<u8> = reference_merge(&catalog, &set).into_iter().map(|v| v as u8).collect();
                hash_samples(&samples)
            }
            _ => {
                let set: SeparationBufferSet<u16> =
                    textured_set(&catalog, entry.width, entry.height, entry.depth, golden_texture(entry.depth));
                let samples: Vec<u16> = reference_merge(&catalog, &set).into_iter().map(|v| v as u16).collect();
                hash_samples(&samples)
            }
        };
        assert_eq!(reference, entry.hash, "reference loop disagrees with golden {name}");
    }
}

// Hex encoding for hashes
mod hex {
    const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        let bytes = bytes.as_ref();
        let mut s = String::with_capacity(bytes.len() * 2);
        for &b in bytes {
            s.push(HEX_CHARS[(b >> 4) as usize] as char);
            s.push(HEX_CHARS[(b & 0xf) as usize] as char);
        }
        s
    }
}
