//! Perceptual fingerprints.
//!
//! A [`Fingerprint`] is the quantised 8x8 DCT of an image's luma, flattened
//! so that its first `k²` samples are the `k x k` low-frequency block. Any
//! such prefix is itself a coarser fingerprint, which is what the trie keys
//! its levels on.
//!
//! # Example
//!
//! ```
//! use simian_core::Fingerprint;
//!
//! let a = Fingerprint::from_samples(vec![0; 64]);
//! let b = Fingerprint::from_samples(vec![1; 64]);
//! assert!((a.distance(&b) - 1.0 / 12.0).abs() < 1e-12);
//! assert_eq!(a.prefix(2).len(), 4);
//! ```

pub mod codec;
pub mod dct;
mod judgment;


use std::fmt;
use std::str::FromStr;

use image::DynamicImage;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::constants::codec::{DIFFERENCE_SCALE, SAMPLE_BYTES};
use crate::error::FingerprintError;

pub use judgment::Judgment;

/// Distance reported for fingerprints that cannot be compared.
pub const MAX_DIFFERENCE: f64 = f64::MAX;

/// Ordered sequence of quantised frequency samples.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    samples: Vec<i16>,
}

impl Fingerprint {
    pub fn from_samples(samples: Vec<i16>) -> Self {
        Self { samples }
    }

    /// Fingerprint of an image at full resolution (64 samples).
    pub fn from_image(image: &DynamicImage) -> Result<Self, FingerprintError> {
        codec::encode(image)
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Side length of the square block this fingerprint covers.
    pub fn size(&self) -> usize {
        dct::square_side(self.samples.len())
    }

    /// The first `level²` samples, clamped to the full length.
    pub fn prefix(&self, level: usize) -> Fingerprint {
        let n = level.saturating_mul(level).min(self.samples.len());
        Fingerprint::from_samples(self.samples[..n].to_vec())
    }

    /// Sum of absolute sample differences; `u64::MAX` on length mismatch.
    pub fn l1_distance(&self, other: &Fingerprint) -> u64 {
        if self.samples.len() != other.samples.len() {
            return u64::MAX;
        }
        self.samples
            .iter()
            .zip(&other.samples)
            .map(|(&a, &b)| u64::from((i32::from(a) - i32::from(b)).unsigned_abs()))
            .sum()
    }

    /// Normalised L1 distance, `Σ|a-b| / (len * 12)`.
    ///
    /// Returns [`MAX_DIFFERENCE`] when the lengths differ and `0.0` for two
    /// empty fingerprints.
    pub fn distance(&self, other: &Fingerprint) -> f64 {
        if self.samples.len() != other.samples.len() {
            return MAX_DIFFERENCE;
        }
        if self.samples.is_empty() {
            return 0.0;
        }
        self.l1_distance(other) as f64 / (self.samples.len() as f64 * DIFFERENCE_SCALE)
    }

    /// Big-endian bytes, two per sample.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_be_bytes()).collect()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FingerprintError> {
        if bytes.len() % SAMPLE_BYTES != 0 {
            return Err(FingerprintError::InvalidByteLength { len: bytes.len() });
        }
        Ok(Self::from_samples(
            bytes
                .chunks_exact(SAMPLE_BYTES)
                .map(|c| i16::from_be_bytes([c[0], c[1]]))
                .collect(),
        ))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Fingerprint {
    type Err = FingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() % (SAMPLE_BYTES * 2) != 0 {
            return Err(FingerprintError::InvalidHex {
                reason: format!("length {} is not a multiple of 4", s.len()),
            });
        }
        let bytes = hex::decode(s).map_err(|e| FingerprintError::InvalidHex {
            reason: e.to_string(),
        })?;
        Self::from_bytes(&bytes)
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            self.samples.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let text = String::deserialize(deserializer)?;
            text.parse().map_err(D::Error::custom)
        } else {
            Vec::<i16>::deserialize(deserializer).map(Self::from_samples)
        }
    }
}
