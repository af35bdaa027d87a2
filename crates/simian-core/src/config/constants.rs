//! Fixed numeric parameters of the fingerprint codec and the trie.

/// Codec constants.
pub mod codec {
    /// Side length of the downsampled luma grid and of the DCT block.
    pub const FINGERPRINT_SIDE: usize = 8;

    /// Number of samples in a full-resolution fingerprint.
    pub const FINGERPRINT_LEN: usize = FINGERPRINT_SIDE * FINGERPRINT_SIDE;

    /// Luma values are centred around zero by subtracting this offset.
    pub const LUMA_OFFSET: i32 = 128;

    /// Right shift applied to the DC coefficient.
    pub const DC_SHIFT: u32 = 7;

    /// Right shift applied to every AC coefficient.
    pub const AC_SHIFT: u32 = 5;

    /// Per-sample scale used to normalise L1 distances.
    pub const DIFFERENCE_SCALE: f64 = 12.0;

    /// Bytes per serialized sample (big-endian i16).
    pub const SAMPLE_BYTES: usize = 2;
}

/// Upper bounds (exclusive) of the similarity judgments.
pub mod judgment {
    pub const DUPLICATE: f64 = 0.05;
    pub const VARIATION: f64 = 0.10;
    pub const SIMILAR: f64 = 0.20;
    pub const TONALLY_SIMILAR: f64 = 0.30;
}

/// Trie defaults.
pub mod index {
    use super::codec::FINGERPRINT_SIDE;

    /// Depth of the root node; prefixes at the root have length 1.
    pub const ROOT_DEPTH: usize = 1;

    /// Deepest level the trie can reach.
    pub const MAX_SUPPORTED_DEPTH: usize = FINGERPRINT_SIDE;

    pub const DEFAULT_MAX_DEPTH: usize = MAX_SUPPORTED_DEPTH;
    pub const DEFAULT_SPLIT_THRESHOLD: f64 = 0.1;

    /// Short side of generated thumbnails, in pixels.
    pub const DEFAULT_THUMBNAIL_SIZE: u32 = (FINGERPRINT_SIDE * 2) as u32;
}
