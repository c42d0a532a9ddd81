//! Compression level table.

use crate::error::LoderError;

/// DEFLATE strategy for one compression level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompressionSettings {
    /// 0 stored, 1 fixed Huffman, 2 dynamic Huffman.
    pub block_type: u8,
    pub use_lz77: bool,
    pub window_size: u32,
    pub min_match: u16,
    /// Stop searching once a match this long is found.
    pub nice_match: u16,
    pub lazy_matching: bool,
}

impl CompressionSettings {
    const fn new(
        block_type: u8,
        use_lz77: bool,
        window_size: u32,
        min_match: u16,
        nice_match: u16,
        lazy_matching: bool,
    ) -> Self {
        Self {
            block_type,
            use_lz77,
            window_size,
            min_match,
            nice_match,
            lazy_matching,
        }
    }

    /// Look up a level in [`COMPRESSION_LEVELS`].
    pub fn for_level(level: u8) -> Result<Self, LoderError> {
        COMPRESSION_LEVELS
            .get(usize::from(level))
            .copied()
            .ok_or(LoderError::InvalidCompressionLevel(level))
    }

    pub fn is_compressed(&self) -> bool {
        self.block_type != 0
    }
}

pub const DEFAULT_COMPRESSION_LEVEL: u8 = 6;

/// Levels 0 (stored) to 6 (largest window, deepest search).
pub const COMPRESSION_LEVELS: [CompressionSettings; 7] = [
    CompressionSettings::new(0, false, 0, 0, 0, false),
    CompressionSettings::new(1, true, 512, 3, 32, false),
    CompressionSettings::new(2, true, 1024, 3, 64, false),
    CompressionSettings::new(2, true, 2048, 3, 128, true),
    CompressionSettings::new(2, true, 4096, 3, 128, true),
    CompressionSettings::new(2, true, 8192, 3, 258, true),
    CompressionSettings::new(2, true, 32768, 3, 258, true),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_zero_is_stored() {
        let s = CompressionSettings::for_level(0).unwrap();
        assert!(!s.is_compressed());
        assert!(!s.use_lz77);
    }

    #[test]
    fn windows_grow_with_level() {
        for pair in COMPRESSION_LEVELS.windows(2) {
            assert!(pair[0].window_size <= pair[1].window_size);
        }
        assert_eq!(
            CompressionSettings::for_level(DEFAULT_COMPRESSION_LEVEL)
                .unwrap()
                .window_size,
            32768
        );
    }

    #[test]
    fn out_of_table() {
        assert!(matches!(
            CompressionSettings::for_level(7),
            Err(LoderError::InvalidCompressionLevel(7))
        ));
    }
}
