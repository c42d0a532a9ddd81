//! The PNG bitstream codec seam.
//!
//! Everything below this trait (chunk framing, filtering, DEFLATE, file
//! access) belongs to the codec. The marshaling layer only ever sees
//! [`PngHeader`] fields, raw 8-bit pixel buffers and [`CodecFailure`]s.

mod png_crate;

pub use png_crate::PngCrateCodec;

use std::path::Path;

use crate::limits::Limits;
use crate::metadata::compression::CompressionSettings;
use crate::pixel::ColourType;

/// Failure reported by a codec: a numeric code and its diagnostic text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodecFailure {
    pub code: u32,
    pub message: String,
}

impl CodecFailure {
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Unit of a pHYs chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhysicalUnit {
    /// Only the ratio of the two values is meaningful.
    Unspecified,
    Metre,
}

/// Pixels per unit along each axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicalDims {
    pub x: u32,
    pub y: u32,
    pub unit: PhysicalUnit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextChunkKind {
    /// iTXt, UTF-8.
    International,
    /// tEXt, Latin-1.
    Latin,
    /// zTXt, compressed Latin-1.
    CompressedLatin,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextChunk {
    pub kind: TextChunkKind,
    pub keyword: String,
    /// Only meaningful for iTXt.
    pub translated_keyword: String,
    pub text: String,
}

/// Header fields and ancillary chunks as the codec reports them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PngHeader {
    pub width: u32,
    pub height: u32,
    /// IHDR colour-type code; validated by [`ColourType::from_code`].
    pub colour_code: u8,
    pub bit_depth: u8,
    pub interlaced: bool,
    /// PLTE payload, RGB triples.
    pub palette: Option<Vec<u8>>,
    /// bKGD payload, interpretation depends on the colour type.
    pub background: Option<Vec<u8>>,
    pub physical: Option<PhysicalDims>,
    /// Text chunks: iTXt, then tEXt, then zTXt, each group in file order.
    pub text: Vec<TextChunk>,
}

/// A fully decoded image: final header state plus 8-bit pixels in the
/// requested colour type, row-major with interleaved channels.
#[derive(Clone, Debug)]
pub struct RawImage {
    pub header: PngHeader,
    pub pixels: Vec<u8>,
}

/// Everything the codec needs to write one 8-bit image.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodeSettings {
    pub colour_type: ColourType,
    pub compression: CompressionSettings,
    pub interlaced: bool,
    pub background: Option<Vec<u8>>,
    pub physical: Option<PhysicalDims>,
    pub text: Vec<TextChunk>,
}

/// A PNG codec plus byte-level file access.
///
/// Implementations hold no per-call state; every method is self-contained.
pub trait PngCodec {
    fn load(&self, path: &Path) -> Result<Vec<u8>, CodecFailure>;

    fn save(&self, bytes: &[u8], path: &Path) -> Result<(), CodecFailure>;

    /// Read the header and the chunks preceding the image data.
    fn inspect(&self, bytes: &[u8]) -> Result<PngHeader, CodecFailure>;

    /// Decode to 8-bit samples in `target` (never [`ColourType::Palette`]).
    ///
    /// Must not allocate more than [`Limits::memory_budget`] for pixels.
    fn decode(
        &self,
        bytes: &[u8],
        target: ColourType,
        limits: &Limits,
    ) -> Result<RawImage, CodecFailure>;

    fn encode(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        settings: &EncodeSettings,
    ) -> Result<Vec<u8>, CodecFailure>;

    /// Whether `EncodeSettings::interlaced` is honoured.
    fn supports_interlaced_output(&self) -> bool {
        false
    }
}
