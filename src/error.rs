use core::fmt;

use crate::codec::CodecFailure;

/// Codec operation that failed, carried by [`LoderError::Codec`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodecOp {
    Load,
    Inspect,
    Decode,
    Encode,
    Save,
}

impl fmt::Display for CodecOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CodecOp::Load => "load",
            CodecOp::Inspect => "inspect",
            CodecOp::Decode => "decode",
            CodecOp::Encode => "encode",
            CodecOp::Save => "save",
        })
    }
}

/// Fatal errors from PNG reading and writing.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LoderError {
    #[error("PNG {op} failed (code {code}): {message}")]
    Codec {
        op: CodecOp,
        code: u32,
        message: String,
    },

    #[error("image does not have a dimension attribute")]
    MissingDimensions,

    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("image data must be numeric or logical, got {0}")]
    InvalidSampleType(&'static str),

    #[error("unsupported PNG colour type {0}")]
    UnsupportedColourType(u8),

    #[error("unsupported channel count {0} (expected 1 to 4)")]
    UnsupportedChannelCount(usize),

    #[error("sample count mismatch: dimensions imply {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("compression level {0} is outside 0..=6")]
    InvalidCompressionLevel(u8),

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),
}

impl LoderError {
    pub(crate) fn codec(op: CodecOp, failure: CodecFailure) -> Self {
        LoderError::Codec {
            op,
            code: failure.code,
            message: failure.message,
        }
    }
}

/// Non-fatal conditions reported next to a successful result.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum Warning {
    /// Every sample maps to the same point of the range.
    FlatImage { value: f64 },
    /// At least one text entry had an undeclared encoding or a keyword PNG
    /// cannot carry.
    /// Raised once per call; `skipped` counts the dropped entries.
    TextEncodingSkipped { skipped: usize },
    /// Interlacing was requested but the codec only writes non-interlaced output.
    InterlaceUnsupported,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::FlatImage { value } => {
                write!(f, "image is totally flat (all samples {value})")
            }
            Warning::TextEncodingSkipped { skipped } => write!(
                f,
                "{skipped} unwritable text entr{} skipped",
                if *skipped == 1 { "y" } else { "ies" }
            ),
            Warning::InterlaceUnsupported => {
                f.write_str("codec cannot write interlaced PNG; writing non-interlaced")
            }
        }
    }
}

/// Collects warnings for one call and mirrors them to the log.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub(crate) fn warn(&mut self, warning: Warning) {
        log::warn!("{warning}");
        self.warnings.push(warning);
    }

    pub(crate) fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}
