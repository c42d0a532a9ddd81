//! # loder
//!
//! Reads PNG files into column-major numeric arrays and writes such arrays
//! back out as PNG.
//!
//! ## Array layout
//!
//! Images are `(height, width, channels)` arrays stored column-major: the
//! row index varies fastest, then the column, then the channel. One to four
//! channels map to grey, grey+alpha, RGB and RGBA. Palette images always
//! decode to RGBA.
//!
//! ## Writing
//!
//! Samples may be integer, logical or real, with missing values. They are
//! mapped onto 8 bits through a range chosen in this order:
//!
//! 1. the explicit range passed to the encoder,
//! 2. the image's `range` attribute,
//! 3. `[0, 255]` for logical data,
//! 4. the extent of the finite samples.
//!
//! A degenerate range produces a [`Warning::FlatImage`] instead of an error.
//! Missing samples are written as zero.
//!
//! ## Metadata
//!
//! Background colour (`#RRGGBB`), physical scale (`dpi`, `pixdim`, `asp`)
//! and text entries are translated in both directions. Palette size, bit
//! depth, interlacing and file size are reported on read.
//!
//! ## Usage
//!
//! ```no_run
//! use loder::{RasterImage, Samples, WriteOptions, read_image, write_image};
//!
//! let samples = Samples::Real((0..12).map(|v| Some(v as f64 / 11.0)).collect());
//! let image = RasterImage::new(samples, &[2, 2, 3]);
//! let report = write_image(&image, "out.png", &WriteOptions::default())?;
//! for warning in &report.warnings {
//!     eprintln!("warning: {warning}");
//! }
//!
//! let back = read_image("out.png")?;
//! assert_eq!(back.dim.as_deref(), Some(&[2, 2, 3][..]));
//! # Ok::<(), loder::LoderError>(())
//! ```
//!
//! ## Non-Goals
//!
//! - Sample depths other than 8 bits on the array side
//! - Colour management
//! - PNG compression internals (delegated to the [`codec::PngCodec`])

#![forbid(unsafe_code)]

pub mod codec;
mod decode;
mod encode;
mod error;
mod image;
mod limits;
pub mod metadata;
mod pixel;
pub mod quantize;
pub mod transpose;

// Re-exports
pub use decode::{
    DecodeRequest, IMAGE_CLASS, read_image, read_image_info, read_image_info_with,
    read_image_with,
};
pub use encode::{
    EncodeReport, EncodeRequest, Encoded, WriteOptions, write_image, write_image_with,
};
pub use error::{CodecOp, LoderError, Warning};
pub use image::{
    ImageAttributes, InspectionResult, RasterImage, Samples, Shape, TaggedString, TextEncoding,
    TextEntry,
};
pub use limits::{DEFAULT_MEMORY_BUDGET, Limits};
pub use pixel::ColourType;
pub use quantize::{RangeSource, SampleRange};
