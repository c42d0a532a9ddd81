use std::path::Path;

use crate::codec::{PngCodec, PngCrateCodec};
use crate::error::{CodecOp, Diagnostics, LoderError, Warning};
use crate::image::RasterImage;
use crate::metadata;
use crate::metadata::compression::{CompressionSettings, DEFAULT_COMPRESSION_LEVEL};
use crate::pixel::ColourType;
use crate::quantize::{self, RangeSource, SampleRange};
use crate::transpose;

/// Options for writing an image.
#[derive(Clone, Debug, PartialEq)]
pub struct WriteOptions {
    /// Overrides the image's `range` attribute and the inferred range.
    pub range: Option<SampleRange>,
    /// 0 (stored) to 6 (best).
    pub compression_level: u8,
    pub interlace: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            range: None,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            interlace: false,
        }
    }
}

/// What happened during an encode, besides the output bytes.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodeReport {
    pub warnings: Vec<Warning>,
    pub colour_type: ColourType,
    pub range: SampleRange,
    pub range_source: RangeSource,
    /// Number of missing samples, written as 0.
    pub missing: usize,
    /// Missing values were found with an odd channel count. No alpha
    /// channel is added.
    pub alpha_requested: bool,
    pub bytes_written: usize,
}

/// Encoded PNG bytes plus the report.
#[derive(Clone, Debug)]
pub struct Encoded {
    pub bytes: Vec<u8>,
    pub report: EncodeReport,
}

/// Builder for encoding a [`RasterImage`] to PNG bytes.
pub struct EncodeRequest<'a> {
    image: &'a RasterImage,
    options: WriteOptions,
    codec: &'a dyn PngCodec,
}

impl<'a> EncodeRequest<'a> {
    pub fn new(image: &'a RasterImage) -> Self {
        Self {
            image,
            options: WriteOptions::default(),
            codec: &PngCrateCodec,
        }
    }

    pub fn with_options(mut self, options: WriteOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_range(mut self, range: SampleRange) -> Self {
        self.options.range = Some(range);
        self
    }

    pub fn with_compression(mut self, level: u8) -> Self {
        self.options.compression_level = level;
        self
    }

    pub fn with_interlace(mut self, interlace: bool) -> Self {
        self.options.interlace = interlace;
        self
    }

    pub fn with_codec(mut self, codec: &'a dyn PngCodec) -> Self {
        self.codec = codec;
        self
    }

    pub fn encode(&self) -> Result<Encoded, LoderError> {
        let image = self.image;
        let shape = image.shape()?;
        let values = image.samples.to_f64()?;
        let colour = ColourType::for_channels(shape.channels)?;
        let compression = CompressionSettings::for_level(self.options.compression_level)?;

        let mut diag = Diagnostics::default();
        let (range, range_source) = quantize::resolve_range(
            self.options.range,
            image.attributes.range,
            image.samples.is_logical(),
            &values,
        );
        log::debug!(
            "quantizing [{}, {}] ({range_source:?}) to 8 bits",
            range.min,
            range.max
        );
        let quantized = quantize::quantize_samples(&values, range, shape.channels, &mut diag);
        drop(values);
        let pixels = transpose::to_codec_order(&quantized.bytes, shape);

        let interlaced = self.options.interlace && self.codec.supports_interlaced_output();
        if self.options.interlace && !interlaced {
            diag.warn(Warning::InterlaceUnsupported);
        }
        let settings = metadata::encode_settings(
            &image.attributes,
            colour,
            compression,
            interlaced,
            &mut diag,
        );

        let bytes = self
            .codec
            .encode(&pixels, shape.width as u32, shape.height as u32, &settings)
            .map_err(|f| LoderError::codec(CodecOp::Encode, f))?;

        Ok(Encoded {
            report: EncodeReport {
                warnings: diag.into_warnings(),
                colour_type: colour,
                range,
                range_source,
                missing: quantized.missing,
                alpha_requested: quantized.alpha_requested,
                bytes_written: bytes.len(),
            },
            bytes,
        })
    }
}

/// Encode `image` and write it to `path`.
pub fn write_image(
    image: &RasterImage,
    path: impl AsRef<Path>,
    options: &WriteOptions,
) -> Result<EncodeReport, LoderError> {
    write_image_with(&PngCrateCodec, image, path.as_ref(), options)
}

pub fn write_image_with(
    codec: &dyn PngCodec,
    image: &RasterImage,
    path: &Path,
    options: &WriteOptions,
) -> Result<EncodeReport, LoderError> {
    let encoded = EncodeRequest::new(image)
        .with_options(options.clone())
        .with_codec(codec)
        .encode()?;
    codec
        .save(&encoded.bytes, path)
        .map_err(|f| LoderError::codec(CodecOp::Save, f))?;
    Ok(encoded.report)
}
