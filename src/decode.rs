use std::path::Path;

use crate::codec::{PngCodec, PngCrateCodec, PngHeader};
use crate::error::{CodecOp, LoderError};
use crate::image::{InspectionResult, RasterImage, Samples, Shape};
use crate::limits::Limits;
use crate::metadata;
use crate::pixel::ColourType;
use crate::transpose;

static DEFAULT_LIMITS: Limits = Limits {
    max_width: None,
    max_height: None,
    max_pixels: None,
    max_memory_bytes: None,
};

/// Class tags attached to every decoded image.
pub const IMAGE_CLASS: [&str; 2] = ["loder", "array"];

/// Builder for decoding PNG bytes into a [`RasterImage`].
///
/// ```no_run
/// use loder::DecodeRequest;
///
/// let data = std::fs::read("image.png")?;
/// let info = DecodeRequest::new(&data).inspect()?;
/// println!("{}x{}, {} channels", info.width, info.height, info.channels);
/// let image = DecodeRequest::new(&data).decode()?;
/// let (h, w) = (info.height as usize, info.width as usize);
/// assert_eq!(image.dim.as_deref(), Some(&[h, w, info.channels][..]));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    limits: Option<&'a Limits>,
    codec: &'a dyn PngCodec,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            limits: None,
            codec: &PngCrateCodec,
        }
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    pub fn with_codec(mut self, codec: &'a dyn PngCodec) -> Self {
        self.codec = codec;
        self
    }

    /// Read header information without decoding pixel data.
    pub fn inspect(&self) -> Result<InspectionResult, LoderError> {
        let (header, colour) = self.header()?;
        let attributes =
            metadata::attributes_from_header(&header, colour, self.data.len() as u64);
        Ok(InspectionResult {
            width: header.width,
            height: header.height,
            colour_type: colour,
            channels: colour.channels(),
            bit_depth: header.bit_depth,
            interlaced: header.interlaced,
            palette_size: attributes.palette_size,
            filesize: self.data.len() as u64,
            attributes,
        })
    }

    /// Decode to an integer array of shape `(height, width, channels)` with
    /// samples in `[0, 255]`.
    pub fn decode(&self) -> Result<RasterImage, LoderError> {
        let (header, colour) = self.header()?;
        let shape = Shape {
            height: header.height as usize,
            width: header.width as usize,
            channels: colour.channels(),
        };
        let expected = self.limits().buffer_len(shape)?;

        let raw = self
            .codec
            .decode(self.data, colour.raw(), self.limits())
            .map_err(|f| LoderError::codec(CodecOp::Decode, f))?;
        if raw.pixels.len() != expected {
            return Err(LoderError::LengthMismatch {
                expected,
                actual: raw.pixels.len(),
            });
        }
        log::debug!(
            "decoded {}x{} {:?} image as {} channels",
            shape.width,
            shape.height,
            colour,
            shape.channels
        );

        let samples = transpose::to_array_order(&raw.pixels, shape)
            .into_iter()
            .map(|b| Some(i32::from(b)))
            .collect();
        let mut attributes =
            metadata::attributes_from_header(&raw.header, colour, self.data.len() as u64);
        attributes.class = IMAGE_CLASS.iter().map(|c| c.to_string()).collect();
        attributes.range = Some([0.0, 255.0]);

        Ok(RasterImage {
            samples: Samples::Integer(samples),
            dim: Some(vec![shape.height, shape.width, shape.channels]),
            attributes,
        })
    }

    fn header(&self) -> Result<(PngHeader, ColourType), LoderError> {
        let header = self
            .codec
            .inspect(self.data)
            .map_err(|f| LoderError::codec(CodecOp::Inspect, f))?;
        let colour = ColourType::from_code(header.colour_code)?;
        self.limits().check_dimensions(header.width, header.height)?;
        Ok((header, colour))
    }

    fn limits(&self) -> &'a Limits {
        self.limits.unwrap_or(&DEFAULT_LIMITS)
    }
}

/// Read and fully decode a PNG file.
pub fn read_image(path: impl AsRef<Path>) -> Result<RasterImage, LoderError> {
    read_image_with(&PngCrateCodec, path.as_ref(), None)
}

/// Read only the header information of a PNG file.
pub fn read_image_info(path: impl AsRef<Path>) -> Result<InspectionResult, LoderError> {
    read_image_info_with(&PngCrateCodec, path.as_ref(), None)
}

pub fn read_image_with(
    codec: &dyn PngCodec,
    path: &Path,
    limits: Option<&Limits>,
) -> Result<RasterImage, LoderError> {
    let data = load(codec, path)?;
    request(codec, &data, limits).decode()
}

pub fn read_image_info_with(
    codec: &dyn PngCodec,
    path: &Path,
    limits: Option<&Limits>,
) -> Result<InspectionResult, LoderError> {
    let data = load(codec, path)?;
    request(codec, &data, limits).inspect()
}

fn load(codec: &dyn PngCodec, path: &Path) -> Result<Vec<u8>, LoderError> {
    codec
        .load(path)
        .map_err(|f| LoderError::codec(CodecOp::Load, f))
}

fn request<'a>(
    codec: &'a dyn PngCodec,
    data: &'a [u8],
    limits: Option<&'a Limits>,
) -> DecodeRequest<'a> {
    let req = DecodeRequest::new(data).with_codec(codec);
    match limits {
        Some(limits) => req.with_limits(limits),
        None => req,
    }
}
