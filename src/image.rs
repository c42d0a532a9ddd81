//! Array-side data model: samples, dimensions and attributes.

use crate::error::LoderError;
use crate::pixel::ColourType;

/// Sample storage of a host array. Each element may be missing.
#[derive(Clone, Debug, PartialEq)]
pub enum Samples {
    Integer(Vec<Option<i32>>),
    Logical(Vec<Option<bool>>),
    Real(Vec<Option<f64>>),
    /// Not encodable; present so callers get a typed rejection.
    Character(Vec<Option<String>>),
}

impl Samples {
    pub fn len(&self) -> usize {
        match self {
            Samples::Integer(v) => v.len(),
            Samples::Logical(v) => v.len(),
            Samples::Real(v) => v.len(),
            Samples::Character(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Samples::Integer(_) => "integer",
            Samples::Logical(_) => "logical",
            Samples::Real(_) => "double",
            Samples::Character(_) => "character",
        }
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, Samples::Logical(_))
    }

    /// Value at a flat storage index as `f64`; `None` when missing, NaN or
    /// not numeric.
    pub fn value_at(&self, index: usize) -> Option<f64> {
        match self {
            Samples::Integer(v) => v.get(index).copied().flatten().map(f64::from),
            Samples::Logical(v) => v
                .get(index)
                .copied()
                .flatten()
                .map(|b| if b { 1.0 } else { 0.0 }),
            Samples::Real(v) => v.get(index).copied().flatten().filter(|x| !x.is_nan()),
            Samples::Character(_) => None,
        }
    }

    /// Coerce every sample to `f64`, reporting missing values as `None`.
    ///
    /// NaN counts as missing. Character data is rejected.
    pub(crate) fn to_f64(&self) -> Result<Vec<Option<f64>>, LoderError> {
        if let Samples::Character(_) = self {
            return Err(LoderError::InvalidSampleType(self.type_name()));
        }
        Ok((0..self.len()).map(|i| self.value_at(i)).collect())
    }
}

/// String encoding tag carried by host strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// Platform-native (treated as Latin-1 in PNG).
    #[default]
    Native,
    Utf8,
    /// Raw bytes with no declared encoding. Cannot be written to PNG.
    Bytes,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaggedString {
    pub text: String,
    pub encoding: TextEncoding,
}

impl TaggedString {
    pub fn new(text: impl Into<String>, encoding: TextEncoding) -> Self {
        Self {
            text: text.into(),
            encoding,
        }
    }
}

/// One key/value text entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextEntry {
    pub key: TaggedString,
    pub value: TaggedString,
}

impl TextEntry {
    pub fn native(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: TaggedString::new(key, TextEncoding::Native),
            value: TaggedString::new(value, TextEncoding::Native),
        }
    }

    pub fn utf8(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: TaggedString::new(key, TextEncoding::Utf8),
            value: TaggedString::new(value, TextEncoding::Utf8),
        }
    }
}

/// Attributes attached to a [`RasterImage`] or an [`InspectionResult`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImageAttributes {
    pub class: Vec<String>,
    /// Declared value range `[a, b]`, used on encode when no explicit range
    /// is given.
    pub range: Option<[f64; 2]>,
    /// Background colour as `#RRGGBB`.
    pub background: Option<String>,
    /// Dots per inch; one value applies to both axes.
    pub dpi: Option<Vec<f64>>,
    /// Pixel size in `pixunits`; one value applies to both axes.
    pub pixdim: Option<Vec<f64>>,
    pub pixunits: Option<String>,
    /// Aspect ratio, y over x.
    pub asp: Option<f64>,
    pub text: Vec<TextEntry>,
    pub palette_size: Option<usize>,
    pub bit_depth: Option<u8>,
    pub interlaced: Option<bool>,
    pub filesize: Option<u64>,
}

/// Validated `(height, width, channels)` triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shape {
    pub height: usize,
    pub width: usize,
    pub channels: usize,
}

impl Shape {
    pub fn len(&self) -> usize {
        self.height * self.width * self.channels
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A raster image in host array form.
///
/// Storage is column-major: the row index varies fastest, then the column,
/// then the channel. The sample at `(i, j, k)` lives at
/// `i + j*height + k*height*width`.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterImage {
    pub samples: Samples,
    /// `[height, width]` or `[height, width, channels]`.
    pub dim: Option<Vec<usize>>,
    pub attributes: ImageAttributes,
}

impl RasterImage {
    pub fn new(samples: Samples, dim: &[usize]) -> Self {
        Self {
            samples,
            dim: Some(dim.to_vec()),
            attributes: ImageAttributes::default(),
        }
    }

    /// An image with no dimension information. Cannot be encoded.
    pub fn dimensionless(samples: Samples) -> Self {
        Self {
            samples,
            dim: None,
            attributes: ImageAttributes::default(),
        }
    }

    pub fn with_attributes(mut self, attributes: ImageAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Validate the dimension vector against the sample count.
    pub fn shape(&self) -> Result<Shape, LoderError> {
        let dim = self.dim.as_deref().ok_or(LoderError::MissingDimensions)?;
        let shape = match *dim {
            [height, width] => Shape {
                height,
                width,
                channels: 1,
            },
            [height, width, channels] => Shape {
                height,
                width,
                channels,
            },
            _ => {
                return Err(LoderError::InvalidDimensions(format!(
                    "expected 2 or 3 dimensions, got {}",
                    dim.len()
                )));
            }
        };
        if shape.height == 0 || shape.width == 0 {
            return Err(LoderError::InvalidDimensions(format!(
                "{}x{} image has no pixels",
                shape.height, shape.width
            )));
        }
        if u32::try_from(shape.height).is_err() || u32::try_from(shape.width).is_err() {
            return Err(LoderError::InvalidDimensions(format!(
                "{}x{} exceeds PNG limits",
                shape.height, shape.width
            )));
        }
        let expected = shape
            .height
            .checked_mul(shape.width)
            .and_then(|hw| hw.checked_mul(shape.channels))
            .ok_or(LoderError::DimensionsTooLarge {
                width: shape.width as u32,
                height: shape.height as u32,
            })?;
        if expected != self.samples.len() {
            return Err(LoderError::LengthMismatch {
                expected,
                actual: self.samples.len(),
            });
        }
        Ok(shape)
    }

    /// Sample at row `i`, column `j`, channel `k`.
    pub fn get(&self, i: usize, j: usize, k: usize) -> Option<f64> {
        let shape = self.shape().ok()?;
        if i >= shape.height || j >= shape.width || k >= shape.channels {
            return None;
        }
        self.samples
            .value_at(i + j * shape.height + k * shape.height * shape.width)
    }
}

/// Header information read without decoding pixel data.
#[derive(Clone, Debug, PartialEq)]
pub struct InspectionResult {
    pub width: u32,
    pub height: u32,
    pub colour_type: ColourType,
    pub channels: usize,
    /// Bit depth as stored in the file.
    pub bit_depth: u8,
    pub interlaced: bool,
    pub palette_size: Option<usize>,
    pub filesize: u64,
    /// Background, physical scale and text found before the image data.
    pub attributes: ImageAttributes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_dimensions_means_one_channel() {
        let img = RasterImage::new(Samples::Integer(vec![Some(0); 6]), &[2, 3]);
        let shape = img.shape().unwrap();
        assert_eq!(
            shape,
            Shape {
                height: 2,
                width: 3,
                channels: 1
            }
        );
    }

    #[test]
    fn missing_dim_is_an_error() {
        let img = RasterImage::dimensionless(Samples::Real(vec![Some(1.0)]));
        assert!(matches!(img.shape(), Err(LoderError::MissingDimensions)));
    }

    #[test]
    fn length_must_match() {
        let img = RasterImage::new(Samples::Real(vec![Some(1.0); 5]), &[2, 2, 1]);
        assert!(matches!(
            img.shape(),
            Err(LoderError::LengthMismatch {
                expected: 4,
                actual: 5
            })
        ));
    }

    #[test]
    fn column_major_indexing() {
        // 2 rows, 2 columns, 1 channel: storage is [r0c0, r1c0, r0c1, r1c1]
        let img = RasterImage::new(
            Samples::Integer(vec![Some(1), Some(2), Some(3), Some(4)]),
            &[2, 2],
        );
        assert_eq!(img.get(0, 0, 0), Some(1.0));
        assert_eq!(img.get(1, 0, 0), Some(2.0));
        assert_eq!(img.get(0, 1, 0), Some(3.0));
        assert_eq!(img.get(1, 1, 0), Some(4.0));
        assert_eq!(img.get(2, 0, 0), None);
    }

    #[test]
    fn nan_is_missing_and_character_is_rejected() {
        let s = Samples::Real(vec![Some(f64::NAN), None, Some(2.5)]);
        assert_eq!(s.to_f64().unwrap(), vec![None, None, Some(2.5)]);
        let c = Samples::Character(vec![Some("a".into())]);
        assert!(matches!(
            c.to_f64(),
            Err(LoderError::InvalidSampleType("character"))
        ));
    }
}
