use crate::error::LoderError;
use crate::image::Shape;

/// Pixel-buffer budget used when [`Limits::max_memory_bytes`] is unset.
pub const DEFAULT_MEMORY_BUDGET: u64 = 1 << 30;

/// Caps applied to a decode before the pixel buffer is allocated.
///
/// Dimension caps are off by default. The pixel-buffer budget is always
/// enforced and falls back to [`DEFAULT_MEMORY_BUDGET`], so a tiny file
/// declaring a huge image fails cleanly instead of exhausting memory.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum `width * height`.
    pub max_pixels: Option<u64>,
    /// Budget for the decoded 8-bit buffer, also handed to the codec.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Effective pixel-buffer budget in bytes.
    pub fn memory_budget(&self) -> u64 {
        self.max_memory_bytes.unwrap_or(DEFAULT_MEMORY_BUDGET)
    }

    /// Header dimensions against the width, height and pixel caps.
    pub(crate) fn check_dimensions(&self, width: u32, height: u32) -> Result<(), LoderError> {
        let (width, height) = (u64::from(width), u64::from(height));
        exceeds("width", width, self.max_width)?;
        exceeds("height", height, self.max_height)?;
        exceeds("pixel count", width * height, self.max_pixels)
    }

    /// Size of the buffer a decode of `shape` needs, if it fits the budget.
    pub(crate) fn buffer_len(&self, shape: Shape) -> Result<usize, LoderError> {
        let len = shape
            .height
            .checked_mul(shape.width)
            .and_then(|hw| hw.checked_mul(shape.channels))
            .ok_or(LoderError::DimensionsTooLarge {
                width: shape.width as u32,
                height: shape.height as u32,
            })?;
        exceeds("decoded buffer bytes", len as u64, Some(self.memory_budget()))?;
        Ok(len)
    }
}

fn exceeds(what: &str, value: u64, cap: Option<u64>) -> Result<(), LoderError> {
    match cap {
        Some(cap) if value > cap => Err(LoderError::LimitExceeded(format!(
            "{what} {value} exceeds limit {cap}"
        ))),
        _ => Ok(()),
    }
}
