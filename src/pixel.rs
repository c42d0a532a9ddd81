use crate::error::LoderError;

/// PNG colour type, as stored in the IHDR chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColourType {
    /// Code 0, single grey channel.
    Grey,
    /// Code 2, three colour channels.
    Rgb,
    /// Code 3, palette indices. Always expanded to RGBA when decoded.
    Palette,
    /// Code 4, grey plus alpha.
    GreyAlpha,
    /// Code 6, three colour channels plus alpha.
    Rgba,
}

impl ColourType {
    /// Map an IHDR colour-type code. Unknown codes are an error.
    pub fn from_code(code: u8) -> Result<Self, LoderError> {
        match code {
            0 => Ok(Self::Grey),
            2 => Ok(Self::Rgb),
            3 => Ok(Self::Palette),
            4 => Ok(Self::GreyAlpha),
            6 => Ok(Self::Rgba),
            other => Err(LoderError::UnsupportedColourType(other)),
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Self::Grey => 0,
            Self::Rgb => 2,
            Self::Palette => 3,
            Self::GreyAlpha => 4,
            Self::Rgba => 6,
        }
    }

    /// Number of array channels an image of this type decodes to.
    pub fn channels(&self) -> usize {
        match self {
            Self::Grey => 1,
            Self::GreyAlpha => 2,
            Self::Rgb => 3,
            Self::Palette | Self::Rgba => 4,
        }
    }

    /// Colour type used for raw decoded pixels (palette becomes RGBA).
    pub fn raw(&self) -> Self {
        match self {
            Self::Palette => Self::Rgba,
            other => *other,
        }
    }

    /// Colour type to encode an array with `channels` channels as.
    pub fn for_channels(channels: usize) -> Result<Self, LoderError> {
        match channels {
            1 => Ok(Self::Grey),
            2 => Ok(Self::GreyAlpha),
            3 => Ok(Self::Rgb),
            4 => Ok(Self::Rgba),
            other => Err(LoderError::UnsupportedChannelCount(other)),
        }
    }

    pub fn has_alpha(&self) -> bool {
        matches!(self, Self::GreyAlpha | Self::Rgba)
    }
}
