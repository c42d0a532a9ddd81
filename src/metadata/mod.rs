//! Translation between codec header fields and array attributes.

pub mod background;
pub mod compression;
pub mod physical;
pub(crate) mod text;

use crate::codec::{EncodeSettings, PngHeader};
use crate::error::Diagnostics;
use crate::image::ImageAttributes;
use crate::pixel::ColourType;

use compression::CompressionSettings;

/// Attributes describing a decoded or inspected file.
pub(crate) fn attributes_from_header(
    header: &PngHeader,
    colour: ColourType,
    filesize: u64,
) -> ImageAttributes {
    let mut attrs = ImageAttributes {
        bit_depth: Some(header.bit_depth),
        interlaced: Some(header.interlaced),
        filesize: Some(filesize),
        palette_size: palette_size(header, colour),
        ..Default::default()
    };
    if let Some(payload) = &header.background {
        attrs.background = background::decode_bkgd(
            payload,
            colour,
            header.bit_depth,
            header.palette.as_deref(),
        )
        .map(background::format_background);
    }
    if let Some(dims) = header.physical {
        physical::decode_physical(dims, &mut attrs);
    }
    attrs.text = text::decode_text(&header.text);
    attrs
}

pub(crate) fn palette_size(header: &PngHeader, colour: ColourType) -> Option<usize> {
    match colour {
        ColourType::Palette => header.palette.as_ref().map(|p| p.len() / 3),
        _ => None,
    }
}

/// Codec settings for writing an image with `attrs` as `colour`.
pub(crate) fn encode_settings(
    attrs: &ImageAttributes,
    colour: ColourType,
    compression: CompressionSettings,
    interlaced: bool,
    diag: &mut Diagnostics,
) -> EncodeSettings {
    EncodeSettings {
        colour_type: colour,
        compression,
        interlaced,
        background: attrs
            .background
            .as_deref()
            .and_then(background::parse_background)
            .and_then(|rgb| background::encode_bkgd(rgb, colour)),
        physical: physical::encode_physical(attrs),
        text: text::encode_text(&attrs.text, diag),
    }
}
