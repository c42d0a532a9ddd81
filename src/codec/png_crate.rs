//! [`PngCodec`] backed by the `png` crate and `std::fs`.

use std::io::Cursor;
use std::path::Path;

use png::text_metadata::{ITXtChunk, TEXtChunk};

use super::{
    CodecFailure, EncodeSettings, PhysicalDims, PhysicalUnit, PngCodec, PngHeader, RawImage,
    TextChunk, TextChunkKind,
};
use crate::limits::Limits;
use crate::metadata::compression::CompressionSettings;
use crate::pixel::ColourType;

const CODE_IO: u32 = 1;
const CODE_FORMAT: u32 = 2;
const CODE_PARAMETER: u32 = 3;
const CODE_LIMITS: u32 = 4;

/// The default codec.
///
/// Cannot write interlaced images or stored (uncompressed) DEFLATE blocks;
/// compression level 0 uses the fastest available setting without filtering.
#[derive(Clone, Copy, Debug, Default)]
pub struct PngCrateCodec;

impl PngCrateCodec {
    /// Ancillary chunk buffers stay under the `png` crate's default cap; the
    /// pixel buffer is checked separately against [`Limits::memory_budget`].
    fn reader<'a>(
        &self,
        bytes: &'a [u8],
    ) -> Result<png::Reader<Cursor<&'a [u8]>>, CodecFailure> {
        let mut decoder = png::Decoder::new(Cursor::new(bytes));
        decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
        decoder.read_info().map_err(decoding_failure)
    }
}

impl PngCodec for PngCrateCodec {
    fn load(&self, path: &Path) -> Result<Vec<u8>, CodecFailure> {
        std::fs::read(path)
            .map_err(|e| CodecFailure::new(CODE_IO, format!("{}: {e}", path.display())))
    }

    fn save(&self, bytes: &[u8], path: &Path) -> Result<(), CodecFailure> {
        std::fs::write(path, bytes)
            .map_err(|e| CodecFailure::new(CODE_IO, format!("{}: {e}", path.display())))
    }

    fn inspect(&self, bytes: &[u8]) -> Result<PngHeader, CodecFailure> {
        let reader = self.reader(bytes)?;
        Ok(header_from_info(reader.info()))
    }

    fn decode(
        &self,
        bytes: &[u8],
        target: ColourType,
        limits: &Limits,
    ) -> Result<RawImage, CodecFailure> {
        let budget = usize::try_from(limits.memory_budget()).unwrap_or(usize::MAX);
        let mut reader = self.reader(bytes)?;
        // Grey+tRNS expands to two channels before alpha is dropped.
        let needed = reader.output_buffer_size();
        if needed > budget {
            return Err(CodecFailure::new(
                CODE_LIMITS,
                format!("output buffer of {needed} bytes exceeds budget {budget}"),
            ));
        }
        let mut pixels = vec![0u8; needed];
        let frame = reader.next_frame(&mut pixels).map_err(decoding_failure)?;
        pixels.truncate(frame.buffer_size());
        if frame.bit_depth != png::BitDepth::Eight {
            return Err(CodecFailure::new(
                CODE_FORMAT,
                format!("expected 8-bit output, got {:?}", frame.bit_depth),
            ));
        }
        // Picks up text chunks stored after the image data.
        if let Err(e) = reader.finish() {
            log::debug!("trailing chunks not read: {e}");
        }
        let pixels = conform(pixels, frame.color_type, target)?;
        Ok(RawImage {
            header: header_from_info(reader.info()),
            pixels,
        })
    }

    fn encode(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        settings: &EncodeSettings,
    ) -> Result<Vec<u8>, CodecFailure> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(png_colour(settings.colour_type));
            encoder.set_depth(png::BitDepth::Eight);
            let (compression, filter) = deflate_preset(&settings.compression);
            encoder.set_compression(compression);
            if let Some(filter) = filter {
                encoder.set_filter(filter);
            }
            encoder.set_pixel_dims(settings.physical.map(|p| png::PixelDimensions {
                xppu: p.x,
                yppu: p.y,
                unit: match p.unit {
                    PhysicalUnit::Unspecified => png::Unit::Unspecified,
                    PhysicalUnit::Metre => png::Unit::Meter,
                },
            }));

            let mut writer = encoder.write_header().map_err(encoding_failure)?;
            if let Some(bkgd) = &settings.background {
                writer
                    .write_chunk(png::chunk::bKGD, bkgd)
                    .map_err(encoding_failure)?;
            }
            for chunk in &settings.text {
                let written = match chunk.kind {
                    TextChunkKind::International => {
                        let mut itxt = ITXtChunk::new(chunk.keyword.clone(), chunk.text.clone());
                        itxt.translated_keyword = chunk.translated_keyword.clone();
                        writer.write_text_chunk(&itxt)
                    }
                    TextChunkKind::Latin | TextChunkKind::CompressedLatin => writer
                        .write_text_chunk(&TEXtChunk::new(
                            chunk.keyword.clone(),
                            chunk.text.clone(),
                        )),
                };
                written.map_err(encoding_failure)?;
            }
            writer.write_image_data(pixels).map_err(encoding_failure)?;
            writer.finish().map_err(encoding_failure)?;
        }
        Ok(out)
    }
}

fn header_from_info(info: &png::Info<'_>) -> PngHeader {
    let mut text = Vec::new();
    for chunk in &info.utf8_text {
        match chunk.get_text() {
            Ok(t) => text.push(TextChunk {
                kind: TextChunkKind::International,
                keyword: chunk.keyword.clone(),
                translated_keyword: chunk.translated_keyword.clone(),
                text: t,
            }),
            Err(e) => log::debug!("skipping iTXt {:?}: {e}", chunk.keyword),
        }
    }
    for chunk in &info.uncompressed_latin1_text {
        text.push(TextChunk {
            kind: TextChunkKind::Latin,
            keyword: chunk.keyword.clone(),
            translated_keyword: String::new(),
            text: chunk.text.clone(),
        });
    }
    for chunk in &info.compressed_latin1_text {
        match chunk.get_text() {
            Ok(t) => text.push(TextChunk {
                kind: TextChunkKind::CompressedLatin,
                keyword: chunk.keyword.clone(),
                translated_keyword: String::new(),
                text: t,
            }),
            Err(e) => log::debug!("skipping zTXt {:?}: {e}", chunk.keyword),
        }
    }

    PngHeader {
        width: info.width,
        height: info.height,
        colour_code: info.color_type as u8,
        bit_depth: info.bit_depth as u8,
        interlaced: info.interlaced,
        palette: info.palette.as_ref().map(|p| p.to_vec()),
        background: info.bkgd.as_ref().map(|b| b.to_vec()),
        physical: info.pixel_dims.as_ref().map(|d| PhysicalDims {
            x: d.xppu,
            y: d.yppu,
            unit: match d.unit {
                png::Unit::Unspecified => PhysicalUnit::Unspecified,
                png::Unit::Meter => PhysicalUnit::Metre,
            },
        }),
        text,
    }
}

/// Add or drop the alpha channel so the buffer matches `target`.
fn conform(
    pixels: Vec<u8>,
    from: png::ColorType,
    target: ColourType,
) -> Result<Vec<u8>, CodecFailure> {
    let (src_colours, src_alpha) = match from {
        png::ColorType::Grayscale => (1, false),
        png::ColorType::GrayscaleAlpha => (1, true),
        png::ColorType::Rgb => (3, false),
        png::ColorType::Rgba => (3, true),
        png::ColorType::Indexed => {
            return Err(CodecFailure::new(
                CODE_FORMAT,
                "palette output was not expanded",
            ));
        }
    };
    let target = target.raw();
    let dst_colours = match target {
        ColourType::Grey | ColourType::GreyAlpha => 1,
        _ => 3,
    };
    if src_colours != dst_colours {
        return Err(CodecFailure::new(
            CODE_PARAMETER,
            format!("cannot convert {from:?} output to {target:?}"),
        ));
    }
    let src_channels = src_colours + usize::from(src_alpha);
    Ok(match (src_alpha, target.has_alpha()) {
        (true, false) => pixels
            .chunks_exact(src_channels)
            .flat_map(|px| px[..src_colours].iter().copied())
            .collect(),
        (false, true) => {
            let mut out = Vec::with_capacity(pixels.len() / src_channels * (src_channels + 1));
            for px in pixels.chunks_exact(src_channels) {
                out.extend_from_slice(px);
                out.push(u8::MAX);
            }
            out
        }
        _ => pixels,
    })
}

fn png_colour(colour: ColourType) -> png::ColorType {
    match colour {
        ColourType::Grey => png::ColorType::Grayscale,
        ColourType::GreyAlpha => png::ColorType::GrayscaleAlpha,
        ColourType::Rgb => png::ColorType::Rgb,
        ColourType::Palette => png::ColorType::Indexed,
        ColourType::Rgba => png::ColorType::Rgba,
    }
}

/// Closest `png` crate preset for a strategy tuple.
fn deflate_preset(settings: &CompressionSettings) -> (png::Compression, Option<png::FilterType>) {
    if !settings.is_compressed() {
        return (png::Compression::Fast, Some(png::FilterType::NoFilter));
    }
    let compression = match settings.window_size {
        0..=2048 => png::Compression::Fast,
        2049..=8192 => png::Compression::Default,
        _ => png::Compression::Best,
    };
    (compression, None)
}

fn decoding_failure(err: png::DecodingError) -> CodecFailure {
    #[allow(unreachable_patterns)]
    let code = match &err {
        png::DecodingError::IoError(_) => CODE_IO,
        png::DecodingError::Format(_) => CODE_FORMAT,
        png::DecodingError::Parameter(_) => CODE_PARAMETER,
        png::DecodingError::LimitsExceeded => CODE_LIMITS,
        _ => CODE_FORMAT,
    };
    CodecFailure::new(code, err.to_string())
}

fn encoding_failure(err: png::EncodingError) -> CodecFailure {
    #[allow(unreachable_patterns)]
    let code = match &err {
        png::EncodingError::IoError(_) => CODE_IO,
        png::EncodingError::Format(_) => CODE_FORMAT,
        png::EncodingError::Parameter(_) => CODE_PARAMETER,
        png::EncodingError::LimitsExceeded => CODE_LIMITS,
        _ => CODE_FORMAT,
    };
    CodecFailure::new(code, err.to_string())
}
