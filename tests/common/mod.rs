//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::path::Path;

use loder::codec::{CodecFailure, EncodeSettings, PngCodec, PngCrateCodec, PngHeader, RawImage};
use loder::{ColourType, Limits, RasterImage, Samples};

/// Integer image whose samples are `f(i, j, k)`.
pub fn integer_image(
    height: usize,
    width: usize,
    channels: usize,
    f: impl Fn(usize, usize, usize) -> i32,
) -> RasterImage {
    let mut samples = vec![None; height * width * channels];
    for k in 0..channels {
        for j in 0..width {
            for i in 0..height {
                samples[i + j * height + k * height * width] = Some(f(i, j, k));
            }
        }
    }
    RasterImage::new(Samples::Integer(samples), &[height, width, channels])
}

pub fn noise(i: usize, j: usize, k: usize) -> i32 {
    let mut state = (i as u32 + 1)
        .wrapping_mul(0x9E37_79B9)
        ^ (j as u32 + 7).wrapping_mul(0x85EB_CA6B)
        ^ (k as u32 + 13).wrapping_mul(0xC2B2_AE35);
    state ^= state << 13;
    state ^= state >> 17;
    state ^= state << 5;
    (state % 256) as i32
}

/// Encode raw 8-bit pixels with the `png` crate directly.
pub fn raw_png(
    width: u32,
    height: u32,
    colour: png::ColorType,
    depth: png::BitDepth,
    data: &[u8],
    configure: impl FnOnce(&mut png::Encoder<'_, &mut Vec<u8>>),
) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(colour);
        encoder.set_depth(depth);
        configure(&mut encoder);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(data).unwrap();
        writer.finish().unwrap();
    }
    out
}

/// Wraps the default codec, records encode settings and can inject failures.
#[derive(Default)]
pub struct RecordingCodec {
    pub interlace_capable: bool,
    pub fail_encode: bool,
    pub fail_save: bool,
    pub last_settings: RefCell<Option<EncodeSettings>>,
    pub saved: RefCell<Option<Vec<u8>>>,
}

impl PngCodec for RecordingCodec {
    fn load(&self, path: &Path) -> Result<Vec<u8>, CodecFailure> {
        PngCrateCodec.load(path)
    }

    fn save(&self, bytes: &[u8], path: &Path) -> Result<(), CodecFailure> {
        if self.fail_save {
            return Err(CodecFailure::new(79, "failed to open file for writing"));
        }
        *self.saved.borrow_mut() = Some(bytes.to_vec());
        let _ = path;
        Ok(())
    }

    fn inspect(&self, bytes: &[u8]) -> Result<PngHeader, CodecFailure> {
        PngCrateCodec.inspect(bytes)
    }

    fn decode(
        &self,
        bytes: &[u8],
        target: ColourType,
        limits: &Limits,
    ) -> Result<RawImage, CodecFailure> {
        PngCrateCodec.decode(bytes, target, limits)
    }

    fn encode(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        settings: &EncodeSettings,
    ) -> Result<Vec<u8>, CodecFailure> {
        *self.last_settings.borrow_mut() = Some(settings.clone());
        if self.fail_encode {
            return Err(CodecFailure::new(
                63,
                "length of a chunk too long, max allowed for PNG is 2147483647 bytes per chunk",
            ));
        }
        let mut settings = settings.clone();
        settings.interlaced = false;
        PngCrateCodec.encode(pixels, width, height, &settings)
    }

    fn supports_interlaced_output(&self) -> bool {
        self.interlace_capable
    }
}
