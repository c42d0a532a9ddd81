//! Sample reordering between codec and array layouts.
//!
//! The codec stores pixels row by row with channels interleaved: the sample
//! for row `i`, column `j`, channel `k` sits at `k + j*c + i*c*w`. The array
//! stores planes, row index fastest: `i + j*h + k*h*w`.

use crate::image::Shape;

/// Reorder codec-layout samples into array layout.
///
/// `src.len()` must equal `shape.len()`.
pub fn to_array_order<T: Copy>(src: &[T], shape: Shape) -> Vec<T> {
    debug_assert_eq!(src.len(), shape.len());
    let Shape {
        height,
        width,
        channels,
    } = shape;
    let plane = height * width;
    let mut out = Vec::with_capacity(src.len());
    // Push in destination order so no default value is needed.
    for k in 0..channels {
        for j in 0..width {
            for i in 0..height {
                out.push(src[k + j * channels + i * channels * width]);
            }
        }
    }
    debug_assert_eq!(out.len(), plane * channels);
    out
}

/// Reorder array-layout samples into codec layout. Inverse of [`to_array_order`].
pub fn to_codec_order<T: Copy>(src: &[T], shape: Shape) -> Vec<T> {
    debug_assert_eq!(src.len(), shape.len());
    let Shape {
        height,
        width,
        channels,
    } = shape;
    let plane = height * width;
    let mut out = Vec::with_capacity(src.len());
    for i in 0..height {
        for j in 0..width {
            for k in 0..channels {
                out.push(src[i + j * height + k * plane]);
            }
        }
    }
    out
}
