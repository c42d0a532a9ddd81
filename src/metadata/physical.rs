//! pHYs <-> `dpi` / `pixdim` / `asp`.

use crate::codec::{PhysicalDims, PhysicalUnit};
use crate::image::ImageAttributes;

pub const INCHES_PER_METRE: f64 = 39.3700787402;

/// Fill `asp`, or `dpi` + `pixdim` + `pixunits`, from a pHYs chunk.
pub(crate) fn decode_physical(dims: PhysicalDims, attrs: &mut ImageAttributes) {
    if dims.x == 0 || dims.y == 0 {
        log::debug!("ignoring pHYs with a zero axis: {}x{}", dims.x, dims.y);
        return;
    }
    let (x, y) = (f64::from(dims.x), f64::from(dims.y));
    match dims.unit {
        PhysicalUnit::Unspecified => attrs.asp = Some(y / x),
        PhysicalUnit::Metre => {
            attrs.dpi = Some(vec![x / INCHES_PER_METRE, y / INCHES_PER_METRE]);
            attrs.pixdim = Some(vec![1000.0 / x, 1000.0 / y]);
            attrs.pixunits = Some("mm".into());
        }
    }
}

/// Pick a pHYs chunk for encoding: `dpi`, then `pixdim`, then `asp`.
pub(crate) fn encode_physical(attrs: &ImageAttributes) -> Option<PhysicalDims> {
    if let Some((x, y)) = attrs.dpi.as_deref().and_then(axis_pair) {
        return metres(x * INCHES_PER_METRE, y * INCHES_PER_METRE);
    }
    if let Some((x, y)) = attrs.pixdim.as_deref().and_then(axis_pair) {
        let per_metre = match attrs.pixunits.as_deref().unwrap_or("mm") {
            "um" => 1e6,
            "mm" => 1e3,
            "cm" => 1e2,
            "m" => 1.0,
            other => {
                log::debug!("ignoring pixdim in unknown unit {other:?}");
                return aspect(attrs);
            }
        };
        return metres(per_metre / x, per_metre / y);
    }
    aspect(attrs)
}

fn aspect(attrs: &ImageAttributes) -> Option<PhysicalDims> {
    let asp = attrs.asp.filter(|a| a.is_finite() && *a > 0.0)?;
    Some(PhysicalDims {
        x: 1000,
        y: to_ppu(asp * 1000.0)?,
        unit: PhysicalUnit::Unspecified,
    })
}

fn metres(x: f64, y: f64) -> Option<PhysicalDims> {
    Some(PhysicalDims {
        x: to_ppu(x)?,
        y: to_ppu(y)?,
        unit: PhysicalUnit::Metre,
    })
}

/// One value covers both axes; extra values are ignored.
fn axis_pair(values: &[f64]) -> Option<(f64, f64)> {
    let x = *values.first()?;
    let y = values.get(1).copied().unwrap_or(x);
    let valid = |v: f64| v.is_finite() && v > 0.0;
    (valid(x) && valid(y)).then_some((x, y))
}

fn to_ppu(value: f64) -> Option<u32> {
    let rounded = value.round();
    (rounded >= 1.0 && rounded <= f64::from(u32::MAX)).then_some(rounded as u32)
}
