//! Mapping of array samples onto 8-bit PNG samples.

use crate::error::{Diagnostics, Warning};

/// Value domain mapped onto `[0, 255]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleRange {
    pub min: f64,
    pub max: f64,
}

impl SampleRange {
    /// Build a range from two bounds in either order.
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// The full 8-bit range `[0, 255]`.
    pub const BYTE: SampleRange = SampleRange {
        min: 0.0,
        max: 255.0,
    };

    pub fn is_flat(&self) -> bool {
        self.min == self.max
    }

    /// Map one sample to a byte, saturating outside the range.
    ///
    /// A flat range is treated as having width 1, so its lower bound maps to 0.
    pub fn quantize(&self, value: f64) -> u8 {
        // Halved operands keep the width finite for bounds near +-f64::MAX;
        // halving is exact, so ordinary ranges are unaffected.
        let half_width = if self.is_flat() {
            0.5
        } else {
            self.max / 2.0 - self.min / 2.0
        };
        // NaN survives clamp and casts to 0.
        ((value / 2.0 - self.min / 2.0) / half_width * 255.0)
            .round()
            .clamp(0.0, 255.0) as u8
    }

    fn from_pair(pair: [f64; 2]) -> Option<Self> {
        (pair[0].is_finite() && pair[1].is_finite()).then(|| Self::new(pair[0], pair[1]))
    }
}

/// Where the range used for an encode came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeSource {
    Explicit,
    Attribute,
    /// Logical data, fixed `[0, 255]`.
    Logical,
    Inferred,
}

/// Pick the range for an encode: explicit, then attribute, then the logical
/// default, then the extent of the finite samples.
pub(crate) fn resolve_range(
    explicit: Option<SampleRange>,
    attribute: Option<[f64; 2]>,
    logical: bool,
    values: &[Option<f64>],
) -> (SampleRange, RangeSource) {
    if let Some(range) = explicit {
        return (range, RangeSource::Explicit);
    }
    if let Some(range) = attribute.and_then(SampleRange::from_pair) {
        return (range, RangeSource::Attribute);
    }
    if logical {
        return (SampleRange::BYTE, RangeSource::Logical);
    }
    (infer_range(values), RangeSource::Inferred)
}

/// Extent of the finite samples. `[0, 0]` when there are none.
pub fn infer_range(values: &[Option<f64>]) -> SampleRange {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values.iter().flatten().filter(|v| v.is_finite()) {
        min = min.min(*v);
        max = max.max(*v);
    }
    if min > max {
        return SampleRange { min: 0.0, max: 0.0 };
    }
    SampleRange { min, max }
}

/// Quantized samples in the same order as the input.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Quantized {
    pub bytes: Vec<u8>,
    pub missing: usize,
    /// Missing values with an odd channel count. Reported only; the channel
    /// count is never changed.
    pub alpha_requested: bool,
}

pub(crate) fn quantize_samples(
    values: &[Option<f64>],
    range: SampleRange,
    channels: usize,
    diag: &mut Diagnostics,
) -> Quantized {
    if range.is_flat() {
        diag.warn(Warning::FlatImage { value: range.min });
    }
    let mut missing = 0;
    let bytes = values
        .iter()
        .map(|v| match v {
            Some(v) => range.quantize(*v),
            None => {
                missing += 1;
                0
            }
        })
        .collect();
    let alpha_requested = missing > 0 && channels % 2 == 1;
    if alpha_requested {
        log::debug!("{missing} missing samples with {channels} channels; alpha channel not added");
    }
    Quantized {
        bytes,
        missing,
        alpha_requested,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn byte_range_is_identity() {
        for v in 0..=255u8 {
            assert_eq!(SampleRange::BYTE.quantize(f64::from(v)), v);
        }
    }

    #[test]
    fn unit_range_rounds() {
        let r = SampleRange::new(0.0, 1.0);
        assert_eq!(r.quantize(0.0), 0);
        assert_eq!(r.quantize(0.5), 128);
        assert_eq!(r.quantize(1.0), 255);
        assert_eq!(r.quantize(2.0), 255);
        assert_eq!(r.quantize(-1.0), 0);
    }

    #[test]
    fn range_wider_than_f64_max() {
        let mut diag = Diagnostics::default();
        let values = [Some(-1e308), Some(1e308), Some(0.0), Some(5e307)];
        let range = infer_range(&values);
        let q = quantize_samples(&values, range, 1, &mut diag);
        assert_eq!(q.bytes, vec![0, 255, 128, 191]);
        let full = SampleRange::new(f64::MIN, f64::MAX);
        assert_eq!(full.quantize(f64::MAX), 255);
        assert_eq!(full.quantize(0.0), 128);
    }

    #[test]
    fn reversed_bounds_are_normalised() {
        assert_eq!(SampleRange::new(10.0, -2.0), SampleRange { min: -2.0, max: 10.0 });
    }

    #[test]
    fn precedence() {
        let values = [Some(2.0), Some(4.0)];
        let explicit = Some(SampleRange::new(0.0, 1.0));
        assert_eq!(
            resolve_range(explicit, Some([0.0, 9.0]), true, &values).1,
            RangeSource::Explicit
        );
        assert_eq!(
            resolve_range(None, Some([0.0, 9.0]), true, &values),
            (SampleRange::new(0.0, 9.0), RangeSource::Attribute)
        );
        assert_eq!(
            resolve_range(None, None, true, &values),
            (SampleRange::BYTE, RangeSource::Logical)
        );
        assert_eq!(
            resolve_range(None, None, false, &values),
            (SampleRange::new(2.0, 4.0), RangeSource::Inferred)
        );
    }

    #[test]
    fn inference_ignores_missing_and_infinite() {
        let values = [None, Some(f64::INFINITY), Some(3.0), Some(-1.0)];
        assert_eq!(infer_range(&values), SampleRange::new(-1.0, 3.0));
        assert_eq!(infer_range(&[None, None]), SampleRange { min: 0.0, max: 0.0 });
    }

    #[test]
    fn flat_range_warns_without_failing() {
        let mut diag = Diagnostics::default();
        let values = [Some(7.0); 4];
        let range = infer_range(&values);
        let q = quantize_samples(&values, range, 1, &mut diag);
        assert_eq!(q.bytes, vec![0; 4]);
        assert_eq!(diag.into_warnings(), vec![Warning::FlatImage { value: 7.0 }]);
    }

    #[test]
    fn missing_values_raise_alpha_signal_only_for_odd_channels() {
        let mut diag = Diagnostics::default();
        let values = [Some(1.0), None, Some(0.0), Some(1.0)];
        let odd = quantize_samples(&values, SampleRange::new(0.0, 1.0), 1, &mut diag);
        assert_eq!(odd.bytes, vec![255, 0, 0, 255]);
        assert_eq!(odd.missing, 1);
        assert!(odd.alpha_requested);
        let even = quantize_samples(&values, SampleRange::new(0.0, 1.0), 2, &mut diag);
        assert!(!even.alpha_requested);
    }

    proptest! {
        #[test]
        fn quantization_is_bounded(
            v in -1e300f64..1e300,
            a in -1e6f64..1e6,
            span in 1e-3f64..1e6,
        ) {
            let r = SampleRange::new(a, a + span);
            let b = r.quantize(v);
            // always a valid byte, and ordered with the input
            prop_assert!(b == 0 || v > a);
            prop_assert!(b == 255 || v < a + span);
        }
    }
}
