//! bKGD <-> `#RRGGBB`.

use crate::pixel::ColourType;

/// Format a colour as `#RRGGBB`.
pub fn format_background(rgb: [u8; 3]) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2])
}

/// Parse a hex triplet, with or without a leading `#`.
///
/// Returns `None` for unparseable strings and for zero, so a black
/// background is indistinguishable from no background.
pub fn parse_background(value: &str) -> Option<[u8; 3]> {
    let hex = value.trim().trim_start_matches('#');
    let parsed = match u32::from_str_radix(hex, 16) {
        Ok(v) if v <= 0xFF_FFFF => v,
        _ => {
            log::debug!("ignoring unparseable background {value:?}");
            return None;
        }
    };
    if parsed == 0 {
        log::debug!("background {value:?} parses to zero; treated as unset");
        return None;
    }
    let [_, r, g, b] = parsed.to_be_bytes();
    Some([r, g, b])
}

/// Interpret a bKGD payload as an 8-bit RGB colour.
pub(crate) fn decode_bkgd(
    payload: &[u8],
    colour: ColourType,
    bit_depth: u8,
    palette: Option<&[u8]>,
) -> Option<[u8; 3]> {
    let sample = |i: usize| -> Option<u8> {
        let v = u16::from_be_bytes([*payload.get(i)?, *payload.get(i + 1)?]);
        Some(to_byte(v, bit_depth))
    };
    match colour {
        ColourType::Palette => {
            let index = usize::from(*payload.first()?);
            let entry = palette?.get(index * 3..index * 3 + 3)?;
            Some([entry[0], entry[1], entry[2]])
        }
        ColourType::Grey | ColourType::GreyAlpha => {
            let v = sample(0)?;
            Some([v, v, v])
        }
        ColourType::Rgb | ColourType::Rgba => Some([sample(0)?, sample(2)?, sample(4)?]),
    }
}

/// Build a bKGD payload for an 8-bit image. Grey images use the red component.
pub(crate) fn encode_bkgd(rgb: [u8; 3], colour: ColourType) -> Option<Vec<u8>> {
    match colour {
        ColourType::Grey | ColourType::GreyAlpha => Some(vec![0, rgb[0]]),
        ColourType::Rgb | ColourType::Rgba => Some(vec![0, rgb[0], 0, rgb[1], 0, rgb[2]]),
        ColourType::Palette => None,
    }
}

fn to_byte(value: u16, bit_depth: u8) -> u8 {
    match bit_depth {
        16 => (value >> 8) as u8,
        1 | 2 | 4 => {
            let max = (1u32 << bit_depth) - 1;
            (u32::from(value).min(max) * 255 / max) as u8
        }
        _ => value.min(255) as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_padded_upper_hex() {
        assert_eq!(format_background([255, 0, 0]), "#FF0000");
        assert_eq!(format_background([1, 2, 171]), "#0102AB");
    }

    #[test]
    fn parses_with_and_without_hash() {
        assert_eq!(parse_background("#FF0000"), Some([255, 0, 0]));
        assert_eq!(parse_background("00ff80"), Some([0, 255, 128]));
        assert_eq!(parse_background("not a colour"), None);
        assert_eq!(parse_background("#1000000"), None);
    }

    #[test]
    fn black_is_dropped() {
        assert_eq!(parse_background("#000000"), None);
    }

    #[test]
    fn bkgd_payloads() {
        assert_eq!(
            decode_bkgd(&[0, 255, 0, 0, 0, 0], ColourType::Rgb, 8, None),
            Some([255, 0, 0])
        );
        assert_eq!(
            decode_bkgd(&[0xAB, 0xCD], ColourType::Grey, 16, None),
            Some([0xAB; 3])
        );
        assert_eq!(decode_bkgd(&[0, 1], ColourType::Grey, 1, None), Some([255; 3]));
        let palette = [0, 0, 0, 10, 20, 30];
        assert_eq!(
            decode_bkgd(&[1], ColourType::Palette, 8, Some(&palette)),
            Some([10, 20, 30])
        );
        assert_eq!(decode_bkgd(&[5], ColourType::Palette, 8, Some(&palette)), None);
        assert_eq!(decode_bkgd(&[0], ColourType::Rgb, 8, None), None);
    }

    #[test]
    fn grey_bkgd_uses_red() {
        assert_eq!(encode_bkgd([9, 8, 7], ColourType::Grey), Some(vec![0, 9]));
        assert_eq!(
            encode_bkgd([9, 8, 7], ColourType::Rgba),
            Some(vec![0, 9, 0, 8, 0, 7])
        );
    }
}
