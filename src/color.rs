//! RGB colors and their hex text form.

use palette::Srgb;

use crate::error::{Error, Result};

/// An 8-bit RGB triple. No alpha.
pub type Color = Srgb<u8>;

/// The ten colors the web service matched against when no palette was sent.
/// Black and white are deliberately absent.
pub const DEFAULT_REFERENCE_PALETTE: [Color; 10] = [
    Srgb::new(0xff, 0x00, 0x00),
    Srgb::new(0x00, 0xff, 0x00),
    Srgb::new(0x00, 0x00, 0xff),
    Srgb::new(0xff, 0xff, 0x00),
    Srgb::new(0xff, 0x00, 0xff),
    Srgb::new(0x00, 0xff, 0xff),
    Srgb::new(0x80, 0x80, 0x80),
    Srgb::new(0x80, 0x00, 0x80),
    Srgb::new(0x00, 0x80, 0x00),
    Srgb::new(0xff, 0x80, 0x00),
];

/// Encode a color as six lowercase hex digits, without `#`.
pub fn encode_hex(color: Color) -> String {
    format!("{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

/// `#`-prefixed form used in responses.
pub fn to_hex_string(color: Color) -> String {
    format!("#{}", encode_hex(color))
}

/// Parse exactly six hex digits, with or without a leading `#`.
pub fn decode_hex(input: &str) -> Result<Color> {
    let hex = input.strip_prefix('#').unwrap_or(input);
    // from_str_radix accepts a sign, so check the digits first
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::malformed_color(input, "non-hex character"));
    }
    if hex.len() != 6 {
        return Err(Error::malformed_color(input, "expected 6 hex digits"));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .map_err(|_| Error::malformed_color(input, "non-hex character"))
    };
    Ok(Srgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Parse a comma-separated list of hex colors, e.g. `"#ff0000, 00ff00"`.
pub fn parse_palette(list: &str) -> Result<Vec<Color>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(decode_hex)
        .collect()
}

/// Squared Euclidean distance in RGB space.
#[inline(always)]
pub(crate) fn distance_squared(a: Color, b: Color) -> u32 {
    let dr = a.red as i32 - b.red as i32;
    let dg = a.green as i32 - b.green as i32;
    let db = a.blue as i32 - b.blue as i32;
    (dr * dr + dg * dg + db * db) as u32
}

#[inline(always)]
pub fn distance(a: Color, b: Color) -> f64 {
    (distance_squared(a, b) as f64).sqrt()
}

/// Hashable key for a color.
#[inline(always)]
pub(crate) fn key(color: Color) -> [u8; 3] {
    [color.red, color.green, color.blue]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_is_lowercase_two_digits_per_channel() {
        assert_eq!(encode_hex(Srgb::new(255, 0, 10)), "ff000a");
        assert_eq!(to_hex_string(Srgb::new(0, 255, 0)), "#00ff00");
    }

    #[test]
    fn decode_accepts_optional_hash_and_any_case() {
        assert_eq!(decode_hex("#FF8000").unwrap(), Srgb::new(255, 128, 0));
        assert_eq!(decode_hex("ff8000").unwrap(), Srgb::new(255, 128, 0));
        assert_eq!(encode_hex(decode_hex("AbCdEf").unwrap()), "abcdef");
    }

    #[test]
    fn decode_rejects_bad_length_and_characters() {
        for bad in ["", "#", "fff", "#ff00000", "ff00g0", "+f0000", "#ff 000", "ffé000"] {
            assert!(
                matches!(decode_hex(bad), Err(Error::MalformedColor { .. })),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn every_gray_and_primary_round_trips() {
        for v in 0..=255u8 {
            for c in [Srgb::new(v, v, v), Srgb::new(v, 0, 255 - v), Srgb::new(0, v, 7)] {
                assert_eq!(decode_hex(&encode_hex(c)).unwrap(), c);
                assert_eq!(decode_hex(&to_hex_string(c)).unwrap(), c);
            }
        }
    }

    #[test]
    fn palette_list_tolerates_whitespace_and_hashes() {
        let colors = parse_palette(" #ff0000,00ff00 ,, #0000FF").unwrap();
        assert_eq!(
            colors,
            vec![Srgb::new(255, 0, 0), Srgb::new(0, 255, 0), Srgb::new(0, 0, 255)]
        );
        assert!(parse_palette("ff0000,nothex").is_err());
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Srgb::new(0, 0, 0);
        let b = Srgb::new(3, 4, 0);
        assert_eq!(distance_squared(a, b), 25);
        assert_eq!(distance(a, b), 5.0);
        assert_eq!(distance_squared(Srgb::new(0, 0, 0), Srgb::new(255, 255, 255)), 195075);
    }
}
