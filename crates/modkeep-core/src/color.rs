//! Hex color values used by theme resources and palette overrides.

use std::fmt;

/// An ARGB color with 8 bits per channel.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Color {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { a: 0xFF, r, g, b }
    }

    #[must_use]
    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    #[must_use]
    pub const fn is_opaque(self) -> bool {
        self.a == 0xFF
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
        }
    }
}

const fn hex_digit(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

fn hex_bytes<const N: usize>(digits: &[u8]) -> Option<[u8; N]> {
    let mut out = [0u8; N];
    for (slot, pair) in out.iter_mut().zip(digits.chunks_exact(2)) {
        *slot = (hex_digit(pair[0])? << 4) | hex_digit(pair[1])?;
    }
    Some(out)
}

/// Parses `#RRGGBB` (opaque) or `#AARRGGBB`.
///
/// Only ASCII hex digits are accepted. Signs, `0x` prefixes, whitespace and
/// any other length yield `None`.
#[must_use]
pub fn parse_color(text: &str) -> Option<Color> {
    let digits = text.strip_prefix('#')?.as_bytes();
    match digits.len() {
        6 => {
            let [r, g, b] = hex_bytes::<3>(digits)?;
            Some(Color::rgb(r, g, b))
        }
        8 => {
            let [a, r, g, b] = hex_bytes::<4>(digits)?;
            Some(Color::argb(a, r, g, b))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_digits_are_opaque_rgb() {
        assert_eq!(parse_color("#FF8800"), Some(Color::argb(0xFF, 0xFF, 0x88, 0x00)));
    }

    #[test]
    fn eight_digits_are_argb() {
        let c = parse_color("#80FF8800").unwrap();
        assert_eq!(c.a, 0x80);
        assert_eq!((c.r, c.g, c.b), (0xFF, 0x88, 0x00));
    }

    #[test]
    fn digits_are_case_insensitive() {
        assert_eq!(parse_color("#ff8800"), parse_color("#FF8800"));
        assert_eq!(parse_color("#aBcDeF"), Some(Color::rgb(0xAB, 0xCD, 0xEF)));
    }

    #[test]
    fn rejects_missing_hash() {
        assert_eq!(parse_color("FF8800"), None);
    }

    #[test]
    fn rejects_wrong_lengths() {
        for text in ["#", "", "#FF88", "#FF880", "#FF88001", "#FF8800112"] {
            assert_eq!(parse_color(text), None, "{text:?}");
        }
    }

    #[test]
    fn rejects_non_hex_digits() {
        for text in ["#GGHHII", "#+F8800", "#0xFF88", "# FF880", "#FF88٠٠"] {
            assert_eq!(parse_color(text), None, "{text:?}");
        }
    }

    #[test]
    fn display_uses_short_form_when_opaque() {
        assert_eq!(Color::rgb(1, 2, 3).to_string(), "#010203");
        assert_eq!(Color::argb(0x80, 1, 2, 3).to_string(), "#80010203");
    }
}
