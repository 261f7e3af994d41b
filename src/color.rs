use std::fmt;
use std::str::FromStr;

use image::Rgba;

/// 24-bit RGB color packed as `0x00RRGGBB`.
///
/// Packed equality is what the editor compares on; it is equivalent to the
/// case-insensitive hex comparison the string form would need.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Color(u32);

impl Color {
    /// Background / "empty" color of every tile.
    pub const BLACK: Color = Color(0x000000);
    pub const WHITE: Color = Color(0xFFFFFF);
    pub const RED: Color = Color(0xFF0000);
    pub const GREEN: Color = Color(0x00FF00);
    pub const BLUE: Color = Color(0x0000FF);

    #[inline]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Color(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Build from a packed value; bits above the low 24 are discarded.
    #[inline]
    pub const fn from_packed(packed: u32) -> Self {
        Color(packed & 0x00FF_FFFF)
    }

    #[inline]
    pub const fn packed(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    /// Opaque RGBA pixel for the render projection.
    #[inline]
    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r(), self.g(), self.b(), 255])
    }

    /// Parse `#RRGGBB`, `RRGGBB` or `#RRGGBBAA` (trailing alpha is ignored).
    pub fn from_hex(s: &str) -> Result<Self, ColorError> {
        let digits = s.trim().trim_start_matches('#');
        if !digits.is_ascii() {
            return Err(ColorError::InvalidDigit(s.to_string()));
        }
        let rgb = match digits.len() {
            6 => digits,
            8 => &digits[..6],
            n => return Err(ColorError::InvalidLength(n)),
        };
        parse_hex24(rgb)
            .map(Color::from_packed)
            .ok_or_else(|| ColorError::InvalidDigit(s.to_string()))
    }

    /// Uppercase `#RRGGBB`.
    pub fn to_hex(self) -> String {
        format!("#{:06X}", self.0)
    }

    /// Convert a material `AARRGGBB` string (alpha first, e.g. `"7fFF6060"`).
    ///
    /// The alpha byte is dropped and the remaining six digits are used as RGB.
    /// Malformed input falls back to black and is logged; it is never an error
    /// for the caller.
    pub fn from_argb_hex(argb: &str) -> Self {
        let argb = argb.trim();
        if argb.len() != 8 || !argb.is_ascii() {
            crate::log_warn!(
                "Material color {:?} is not 8 ARGB hex digits, using black",
                argb
            );
            return Color::BLACK;
        }
        match parse_hex24(&argb[2..]) {
            Some(v) => Color::from_packed(v),
            None => {
                crate::log_warn!("Material color {:?} has non-hex digits, using black", argb);
                Color::BLACK
            }
        }
    }
}

/// Six ASCII hex digits → packed RGB. `from_str_radix` alone would accept a sign.
fn parse_hex24(digits: &str) -> Option<u32> {
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s)
    }
}

impl From<Rgba<u8>> for Color {
    fn from(px: Rgba<u8>) -> Self {
        Color::from_rgb(px.0[0], px.0[1], px.0[2])
    }
}

/// Error type for hex color parsing at the input boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// Digit count (after an optional `#`) was not 6 or 8.
    InvalidLength(usize),
    InvalidDigit(String),
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorError::InvalidLength(n) => {
                write!(f, "expected 6 or 8 hex digits, got {}", n)
            }
            ColorError::InvalidDigit(s) => write!(f, "invalid hex color: {}", s),
        }
    }
}

impl std::error::Error for ColorError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing_is_case_insensitive() {
        assert_eq!(Color::from_hex("#ff0000").unwrap(), Color::RED);
        assert_eq!(Color::from_hex("#FF0000").unwrap(), Color::RED);
        assert_eq!(Color::from_hex("00Ff00").unwrap(), Color::GREEN);
    }

    #[test]
    fn eight_digit_css_form_drops_trailing_alpha() {
        // Legacy configs store the default brush as '#FF000000'.
        assert_eq!(Color::from_hex("#FF000000").unwrap(), Color::RED);
    }

    #[test]
    fn bad_hex_is_reported() {
        assert_eq!(Color::from_hex("#FFF"), Err(ColorError::InvalidLength(3)));
        assert!(matches!(Color::from_hex("#GG0000"), Err(ColorError::InvalidDigit(_))));
        assert!(matches!(Color::from_hex("+FFFFF"), Err(ColorError::InvalidDigit(_))));
    }

    #[test]
    fn hex_output_is_uppercase() {
        assert_eq!(Color::from_rgb(0xab, 0xcd, 0xef).to_hex(), "#ABCDEF");
        assert_eq!(Color::BLACK.to_string(), "#000000");
    }

    #[test]
    fn argb_drops_alpha_byte() {
        assert_eq!(Color::from_argb_hex("7fFF6060"), Color::from_rgb(0xFF, 0x60, 0x60));
        assert_eq!(Color::from_argb_hex("ff000000"), Color::BLACK);
    }

    #[test]
    fn malformed_argb_falls_back_to_black() {
        assert_eq!(Color::from_argb_hex("FF6060"), Color::BLACK);
        assert_eq!(Color::from_argb_hex("zzFF6060"), Color::from_rgb(0xFF, 0x60, 0x60));
        assert_eq!(Color::from_argb_hex("ffXX6060"), Color::BLACK);
        assert_eq!(Color::from_argb_hex(""), Color::BLACK);
    }

    #[test]
    fn channels_round_through_packing() {
        let c = Color::from_rgb(1, 2, 3);
        assert_eq!((c.r(), c.g(), c.b()), (1, 2, 3));
        assert_eq!(Color::from_packed(0xFF12_3456).packed(), 0x12_3456);
        assert_eq!(Color::from(c.to_rgba()), c);
    }
}
