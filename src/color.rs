//! Color endpoints and interpolation

use std::str::FromStr;

use crate::error::AppError;

/// An RGB color with 8-bit channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Interpolate toward `other` by `t` per channel.
    ///
    /// `t` outside [0, 1] extrapolates past the endpoints; channel values
    /// saturate at the u8 range.
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        fn channel(a: u8, b: u8, t: f32) -> u8 {
            (a as f32 + (b as f32 - a as f32) * t)
                .round()
                .clamp(0.0, 255.0) as u8
        }

        Rgb {
            r: channel(self.r, other.r, t),
            g: channel(self.g, other.g, t),
            b: channel(self.b, other.b, t),
        }
    }
}

impl From<Rgb> for ratatui::style::Color {
    fn from(color: Rgb) -> Self {
        ratatui::style::Color::Rgb(color.r, color.g, color.b)
    }
}

impl FromStr for Rgb {
    type Err = AppError;

    /// Parse a color from "RRGGBB" or "#RRGGBB" hex notation
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(AppError::Config(format!(
                "Invalid color '{}', expected RRGGBB hex",
                s
            )));
        }

        let r = u8::from_str_radix(&hex[0..2], 16);
        let g = u8::from_str_radix(&hex[2..4], 16);
        let b = u8::from_str_radix(&hex[4..6], 16);

        match (r, g, b) {
            (Ok(r), Ok(g), Ok(b)) => Ok(Rgb { r, g, b }),
            _ => Err(AppError::Config(format!(
                "Invalid color '{}', expected RRGGBB hex",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::color::{MAX_COLOR, MIN_COLOR};

    #[test]
    fn test_lerp_endpoints_are_exact() {
        assert_eq!(MIN_COLOR.lerp(MAX_COLOR, 0.0), MIN_COLOR);
        assert_eq!(MIN_COLOR.lerp(MAX_COLOR, 1.0), MAX_COLOR);
    }

    #[test]
    fn test_lerp_midpoint_is_channel_mean() {
        let mid = MIN_COLOR.lerp(MAX_COLOR, 0.5);

        let mean = |a: u8, b: u8| (a as f32 + b as f32) / 2.0;
        assert!((mid.r as f32 - mean(MIN_COLOR.r, MAX_COLOR.r)).abs() <= 0.5);
        assert!((mid.g as f32 - mean(MIN_COLOR.g, MAX_COLOR.g)).abs() <= 0.5);
        assert!((mid.b as f32 - mean(MIN_COLOR.b, MAX_COLOR.b)).abs() <= 0.5);
    }

    #[test]
    fn test_lerp_extrapolates_and_saturates() {
        let black = Rgb::new(0, 0, 0);
        let grey = Rgb::new(100, 100, 100);

        // Past the far endpoint
        assert_eq!(black.lerp(grey, 2.0), Rgb::new(200, 200, 200));
        // Saturates at the channel range
        assert_eq!(black.lerp(grey, 3.0), Rgb::new(255, 255, 255));
        assert_eq!(black.lerp(grey, -1.0), Rgb::new(0, 0, 0));
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!("4aa8db".parse::<Rgb>().unwrap(), Rgb::new(74, 168, 219));
        assert_eq!("#E36D50".parse::<Rgb>().unwrap(), Rgb::new(227, 109, 80));
    }

    #[test]
    fn test_parse_rejects_malformed_hex() {
        assert!("4aa8d".parse::<Rgb>().is_err());
        assert!("nothex".parse::<Rgb>().is_err());
        assert!("".parse::<Rgb>().is_err());
    }
}
