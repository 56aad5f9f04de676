use std::str::FromStr;

use eframe::egui::Color32;
use palette::{Darken, Hsl, IntoColor, Lighten, Srgb};

// ---------------------------------------------------------------------------
// Domain colours
// ---------------------------------------------------------------------------

/// Parse a `#rrggbb` domain colour, falling back to black.
pub fn parse_hex(hex: &str) -> Color32 {
    match Srgb::<u8>::from_str(hex) {
        Ok(rgb) => Color32::from_rgb(rgb.red, rgb.green, rgb.blue),
        Err(_) => {
            log::warn!("Invalid colour {hex:?}, using black");
            Color32::BLACK
        }
    }
}

/// `n` shades of `base`, darkest first, for ranking bars by importance.
pub fn shades(base: Color32, n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    let rgb = Srgb::new(base.r(), base.g(), base.b()).into_format::<f32>();
    let hsl: Hsl = rgb.into_color();
    (0..n)
        .map(|i| {
            let t = if n == 1 { 0.0 } else { i as f32 / (n - 1) as f32 };
            let shade = hsl.darken(0.15).lighten(0.6 * t);
            let out: Srgb = shade.into_color();
            Color32::from_rgb(
                (out.red.clamp(0.0, 1.0) * 255.0) as u8,
                (out.green.clamp(0.0, 1.0) * 255.0) as u8,
                (out.blue.clamp(0.0, 1.0) * 255.0) as u8,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_domain_colours() {
        assert_eq!(parse_hex("#FFD700"), Color32::from_rgb(255, 215, 0));
        assert_eq!(parse_hex("#1f77b4"), Color32::from_rgb(0x1f, 0x77, 0xb4));
        assert_eq!(parse_hex("gold"), Color32::BLACK);
    }

    #[test]
    fn shades_get_lighter() {
        let s = shades(parse_hex("#2ca02c"), 3);
        assert_eq!(s.len(), 3);
        let lum = |c: &Color32| c.r() as u32 + c.g() as u32 + c.b() as u32;
        assert!(lum(&s[0]) < lum(&s[2]));
        assert!(shades(Color32::RED, 0).is_empty());
    }
}
