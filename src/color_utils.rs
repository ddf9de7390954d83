// File: src/color_utils.rs
use std::hash::{Hash, Hasher};

/// Deterministic pastel colour for a category name, as 8-bit (r, g, b).
/// The same category always gets the same colour within a build.
pub fn category_color(category: &str) -> (u8, u8, u8) {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    category.hash(&mut hasher);
    let hash = hasher.finish();

    // Hue carries most of the distinction between categories.
    let h = (hash % 360) as f32;

    // Separate bit ranges for S and L so they don't track the hue.
    let hash_s = hash >> 16;
    let hash_l = hash >> 32;

    // Saturation 45% - 85%, lightness 60% - 80%: soft, but still readable as
    // a foreground on a dark terminal.
    let s = 0.45 + ((hash_s % 41) as f32 / 100.0);
    let l = 0.60 + ((hash_l % 21) as f32 / 100.0);

    let (r, g, b) = hsl_to_rgb(h, s, l);
    (to_u8(r), to_u8(g), to_u8(b))
}

fn to_u8(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = if (0.0..60.0).contains(&h) {
        (c, x, 0.0)
    } else if (60.0..120.0).contains(&h) {
        (x, c, 0.0)
    } else if (120.0..180.0).contains(&h) {
        (0.0, c, x)
    } else if (180.0..240.0).contains(&h) {
        (0.0, x, c)
    } else if (240.0..300.0).contains(&h) {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    (r + m, g + m, b + m)
}

/// Whether text drawn on this background should be light.
pub fn is_dark(r: u8, g: u8, b: u8) -> bool {
    let brightness = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
    brightness < 128.0
}
