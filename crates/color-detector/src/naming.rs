//! Human-readable color names.
//!
//! Names are resolved by nearest match against a fixed table, scoring each
//! candidate by squared RGB distance plus twice the squared HSL distance
//! (both on a 0-255 scale). Exact matches short-circuit. The table is the
//! CSS named color set, so results are stable across runs and platforms.

use crate::color::Rgb;

/// Resolves a display name for a color.
///
/// Implementations must be deterministic: the same input always yields the
/// same name.
pub trait ColorNamer: Send + Sync {
    /// Return the display name for the given color.
    fn name(&self, rgb: Rgb) -> String;
}

/// Nearest-name lookup over a fixed table.
#[derive(Debug, Clone)]
pub struct NearestNamer {
    entries: Vec<NamedColor>,
}

#[derive(Debug, Clone, Copy)]
struct NamedColor {
    name: &'static str,
    rgb: Rgb,
    hsl: [i32; 3],
}

impl NearestNamer {
    /// Create a namer over the built-in table.
    #[must_use]
    pub fn new() -> Self {
        Self::with_table(NAMED_COLORS)
    }

    /// Create a namer over a custom `(name, r, g, b)` table.
    ///
    /// Earlier entries win ties.
    #[must_use]
    pub fn with_table(table: &[(&'static str, u8, u8, u8)]) -> Self {
        let entries = table
            .iter()
            .map(|&(name, r, g, b)| {
                let rgb = Rgb::new(r, g, b);
                NamedColor {
                    name,
                    rgb,
                    hsl: hsl255(rgb),
                }
            })
            .collect();
        Self { entries }
    }

    /// Number of names in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn nearest(&self, rgb: Rgb) -> Option<&NamedColor> {
        let hsl = hsl255(rgb);
        let mut best: Option<(&NamedColor, i64)> = None;

        for entry in &self.entries {
            if entry.rgb == rgb {
                return Some(entry);
            }

            let rgb_dist = sq(i32::from(rgb.r) - i32::from(entry.rgb.r))
                + sq(i32::from(rgb.g) - i32::from(entry.rgb.g))
                + sq(i32::from(rgb.b) - i32::from(entry.rgb.b));
            let hsl_dist = sq(hsl[0] - entry.hsl[0])
                + sq(hsl[1] - entry.hsl[1])
                + sq(hsl[2] - entry.hsl[2]);
            let score = rgb_dist + hsl_dist * 2;

            if best.map_or(true, |(_, s)| score < s) {
                best = Some((entry, score));
            }
        }

        best.map(|(entry, _)| entry)
    }
}

impl Default for NearestNamer {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorNamer for NearestNamer {
    fn name(&self, rgb: Rgb) -> String {
        self.nearest(rgb)
            .map_or_else(|| "Unknown".to_string(), |entry| entry.name.to_string())
    }
}

fn sq(v: i32) -> i64 {
    i64::from(v) * i64::from(v)
}

/// Convert to HSL with every component scaled to `0..=255`.
#[allow(clippy::cast_possible_truncation)]
fn hsl255(rgb: Rgb) -> [i32; 3] {
    let r = f64::from(rgb.r) / 255.0;
    let g = f64::from(rgb.g) / 255.0;
    let b = f64::from(rgb.b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let l = (max + min) / 2.0;

    let s = if delta == 0.0 {
        0.0
    } else if l < 0.5 {
        delta / (max + min)
    } else {
        delta / (2.0 - max - min)
    };

    let h = if delta == 0.0 {
        0.0
    } else if (max - r).abs() < f64::EPSILON {
        ((g - b) / delta).rem_euclid(6.0) / 6.0
    } else if (max - g).abs() < f64::EPSILON {
        ((b - r) / delta + 2.0) / 6.0
    } else {
        ((r - g) / delta + 4.0) / 6.0
    };

    [
        (h * 255.0).round() as i32,
        (s * 255.0).round() as i32,
        (l * 255.0).round() as i32,
    ]
}

/// Built-in name table.
pub const NAMED_COLORS: &[(&str, u8, u8, u8)] = &[
    ("Black", 0, 0, 0),
    ("Navy", 0, 0, 128),
    ("Dark Blue", 0, 0, 139),
    ("Medium Blue", 0, 0, 205),
    ("Blue", 0, 0, 255),
    ("Dark Green", 0, 100, 0),
    ("Green", 0, 128, 0),
    ("Teal", 0, 128, 128),
    ("Dark Cyan", 0, 139, 139),
    ("Deep Sky Blue", 0, 191, 255),
    ("Dark Turquoise", 0, 206, 209),
    ("Medium Spring Green", 0, 250, 154),
    ("Lime", 0, 255, 0),
    ("Spring Green", 0, 255, 127),
    ("Cyan", 0, 255, 255),
    ("Midnight Blue", 25, 25, 112),
    ("Dodger Blue", 30, 144, 255),
    ("Light Sea Green", 32, 178, 170),
    ("Forest Green", 34, 139, 34),
    ("Sea Green", 46, 139, 87),
    ("Dark Slate Gray", 47, 79, 79),
    ("Lime Green", 50, 205, 50),
    ("Medium Sea Green", 60, 179, 113),
    ("Turquoise", 64, 224, 208),
    ("Royal Blue", 65, 105, 225),
    ("Steel Blue", 70, 130, 180),
    ("Dark Slate Blue", 72, 61, 139),
    ("Medium Turquoise", 72, 209, 204),
    ("Indigo", 75, 0, 130),
    ("Dark Olive Green", 85, 107, 47),
    ("Cadet Blue", 95, 158, 160),
    ("Cornflower Blue", 100, 149, 237),
    ("Rebecca Purple", 102, 51, 153),
    ("Medium Aquamarine", 102, 205, 170),
    ("Dim Gray", 105, 105, 105),
    ("Slate Blue", 106, 90, 205),
    ("Olive Drab", 107, 142, 35),
    ("Slate Gray", 112, 128, 144),
    ("Light Slate Gray", 119, 136, 153),
    ("Medium Slate Blue", 123, 104, 238),
    ("Lawn Green", 124, 252, 0),
    ("Chartreuse", 127, 255, 0),
    ("Aquamarine", 127, 255, 212),
    ("Maroon", 128, 0, 0),
    ("Purple", 128, 0, 128),
    ("Olive", 128, 128, 0),
    ("Gray", 128, 128, 128),
    ("Sky Blue", 135, 206, 235),
    ("Light Sky Blue", 135, 206, 250),
    ("Blue Violet", 138, 43, 226),
    ("Dark Red", 139, 0, 0),
    ("Dark Magenta", 139, 0, 139),
    ("Saddle Brown", 139, 69, 19),
    ("Dark Sea Green", 143, 188, 143),
    ("Light Green", 144, 238, 144),
    ("Medium Purple", 147, 112, 219),
    ("Dark Violet", 148, 0, 211),
    ("Pale Green", 152, 251, 152),
    ("Dark Orchid", 153, 50, 204),
    ("Yellow Green", 154, 205, 50),
    ("Sienna", 160, 82, 45),
    ("Brown", 165, 42, 42),
    ("Dark Gray", 169, 169, 169),
    ("Light Blue", 173, 216, 230),
    ("Green Yellow", 173, 255, 47),
    ("Pale Turquoise", 175, 238, 238),
    ("Light Steel Blue", 176, 196, 222),
    ("Powder Blue", 176, 224, 230),
    ("Firebrick", 178, 34, 34),
    ("Dark Goldenrod", 184, 134, 11),
    ("Medium Orchid", 186, 85, 211),
    ("Rosy Brown", 188, 143, 143),
    ("Dark Khaki", 189, 183, 107),
    ("Silver", 192, 192, 192),
    ("Medium Violet Red", 199, 21, 133),
    ("Indian Red", 205, 92, 92),
    ("Peru", 205, 133, 63),
    ("Chocolate", 210, 105, 30),
    ("Tan", 210, 180, 140),
    ("Light Gray", 211, 211, 211),
    ("Thistle", 216, 191, 216),
    ("Orchid", 218, 112, 214),
    ("Goldenrod", 218, 165, 32),
    ("Pale Violet Red", 219, 112, 147),
    ("Crimson", 220, 20, 60),
    ("Gainsboro", 220, 220, 220),
    ("Plum", 221, 160, 221),
    ("Burlywood", 222, 184, 135),
    ("Light Cyan", 224, 255, 255),
    ("Lavender", 230, 230, 250),
    ("Dark Salmon", 233, 150, 122),
    ("Violet", 238, 130, 238),
    ("Pale Goldenrod", 238, 232, 170),
    ("Light Coral", 240, 128, 128),
    ("Khaki", 240, 230, 140),
    ("Alice Blue", 240, 248, 255),
    ("Honeydew", 240, 255, 240),
    ("Azure", 240, 255, 255),
    ("Sandy Brown", 244, 164, 96),
    ("Wheat", 245, 222, 179),
    ("Beige", 245, 245, 220),
    ("White Smoke", 245, 245, 245),
    ("Mint Cream", 245, 255, 250),
    ("Ghost White", 248, 248, 255),
    ("Salmon", 250, 128, 114),
    ("Antique White", 250, 235, 215),
    ("Linen", 250, 240, 230),
    ("Light Goldenrod Yellow", 250, 250, 210),
    ("Old Lace", 253, 245, 230),
    ("Red", 255, 0, 0),
    ("Magenta", 255, 0, 255),
    ("Deep Pink", 255, 20, 147),
    ("Orange Red", 255, 69, 0),
    ("Tomato", 255, 99, 71),
    ("Hot Pink", 255, 105, 180),
    ("Coral", 255, 127, 80),
    ("Dark Orange", 255, 140, 0),
    ("Light Salmon", 255, 160, 122),
    ("Orange", 255, 165, 0),
    ("Light Pink", 255, 182, 193),
    ("Pink", 255, 192, 203),
    ("Gold", 255, 215, 0),
    ("Peach Puff", 255, 218, 185),
    ("Navajo White", 255, 222, 173),
    ("Moccasin", 255, 228, 181),
    ("Bisque", 255, 228, 196),
    ("Misty Rose", 255, 228, 225),
    ("Blanched Almond", 255, 235, 205),
    ("Papaya Whip", 255, 239, 213),
    ("Lavender Blush", 255, 240, 245),
    ("Seashell", 255, 245, 238),
    ("Cornsilk", 255, 248, 220),
    ("Lemon Chiffon", 255, 250, 205),
    ("Floral White", 255, 250, 240),
    ("Snow", 255, 250, 250),
    ("Yellow", 255, 255, 0),
    ("Light Yellow", 255, 255, 224),
    ("Ivory", 255, 255, 240),
    ("White", 255, 255, 255),
];
