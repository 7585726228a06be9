//! Color parsing for the raster backend.
//!
//! The vector backend writes color strings through unchanged, so anything
//! SVG understands works there. Raster output needs RGB values:
//!
//! | Form | Example |
//! |------|---------|
//! | Name | `white`, `black`, `red`, `navy`, ... |
//! | `#rgb` | `#f00` |
//! | `#rrggbb` | `#ff0000` |

/// Named colors (CSS basic palette plus a few common extras).
const NAMED: &[(&str, [u8; 3])] = &[
    ("aqua", [0, 255, 255]),
    ("black", [0, 0, 0]),
    ("blue", [0, 0, 255]),
    ("brown", [165, 42, 42]),
    ("cyan", [0, 255, 255]),
    ("darkgray", [169, 169, 169]),
    ("darkgrey", [169, 169, 169]),
    ("fuchsia", [255, 0, 255]),
    ("gray", [128, 128, 128]),
    ("green", [0, 128, 0]),
    ("grey", [128, 128, 128]),
    ("lightgray", [211, 211, 211]),
    ("lightgrey", [211, 211, 211]),
    ("lime", [0, 255, 0]),
    ("magenta", [255, 0, 255]),
    ("maroon", [128, 0, 0]),
    ("navy", [0, 0, 128]),
    ("olive", [128, 128, 0]),
    ("orange", [255, 165, 0]),
    ("purple", [128, 0, 128]),
    ("red", [255, 0, 0]),
    ("silver", [192, 192, 192]),
    ("teal", [0, 128, 128]),
    ("white", [255, 255, 255]),
    ("yellow", [255, 255, 0]),
];

/// Parse a color name or hex string into RGB.
///
/// Returns `None` for anything unrecognised.
pub fn parse_color(color: &str) -> Option<[u8; 3]> {
    let color = color.trim();
    if let Some(hex) = color.strip_prefix('#') {
        if !hex.is_ascii() {
            return None;
        }
        return match hex.len() {
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some([r, g, b])
            }
            3 => {
                // #abc is #aabbcc
                let mut rgb = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    let v = c.to_digit(16)? as u8;
                    rgb[i] = v * 17;
                }
                Some(rgb)
            }
            _ => None,
        };
    }

    let name = color.to_lowercase();
    NAMED
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, rgb)| rgb)
}
