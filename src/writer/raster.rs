//! # Raster Writer
//!
//! Draws barcodes into an RGB bitmap at the configured DPI (300 unless
//! `dpi` is set). Text uses the bundled Spleen 12x24 bitmap font, scaled
//! nearest-neighbor so one text line is `font_size` points tall.
//!
//! | Format | Encoder |
//! |--------|---------|
//! | PNG, BMP, GIF, JPEG, TIFF | `image` |
//! | PCX, XBM | [`super::legacy`] |

use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgb, RgbImage};
use log::{debug, info};
use spleen_font::{FONT_12X24, PSF2Font};

use super::color::parse_color;
use super::{Backend, RasterFormat, Writer, calculate_size, legacy, mm_to_px, path_with_extension, pt_to_mm};
use crate::error::{BarlineError, Result};
use crate::symbology::ModuleSequence;
use crate::writer::options::WriterOptions;

const GLYPH_WIDTH: usize = 12;
const GLYPH_HEIGHT: usize = 24;

/// Row-major glyph bitmap, `true` = ink.
type Glyph = Vec<bool>;

fn color(options_key: &str, value: &str) -> Result<Rgb<u8>> {
    parse_color(value).map(Rgb).ok_or_else(|| BarlineError::InvalidOption {
        key: options_key.to_string(),
        value: value.to_string(),
    })
}

/// Glyph outline used when the font has no glyph for a character.
fn box_glyph() -> Glyph {
    let mut glyph = vec![false; GLYPH_WIDTH * GLYPH_HEIGHT];
    for x in 0..GLYPH_WIDTH {
        glyph[x] = true;
        glyph[(GLYPH_HEIGHT - 1) * GLYPH_WIDTH + x] = true;
    }
    for y in 0..GLYPH_HEIGHT {
        glyph[y * GLYPH_WIDTH] = true;
        glyph[y * GLYPH_WIDTH + GLYPH_WIDTH - 1] = true;
    }
    glyph
}

/// Rasterize every distinct character of `text` with Spleen 12x24.
fn load_glyphs(text: &str) -> Result<HashMap<char, Glyph>> {
    let mut spleen = PSF2Font::new(FONT_12X24)
        .map_err(|_| BarlineError::Image("Failed to load the bundled Spleen font".to_string()))?;

    let mut glyphs = HashMap::new();
    for ch in text.chars() {
        if glyphs.contains_key(&ch) {
            continue;
        }
        let utf8_bytes = ch.to_string();
        let glyph = match spleen.glyph_for_utf8(utf8_bytes.as_bytes()) {
            Some(spleen_glyph) => {
                let mut glyph = vec![false; GLYPH_WIDTH * GLYPH_HEIGHT];
                for (row_y, row) in spleen_glyph.enumerate() {
                    for (col_x, on) in row.enumerate() {
                        let idx = row_y * GLYPH_WIDTH + col_x;
                        if idx < glyph.len() {
                            glyph[idx] = on;
                        }
                    }
                }
                glyph
            }
            None => box_glyph(),
        };
        glyphs.insert(ch, glyph);
    }
    Ok(glyphs)
}

/// Writes barcodes as raster images.
#[derive(Debug, Clone)]
pub struct ImageWriter {
    options: WriterOptions,
    format: RasterFormat,
    dpi: f64,
    foreground: Rgb<u8>,
    background: Rgb<u8>,
    image: RgbImage,
    glyphs: HashMap<char, Glyph>,
}

impl ImageWriter {
    /// Fails with [`BarlineError::InvalidOption`] on colors that cannot be
    /// parsed.
    pub fn new(options: WriterOptions, format: RasterFormat) -> Result<Self> {
        let foreground = color("foreground", &options.foreground)?;
        let background = color("background", &options.background)?;
        let dpi = options.effective_dpi(Backend::Raster);
        Ok(Self {
            options,
            format,
            dpi,
            foreground,
            background,
            image: RgbImage::new(0, 0),
            glyphs: HashMap::new(),
        })
    }

    fn px(&self, mm: f64) -> i64 {
        mm_to_px(mm, self.dpi).round() as i64
    }

    /// Fill `[x0, x1) x [y0, y1)`, clipped to the image.
    fn fill(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, rgb: Rgb<u8>) {
        let (w, h) = (i64::from(self.image.width()), i64::from(self.image.height()));
        for y in y0.max(0)..y1.min(h) {
            for x in x0.max(0)..x1.min(w) {
                self.image.put_pixel(x as u32, y as u32, rgb);
            }
        }
    }
}

impl Writer for ImageWriter {
    type Output = RasterImage;

    const BACKEND: Backend = Backend::Raster;

    fn options(&self) -> &WriterOptions {
        &self.options
    }

    fn initialize(&mut self, sequence: &ModuleSequence) -> Result<()> {
        let (width, height) = calculate_size(&self.options, sequence.modules_per_line(), sequence.len(), self.dpi);
        debug!("raster: {}x{} px at {} dpi", width, height, self.dpi);
        self.image = RgbImage::from_pixel(width, height, self.background);
        self.glyphs = match self.options.display_text() {
            Some(text) => load_glyphs(text)?,
            None => HashMap::new(),
        };
        Ok(())
    }

    fn paint_module(&mut self, x: f64, y: f64, width: f64, color: &str) {
        let rgb = if color == self.options.foreground {
            self.foreground
        } else if color == self.options.background {
            self.background
        } else {
            parse_color(color).map(Rgb).unwrap_or(self.foreground)
        };
        let (x0, x1) = (self.px(x), self.px(x + width));
        let (y0, y1) = (self.px(y), self.px(y + self.options.module_height));
        self.fill(x0, y0, x1, y1, rgb);
    }

    fn paint_text(&mut self, x: f64, y: f64) {
        let Some(text) = self.options.display_text().map(str::to_string) else {
            return;
        };
        let glyph_h = (mm_to_px(pt_to_mm(self.options.font_size), self.dpi).round() as usize).max(1);
        let glyph_w = (glyph_h * GLYPH_WIDTH / GLYPH_HEIGHT).max(1);
        let step = pt_to_mm(self.options.font_size) + self.options.text_line_distance;
        let foreground = self.foreground;

        let mut baseline = y;
        for line in text.split('\n') {
            let line_w = (line.chars().count() * glyph_w) as i64;
            let left = if self.options.center_text { self.px(x) - line_w / 2 } else { self.px(x) };
            let top = self.px(baseline) - glyph_h as i64;

            for (i, ch) in line.chars().enumerate() {
                let Some(glyph) = self.glyphs.get(&ch).cloned() else {
                    continue;
                };
                let cell_x = left + (i * glyph_w) as i64;
                // Nearest-neighbor scale of the 12x24 cell
                for dy in 0..glyph_h {
                    for dx in 0..glyph_w {
                        let sx = dx * GLYPH_WIDTH / glyph_w;
                        let sy = dy * GLYPH_HEIGHT / glyph_h;
                        if glyph[sy * GLYPH_WIDTH + sx] {
                            let (px, py) = (cell_x + dx as i64, top + dy as i64);
                            self.fill(px, py, px + 1, py + 1, foreground);
                        }
                    }
                }
            }
            baseline += step;
        }
    }

    fn finish(self) -> Result<RasterImage> {
        Ok(RasterImage {
            image: self.image,
            format: self.format,
            dpi: self.dpi,
        })
    }
}

/// A rendered bitmap plus the format it will be encoded as.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    image: RgbImage,
    format: RasterFormat,
    dpi: f64,
}

impl RasterImage {
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    pub fn format(&self) -> RasterFormat {
        self.format
    }

    /// Encode to the file format's bytes.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let (width, height) = self.image.dimensions();
        let image_format = match self.format {
            RasterFormat::Png => ImageFormat::Png,
            RasterFormat::Bmp => ImageFormat::Bmp,
            RasterFormat::Gif => ImageFormat::Gif,
            RasterFormat::Jpeg => ImageFormat::Jpeg,
            RasterFormat::Tiff => ImageFormat::Tiff,
            RasterFormat::Pcx => {
                let dpi = self.dpi.round().clamp(1.0, f64::from(u16::MAX)) as u16;
                return Ok(legacy::encode_pcx(width, height, self.image.as_raw(), dpi));
            }
            RasterFormat::Xbm => {
                let xbm = legacy::encode_xbm(width, height, self.image.as_raw(), "barcode")
                    .map_err(|e| BarlineError::Image(format!("Failed to write XBM: {}", e)))?;
                return Ok(xbm.into_bytes());
            }
        };

        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), image_format)
            .map_err(|e| BarlineError::Image(format!("Failed to encode {:?}: {}", self.format, e)))?;
        Ok(bytes)
    }

    /// Write to `<stem>.<format extension>`.
    pub fn save(&self, stem: &Path) -> Result<PathBuf> {
        let path = path_with_extension(stem, self.format.extension());
        let bytes = self.encode()?;
        std::fs::write(&path, &bytes)?;
        info!("Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}
