//! QR symbol rendering: PNG raster, SVG vector and PNG data URLs.
//!
//! Encoding is delegated to the `qrcode` crate; this module only turns the
//! resulting module matrix into pixels or SVG paths using the caller's style
//! options.

use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{ImageFormat, Rgb, RgbImage};
use qrcode::types::QrError;
use qrcode::{Color, QrCode};
use serde::Serialize;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default output width in pixels.
pub const DEFAULT_WIDTH: u32 = 256;

/// Default quiet-zone width in modules.
pub const DEFAULT_MARGIN: u32 = 1;

/// Largest accepted output width in pixels.
pub const MAX_WIDTH: u32 = 4096;

/// Largest accepted quiet-zone width in modules.
pub const MAX_MARGIN: u32 = 64;

/// Pixels per module when the requested width is too small for the symbol.
const FALLBACK_SCALE: u32 = 4;

// ---------------------------------------------------------------------------
// Error-correction level
// ---------------------------------------------------------------------------

/// QR error-correction level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum EcLevel {
    /// ~7% recovery.
    L,
    /// ~15% recovery.
    #[default]
    M,
    /// ~25% recovery.
    Q,
    /// ~30% recovery.
    H,
}

impl EcLevel {
    fn to_qrcode(self) -> qrcode::EcLevel {
        match self {
            Self::L => qrcode::EcLevel::L,
            Self::M => qrcode::EcLevel::M,
            Self::Q => qrcode::EcLevel::Q,
            Self::H => qrcode::EcLevel::H,
        }
    }
}

impl FromStr for EcLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(Self::L),
            "M" => Ok(Self::M),
            "Q" => Ok(Self::Q),
            "H" => Ok(Self::H),
            other => Err(CoreError::Validation(format!(
                "Invalid error correction level '{other}'. Must be one of: L, M, Q, H"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

/// An opaque RGB color parsed from `#RGB` or `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor(pub [u8; 3]);

impl HexColor {
    pub const BLACK: Self = Self([0x00, 0x00, 0x00]);
    pub const WHITE: Self = Self([0xFF, 0xFF, 0xFF]);
}

impl FromStr for HexColor {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::Validation(format!("Invalid color '{s}'. Expected #RGB or #RRGGBB"));

        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            _ => return Err(invalid()),
        };

        let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self([channel(0)?, channel(2)?, channel(4)?]))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Style options shared by every output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrOptions {
    /// Output width (and height) in pixels.
    pub width: u32,
    /// Quiet zone around the symbol, in modules.
    pub margin: u32,
    pub dark: HexColor,
    pub light: HexColor,
    pub ec_level: EcLevel,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            margin: DEFAULT_MARGIN,
            dark: HexColor::BLACK,
            light: HexColor::WHITE,
            ec_level: EcLevel::M,
        }
    }
}

/// Raw, unvalidated style overrides as they arrive from a request.
#[derive(Debug, Clone, Default)]
pub struct QrOverrides<'a> {
    pub width: Option<u32>,
    pub margin: Option<u32>,
    pub dark_color: Option<&'a str>,
    pub light_color: Option<&'a str>,
    pub error_level: Option<&'a str>,
}

impl QrOptions {
    /// Apply `overrides` on top of the defaults, validating every value.
    pub fn from_overrides(overrides: &QrOverrides<'_>) -> Result<Self, CoreError> {
        let mut opts = Self::default();

        if let Some(width) = overrides.width {
            if width == 0 || width > MAX_WIDTH {
                return Err(CoreError::Validation(format!(
                    "Width must be between 1 and {MAX_WIDTH} pixels"
                )));
            }
            opts.width = width;
        }
        if let Some(margin) = overrides.margin {
            if margin > MAX_MARGIN {
                return Err(CoreError::Validation(format!(
                    "Margin must not exceed {MAX_MARGIN} modules"
                )));
            }
            opts.margin = margin;
        }
        if let Some(dark) = overrides.dark_color {
            opts.dark = dark.parse()?;
        }
        if let Some(light) = overrides.light_color {
            opts.light = light.parse()?;
        }
        if let Some(level) = overrides.error_level {
            opts.ec_level = level.parse()?;
        }

        Ok(opts)
    }

    /// Same options at a different pixel width.
    pub fn with_width(self, width: u32) -> Self {
        Self { width, ..self }
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encoded module matrix, row-major, `true` for dark modules.
struct Symbol {
    size: usize,
    modules: Vec<bool>,
}

impl Symbol {
    fn is_dark(&self, x: usize, y: usize) -> bool {
        self.modules[y * self.size + x]
    }
}

fn encode(text: &str, level: EcLevel) -> Result<Symbol, CoreError> {
    let code = QrCode::with_error_correction_level(text.as_bytes(), level.to_qrcode())
        .map_err(|e| encoding_error(e, level))?;

    Ok(Symbol {
        size: code.width(),
        modules: code
            .to_colors()
            .into_iter()
            .map(|c| c == Color::Dark)
            .collect(),
    })
}

fn encoding_error(err: QrError, level: EcLevel) -> CoreError {
    match err {
        QrError::DataTooLong => CoreError::Encoding(format!(
            "Content is too long for a QR code at error correction level {level:?}"
        )),
        other => CoreError::Encoding(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Raster
// ---------------------------------------------------------------------------

/// Render `text` as a square RGB PNG.
///
/// The image is exactly `opts.width` pixels wide whenever that is enough to
/// give every module at least one pixel; otherwise each module is drawn at a
/// fixed fallback scale. Each pixel takes the color of the module it falls
/// in, so module edges may differ by one pixel when the width is not a
/// multiple of the module count.
pub fn render_png(text: &str, opts: &QrOptions) -> Result<Vec<u8>, CoreError> {
    let symbol = encode(text, opts.ec_level)?;
    let image = rasterize(&symbol, opts);

    let mut buffer = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|e| CoreError::Internal(format!("PNG encoding failed: {e}")))?;
    Ok(buffer)
}

/// Render `text` as a `data:image/png;base64,...` URL.
pub fn render_data_url(text: &str, opts: &QrOptions) -> Result<String, CoreError> {
    let png = render_png(text, opts)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}

/// Decode a PNG data URL produced by [`render_data_url`] back into PNG bytes.
pub fn decode_png_data_url(data_url: &str) -> Result<Vec<u8>, CoreError> {
    let encoded = data_url
        .strip_prefix("data:image/png;base64,")
        .ok_or_else(|| CoreError::Internal("Not a PNG data URL".into()))?;
    STANDARD
        .decode(encoded)
        .map_err(|e| CoreError::Internal(format!("Invalid base64 in data URL: {e}")))
}

fn rasterize(symbol: &Symbol, opts: &QrOptions) -> RgbImage {
    let margin = opts.margin as usize;
    let total_modules = symbol.size + 2 * margin;

    let (image_size, scale) = if opts.width as usize >= total_modules {
        (opts.width, opts.width as f64 / total_modules as f64)
    } else {
        let scale = FALLBACK_SCALE as usize;
        ((total_modules * scale) as u32, scale as f64)
    };

    let scaled_margin = margin as f64 * scale;
    let inner_end = image_size as f64 - scaled_margin;
    let last_module = symbol.size - 1;

    let dark = Rgb(opts.dark.0);
    let light = Rgb(opts.light.0);

    RgbImage::from_fn(image_size, image_size, |px, py| {
        let (x, y) = (px as f64, py as f64);
        if x < scaled_margin || y < scaled_margin || x >= inner_end || y >= inner_end {
            return light;
        }
        let mx = (((x - scaled_margin) / scale) as usize).min(last_module);
        let my = (((y - scaled_margin) / scale) as usize).min(last_module);
        if symbol.is_dark(mx, my) {
            dark
        } else {
            light
        }
    })
}

// ---------------------------------------------------------------------------
// Vector
// ---------------------------------------------------------------------------

/// Render `text` as an SVG document.
///
/// The `viewBox` is in module units (symbol plus quiet zone) and the
/// `width`/`height` attributes carry the pixel width. Dark modules are drawn
/// as one path of horizontal runs: `M{x} {y}h{len}v1h-{len}z`.
pub fn render_svg(text: &str, opts: &QrOptions) -> Result<String, CoreError> {
    let symbol = encode(text, opts.ec_level)?;
    let margin = opts.margin as usize;
    let total = symbol.size + 2 * margin;

    let mut path = String::new();
    for y in 0..symbol.size {
        let mut x = 0;
        while x < symbol.size {
            if !symbol.is_dark(x, y) {
                x += 1;
                continue;
            }
            let start = x;
            while x < symbol.size && symbol.is_dark(x, y) {
                x += 1;
            }
            let run = x - start;
            path.push_str(&format!(
                "M{} {}h{run}v1h-{run}z",
                start + margin,
                y + margin
            ));
        }
    }

    Ok(format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{width}\" \
         viewBox=\"0 0 {total} {total}\" shape-rendering=\"crispEdges\">\
         <path fill=\"{light}\" d=\"M0 0h{total}v{total}H0z\"/>\
         <path fill=\"{dark}\" d=\"{path}\"/>\
         </svg>\n",
        width = opts.width,
        light = opts.light,
        dark = opts.dark,
    ))
}
