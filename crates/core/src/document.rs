//! Single-page PDF sheet for a QR code.
//!
//! Layout (A4, millimetres measured from the top edge):
//!
//! ```text
//!  20,30   Title (20 pt)
//!  20,45   Description, wrapped to 170 mm (12 pt, optional)
//!  20,qrY  QR image 50 x 50 mm       80,qrY+10  "Content:" (10 pt)
//!                                    80,qrY+20  content, wrapped to 110 mm (9 pt)
//!  20,qrY+70  "Generated on: ..." (8 pt)
//! ```
//!
//! `qrY` is 70 when a description is present and 50 otherwise. There is no
//! pagination: wrapped lines that would run past the bottom margin are
//! dropped.

use std::io::Cursor;

use chrono::{DateTime, Local};
use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::image_crate::ImageDecoder;
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfLayerReference,
};

use crate::error::CoreError;
use crate::qr::{decode_png_data_url, render_data_url, QrOptions};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const BOTTOM_MARGIN_MM: f32 = 10.0;

const LEFT_MM: f32 = 20.0;
const TITLE_Y_MM: f32 = 30.0;
const TITLE_PT: f32 = 20.0;
const DESCRIPTION_Y_MM: f32 = 45.0;
const DESCRIPTION_PT: f32 = 12.0;
const DESCRIPTION_WIDTH_MM: f32 = 170.0;

/// Pixel width of the embedded QR raster.
pub const QR_IMAGE_PX: u32 = 200;
const QR_IMAGE_MM: f32 = 50.0;
const QR_Y_WITH_DESCRIPTION_MM: f32 = 70.0;
const QR_Y_WITHOUT_DESCRIPTION_MM: f32 = 50.0;

const CONTENT_X_MM: f32 = 80.0;
const CONTENT_LABEL_PT: f32 = 10.0;
const CONTENT_PT: f32 = 9.0;
const CONTENT_WIDTH_MM: f32 = 110.0;

const FOOTER_OFFSET_MM: f32 = 70.0;
const FOOTER_PT: f32 = 8.0;

/// Line height as a multiple of the font size.
const LINE_HEIGHT_FACTOR: f32 = 1.15;
const MM_PER_PT: f32 = 25.4 / 72.0;
/// Average Helvetica glyph advance as a fraction of the font size.
const AVG_CHAR_WIDTH_EM: f32 = 0.5;

/// Compose the PDF sheet for `text` and return the serialized document.
pub fn compose_pdf(
    text: &str,
    title: &str,
    description: Option<&str>,
    opts: &QrOptions,
    generated_at: DateTime<Local>,
) -> Result<Vec<u8>, CoreError> {
    let description = description.map(str::trim).filter(|d| !d.is_empty());

    let qr_url = render_data_url(text, &opts.with_width(QR_IMAGE_PX))?;
    let qr_png = decode_png_data_url(&qr_url)?;

    let (doc, page, layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "QR");
    let layer = doc.get_page(page).get_layer(layer);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_error)?;

    let sheet = Sheet { layer: &layer, font: &font };

    sheet.line(title, TITLE_PT, LEFT_MM, TITLE_Y_MM);

    if let Some(description) = description {
        sheet.wrapped(description, DESCRIPTION_PT, LEFT_MM, DESCRIPTION_Y_MM, DESCRIPTION_WIDTH_MM);
    }

    let qr_y = if description.is_some() {
        QR_Y_WITH_DESCRIPTION_MM
    } else {
        QR_Y_WITHOUT_DESCRIPTION_MM
    };

    let decoder = PngDecoder::new(Cursor::new(qr_png))
        .map_err(|e| CoreError::Internal(format!("Failed to read QR raster: {e}")))?;
    // Wider than QR_IMAGE_PX when the symbol needs the fallback module scale.
    let (width_px, _) = decoder.dimensions();
    let image = Image::try_from(decoder)
        .map_err(|e| CoreError::Internal(format!("Failed to embed QR raster: {e}")))?;
    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(LEFT_MM)),
            translate_y: Some(Mm(PAGE_HEIGHT_MM - qr_y - QR_IMAGE_MM)),
            dpi: Some(placement_dpi(width_px)),
            ..Default::default()
        },
    );

    sheet.line("Content:", CONTENT_LABEL_PT, CONTENT_X_MM, qr_y + 10.0);
    sheet.wrapped(text, CONTENT_PT, CONTENT_X_MM, qr_y + 20.0, CONTENT_WIDTH_MM);

    let footer = format!(
        "Generated on: {}",
        generated_at.format("%d/%m/%Y, %H:%M:%S")
    );
    sheet.line(&footer, FOOTER_PT, LEFT_MM, qr_y + FOOTER_OFFSET_MM);

    doc.save_to_bytes().map_err(pdf_error)
}

/// DPI at which a raster `width_px` wide prints exactly `QR_IMAGE_MM` wide.
fn placement_dpi(width_px: u32) -> f32 {
    width_px as f32 * 25.4 / QR_IMAGE_MM
}

fn pdf_error(err: printpdf::Error) -> CoreError {
    CoreError::Internal(format!("PDF generation failed: {err}"))
}

/// Text drawing in top-down page coordinates.
struct Sheet<'a> {
    layer: &'a PdfLayerReference,
    font: &'a IndirectFontRef,
}

impl Sheet<'_> {
    fn line(&self, text: &str, size_pt: f32, x_mm: f32, top_mm: f32) {
        self.layer
            .use_text(text, size_pt, Mm(x_mm), Mm(PAGE_HEIGHT_MM - top_mm), self.font);
    }

    /// Draw `text` wrapped to `width_mm`, starting at `top_mm`. Lines past
    /// the bottom margin are skipped.
    fn wrapped(&self, text: &str, size_pt: f32, x_mm: f32, top_mm: f32, width_mm: f32) {
        let line_height_mm = size_pt * LINE_HEIGHT_FACTOR * MM_PER_PT;
        let max_top = PAGE_HEIGHT_MM - BOTTOM_MARGIN_MM;

        for (i, line) in wrap_text(text, chars_per_line(size_pt, width_mm))
            .iter()
            .enumerate()
        {
            let y = top_mm + i as f32 * line_height_mm;
            if y > max_top {
                break;
            }
            self.line(line, size_pt, x_mm, y);
        }
    }
}

/// How many average-width characters fit on one line.
fn chars_per_line(size_pt: f32, width_mm: f32) -> usize {
    let char_mm = size_pt * AVG_CHAR_WIDTH_EM * MM_PER_PT;
    ((width_mm / char_mm).floor() as usize).max(1)
}

/// Greedy word wrap. Explicit newlines are kept; words longer than a line
/// are split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let chars: Vec<char> = word.chars().collect();

            for chunk in chars.chunks(max_chars) {
                let chunk_len = chunk.len();
                let needed = if current_len == 0 { chunk_len } else { current_len + 1 + chunk_len };

                if needed > max_chars && current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                if current_len > 0 {
                    current.push(' ');
                    current_len += 1;
                }
                current.extend(chunk);
                current_len += chunk_len;
            }
        }

        lines.push(current);
    }

    lines
}
