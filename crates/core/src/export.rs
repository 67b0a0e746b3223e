//! Export dispatch: turn a QR payload into a downloadable artifact.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, Utc};

use crate::document::compose_pdf;
use crate::error::CoreError;
use crate::qr::{render_png, render_svg, QrOptions};

/// Supported download formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Svg,
    Pdf,
}

impl ExportFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Svg => "image/svg+xml",
            Self::Pdf => "application/pdf",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
            Self::Pdf => "pdf",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "png" => Ok(Self::Png),
            "svg" => Ok(Self::Svg),
            "pdf" => Ok(Self::Pdf),
            other => Err(CoreError::UnsupportedFormat(format!(
                "'{other}'. Use one of: png, svg, pdf"
            ))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A rendered download. Built per request and never cached.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub buffer: Vec<u8>,
    pub mime_type: &'static str,
    pub filename: String,
}

/// Replace every character outside `[A-Za-z0-9]` with `_` and lower-case.
pub fn slug(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// `qr_<slug>_<unix millis>.<ext>`. Uniqueness relies on the millisecond
/// timestamp only.
pub fn export_filename(title: &str, format: ExportFormat, now: DateTime<Utc>) -> String {
    format!(
        "qr_{}_{}.{}",
        slug(title),
        now.timestamp_millis(),
        format.extension()
    )
}

/// Render `text` in `format` using the current wall clock.
pub fn export_qr(
    text: &str,
    format: ExportFormat,
    title: &str,
    description: Option<&str>,
    opts: &QrOptions,
) -> Result<ExportArtifact, CoreError> {
    export_qr_at(text, format, title, description, opts, Utc::now())
}

/// Render `text` in `format`, stamping the filename and PDF footer with `now`.
pub fn export_qr_at(
    text: &str,
    format: ExportFormat,
    title: &str,
    description: Option<&str>,
    opts: &QrOptions,
    now: DateTime<Utc>,
) -> Result<ExportArtifact, CoreError> {
    let buffer = match format {
        ExportFormat::Png => render_png(text, opts)?,
        ExportFormat::Svg => render_svg(text, opts)?.into_bytes(),
        ExportFormat::Pdf => {
            compose_pdf(text, title, description, opts, now.with_timezone(&Local))?
        }
    };

    Ok(ExportArtifact {
        buffer,
        mime_type: format.mime_type(),
        filename: export_filename(title, format, now),
    })
}
