//! On-disk storage for generated QR rasters.
//!
//! Files live in `<public_root>/qr-images/` and are referenced from the
//! database by their public path (`/qr-images/<filename>`). The store owns the
//! bytes only; rows are owned by the repository layer.

use std::path::{Component, Path, PathBuf};

use chrono::Utc;
use rand::distr::{Alphanumeric, SampleString};

use crate::error::CoreError;
use crate::qr::{render_png, QrOptions};

/// Directory under the public root that holds QR rasters.
pub const IMAGE_DIR: &str = "qr-images";

/// Length of the random filename suffix.
const SUFFIX_LEN: usize = 6;

/// Result of a best-effort delete. Deleting never fails for the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Removed,
    /// Nothing was removed; `reason` has the diagnostic that was logged.
    Skipped { reason: String },
}

/// Filesystem-backed store for QR rasters.
#[derive(Debug, Clone)]
pub struct ImageStore {
    public_root: PathBuf,
}

impl ImageStore {
    pub fn new(public_root: impl Into<PathBuf>) -> Self {
        Self {
            public_root: public_root.into(),
        }
    }

    /// Root directory that public paths are resolved against.
    pub fn public_root(&self) -> &Path {
        &self.public_root
    }

    /// Absolute directory that holds the rasters.
    pub fn image_dir(&self) -> PathBuf {
        self.public_root.join(IMAGE_DIR)
    }

    /// Render `text` as PNG, write it as `filename` and return its public path.
    ///
    /// The image directory is created on first use.
    pub async fn save(
        &self,
        text: &str,
        filename: &str,
        opts: &QrOptions,
    ) -> Result<String, CoreError> {
        if !is_plain_filename(filename) {
            return Err(CoreError::Validation(format!(
                "Invalid image filename '{filename}'"
            )));
        }

        let png = render_png(text, opts)?;

        let dir = self.image_dir();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to create {}: {e}", dir.display())))?;

        let path = dir.join(filename);
        tokio::fs::write(&path, &png)
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to write {}: {e}", path.display())))?;

        tracing::debug!(path = %path.display(), bytes = png.len(), "QR image written");

        Ok(format!("/{IMAGE_DIR}/{filename}"))
    }

    /// Remove the file behind a public path.
    ///
    /// Missing files, I/O errors and paths outside the public root are logged
    /// and reported as [`DeleteOutcome::Skipped`] so that a stale image never
    /// blocks deleting its row.
    pub async fn delete(&self, public_path: &str) -> DeleteOutcome {
        let Some(path) = self.resolve(public_path) else {
            let reason = format!("Refusing to delete path outside public root: {public_path}");
            tracing::warn!(public_path, "{reason}");
            return DeleteOutcome::Skipped { reason };
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(public_path, "QR image removed");
                DeleteOutcome::Removed
            }
            Err(e) => {
                let reason = format!("Failed to delete {}: {e}", path.display());
                tracing::warn!(public_path, error = %e, "QR image not removed");
                DeleteOutcome::Skipped { reason }
            }
        }
    }

    /// Map a public path such as `/qr-images/x.png` to a filesystem path.
    ///
    /// Returns `None` for empty paths and for anything that could escape the
    /// public root (`..`, absolute prefixes).
    pub fn resolve(&self, public_path: &str) -> Option<PathBuf> {
        let relative = Path::new(public_path.trim_start_matches('/'));
        if relative.as_os_str().is_empty() {
            return None;
        }
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.public_root.join(relative))
    }
}

/// `<prefix>_<unix millis>_<6 random alphanumerics>.png`.
pub fn unique_filename(prefix: &str) -> String {
    let suffix = Alphanumeric
        .sample_string(&mut rand::rng(), SUFFIX_LEN)
        .to_lowercase();
    format!("{prefix}_{}_{suffix}.png", Utc::now().timestamp_millis())
}

fn is_plain_filename(filename: &str) -> bool {
    let mut components = Path::new(filename).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
