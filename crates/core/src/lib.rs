//! Domain logic for QR Vault.
//!
//! Everything here is independent of HTTP and of the database: content
//! validation and classification, QR rendering, PDF composition, export
//! dispatch and the on-disk image store.

pub mod category;
pub mod content;
pub mod document;
pub mod error;
pub mod export;
pub mod image_store;
pub mod qr;
pub mod types;
