pub mod categories;
pub mod content;
pub mod export;
pub mod qr_codes;
