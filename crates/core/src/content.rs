//! Validation and classification of text destined for a QR symbol.
//!
//! Both are pure functions over the raw content string. Classification is
//! driven by a ranked rule table: inputs routinely match more than one rule
//! (a bare `user@example.com` also looks like a schemeless URL), so the
//! first matching rule decides.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::CoreError;
use crate::qr::EcLevel;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum number of characters accepted for QR content.
pub const MAX_CONTENT_CHARS: usize = 2953;

/// Maximum number of characters accepted for a QR code title.
pub const MAX_TITLE_CHARS: usize = 255;

/// Minimum digit count for a string to be classified as a phone number.
const MIN_PHONE_DIGITS: usize = 7;

static PHONE_SHAPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[\d\s\-()]+$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Reasons content can be rejected before encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    #[error("Content must not be empty")]
    Empty,

    #[error("Content is too long (maximum {MAX_CONTENT_CHARS} characters)")]
    TooLong,

    #[error("Content contains invalid characters")]
    InvalidChar,
}

impl ContentError {
    /// Stable machine-readable code.
    pub fn code(self) -> &'static str {
        match self {
            Self::Empty => "EMPTY",
            Self::TooLong => "TOO_LONG",
            Self::InvalidChar => "INVALID_CHAR",
        }
    }
}

impl From<ContentError> for CoreError {
    fn from(err: ContentError) -> Self {
        CoreError::Validation(err.to_string())
    }
}

/// Check that `content` can be stored and encoded.
///
/// Rules are applied in order: blank, length (in characters, not bytes),
/// then embedded NUL.
pub fn validate_content(content: &str) -> Result<(), ContentError> {
    if content.trim().is_empty() {
        return Err(ContentError::Empty);
    }
    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err(ContentError::TooLong);
    }
    if content.contains('\0') {
        return Err(ContentError::InvalidChar);
    }
    Ok(())
}

/// Check that a QR code title is present and within the column limit.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title is required".into()));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(CoreError::Validation(format!(
            "Title must not exceed {MAX_TITLE_CHARS} characters"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Detected kind of QR payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContentKind {
    #[serde(rename = "URL")]
    Url,
    Email,
    Phone,
    WiFi,
    #[serde(rename = "SMS")]
    Sms,
    Location,
    Contact,
    Text,
}

impl ContentKind {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Url => "URL",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::WiFi => "WiFi",
            Self::Sms => "SMS",
            Self::Location => "Location",
            Self::Contact => "Contact",
            Self::Text => "Text",
        }
    }
}

type Rule = (fn(&str) -> bool, ContentKind);

/// Classification rules, most specific first. Order is significant.
const RULES: &[Rule] = &[
    (has_web_scheme, ContentKind::Url),
    (is_mailto, ContentKind::Email),
    (is_tel, ContentKind::Phone),
    (is_wifi, ContentKind::WiFi),
    (is_sms, ContentKind::Sms),
    (is_geo, ContentKind::Location),
    (is_vcard, ContentKind::Contact),
    (looks_like_email, ContentKind::Email),
    (looks_like_phone_number, ContentKind::Phone),
    (looks_like_domain, ContentKind::Url),
];

/// Classify `content` by its shape. Falls back to [`ContentKind::Text`].
pub fn classify_content(content: &str) -> ContentKind {
    let normalized = content.trim().to_lowercase();
    RULES
        .iter()
        .find(|(matches, _)| matches(&normalized))
        .map(|&(_, kind)| kind)
        .unwrap_or(ContentKind::Text)
}

fn has_web_scheme(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

fn is_mailto(s: &str) -> bool {
    s.starts_with("mailto:")
}

fn is_tel(s: &str) -> bool {
    s.starts_with("tel:")
}

fn is_wifi(s: &str) -> bool {
    s.starts_with("wifi:")
}

fn is_sms(s: &str) -> bool {
    s.starts_with("sms:")
}

fn is_geo(s: &str) -> bool {
    s.starts_with("geo:")
}

fn is_vcard(s: &str) -> bool {
    s.starts_with("begin:vcard") || s.starts_with("vcard:")
}

fn looks_like_email(s: &str) -> bool {
    s.contains('@') && s.contains('.') && !s.contains(' ')
}

fn looks_like_domain(s: &str) -> bool {
    s.contains('.') && !s.contains(' ') && s.chars().count() > 4
}

fn looks_like_phone_number(s: &str) -> bool {
    PHONE_SHAPE_RE.is_match(s)
        && s.chars().filter(char::is_ascii_digit).count() >= MIN_PHONE_DIGITS
}

// ---------------------------------------------------------------------------
// Size estimate
// ---------------------------------------------------------------------------

/// Rough density bucket for a symbol, used to warn about hard-to-scan codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeEstimate {
    Small,
    Medium,
    Large,
    VeryLarge,
}

/// Estimate how dense the symbol for `content` will be at `level`.
///
/// Higher error-correction levels leave less room for data, so the content
/// length is scaled up before bucketing.
pub fn estimate_size(content: &str, level: EcLevel) -> SizeEstimate {
    let multiplier = match level {
        EcLevel::L => 1.0,
        EcLevel::M => 0.85,
        EcLevel::Q => 0.7,
        EcLevel::H => 0.6,
    };
    let adjusted = content.chars().count() as f64 / multiplier;

    if adjusted < 100.0 {
        SizeEstimate::Small
    } else if adjusted < 500.0 {
        SizeEstimate::Medium
    } else if adjusted < 1500.0 {
        SizeEstimate::Large
    } else {
        SizeEstimate::VeryLarge
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- validate_content --

    #[test]
    fn plain_content_is_valid() {
        assert_eq!(validate_content("hello"), Ok(()));
    }

    #[test]
    fn empty_and_blank_content_rejected() {
        assert_eq!(validate_content(""), Err(ContentError::Empty));
        assert_eq!(validate_content("   \n\t"), Err(ContentError::Empty));
    }

    #[test]
    fn content_at_limit_is_valid() {
        let content = "a".repeat(MAX_CONTENT_CHARS);
        assert_eq!(validate_content(&content), Ok(()));
    }

    #[test]
    fn content_over_limit_rejected() {
        let content = "a".repeat(MAX_CONTENT_CHARS + 1);
        assert_eq!(validate_content(&content), Err(ContentError::TooLong));
    }

    #[test]
    fn limit_counts_characters_not_bytes() {
        // 2953 two-byte characters is still within the limit.
        let content = "é".repeat(MAX_CONTENT_CHARS);
        assert_eq!(validate_content(&content), Ok(()));
    }

    #[test]
    fn nul_byte_rejected() {
        assert_eq!(validate_content("abc\0def"), Err(ContentError::InvalidChar));
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(ContentError::Empty.code(), "EMPTY");
        assert_eq!(ContentError::TooLong.code(), "TOO_LONG");
        assert_eq!(ContentError::InvalidChar.code(), "INVALID_CHAR");
    }

    #[test]
    fn content_error_converts_to_validation() {
        let err: CoreError = ContentError::TooLong.into();
        assert!(matches!(err, CoreError::Validation(msg) if msg.contains("2953")));
    }

    // -- validate_title --

    #[test]
    fn blank_title_rejected() {
        assert!(validate_title("  ").is_err());
    }

    #[test]
    fn long_title_rejected() {
        assert!(validate_title(&"t".repeat(MAX_TITLE_CHARS + 1)).is_err());
        assert!(validate_title(&"t".repeat(MAX_TITLE_CHARS)).is_ok());
    }

    // -- classify_content --

    #[test]
    fn classifies_known_examples() {
        assert_eq!(classify_content("https://example.com"), ContentKind::Url);
        assert_eq!(classify_content("mailto:a@b.com"), ContentKind::Email);
        assert_eq!(classify_content("+1 555-123-4567"), ContentKind::Phone);
        assert_eq!(classify_content("plain text here"), ContentKind::Text);
    }

    #[test]
    fn scheme_prefixes_are_case_insensitive() {
        assert_eq!(classify_content("HTTP://EXAMPLE.COM"), ContentKind::Url);
        assert_eq!(classify_content("  TEL:+34600000000 "), ContentKind::Phone);
        assert_eq!(classify_content("WIFI:T:WPA;S:net;P:pw;;"), ContentKind::WiFi);
        assert_eq!(classify_content("SMSTO"), ContentKind::Text);
        assert_eq!(classify_content("sms:+123456789"), ContentKind::Sms);
        assert_eq!(classify_content("geo:40.4,-3.7"), ContentKind::Location);
        assert_eq!(classify_content("BEGIN:VCARD\nFN:Ana\nEND:VCARD"), ContentKind::Contact);
        assert_eq!(classify_content("vcard:ana"), ContentKind::Contact);
    }

    #[test]
    fn bare_email_wins_over_schemeless_url() {
        assert_eq!(classify_content("user@example.com"), ContentKind::Email);
    }

    #[test]
    fn bare_domain_is_url() {
        assert_eq!(classify_content("example.com"), ContentKind::Url);
    }

    #[test]
    fn short_dotted_string_is_text() {
        // Length must exceed 4 for the schemeless URL rule.
        assert_eq!(classify_content("a.bc"), ContentKind::Text);
    }

    #[test]
    fn too_few_digits_is_not_phone() {
        assert_eq!(classify_content("123 456"), ContentKind::Text);
        assert_eq!(classify_content("(012) 345-6789"), ContentKind::Phone);
    }

    #[test]
    fn digits_with_dot_fall_through_to_url() {
        // Not phone-shaped because of the dot, and longer than 4.
        assert_eq!(classify_content("3.14159"), ContentKind::Url);
    }

    // -- estimate_size --

    #[test]
    fn size_buckets_follow_length() {
        assert_eq!(estimate_size("short", EcLevel::M), SizeEstimate::Small);
        assert_eq!(estimate_size(&"a".repeat(200), EcLevel::L), SizeEstimate::Medium);
        assert_eq!(estimate_size(&"a".repeat(1000), EcLevel::L), SizeEstimate::Large);
        assert_eq!(estimate_size(&"a".repeat(2000), EcLevel::L), SizeEstimate::VeryLarge);
    }

    #[test]
    fn higher_level_pushes_into_larger_bucket() {
        let content = "a".repeat(90);
        assert_eq!(estimate_size(&content, EcLevel::L), SizeEstimate::Small);
        assert_eq!(estimate_size(&content, EcLevel::H), SizeEstimate::Medium);
    }
}
