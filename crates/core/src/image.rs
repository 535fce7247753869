//! Image allow-list and stored file naming.

use rand::Rng;
use std::path::Path;
use time::OffsetDateTime;

/// Image formats accepted for upload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageKind {
    /// Match a bare extension or MIME subtype, case-insensitively.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Kind of a file from its name's extension.
    pub fn from_filename(name: &str) -> Option<Self> {
        extension(name).and_then(Self::from_token)
    }

    /// Kind declared by a MIME type such as `image/png`.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        let (top, sub) = essence.split_once('/')?;
        if !top.eq_ignore_ascii_case("image") {
            return None;
        }
        Self::from_token(sub)
    }

    /// Canonical MIME type for responses.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }
}

/// Extension of a file name without the dot, if any.
///
/// Dotfiles such as `.hidden` have no extension.
pub fn extension(name: &str) -> Option<&str> {
    Path::new(name).extension().and_then(|e| e.to_str())
}

/// Whether an uploaded file passes the allow-list.
///
/// Both the extension of the original name and the declared MIME type must be
/// allowed image types. They are checked independently, so a `.jpg` declared
/// as `image/png` is accepted.
pub fn is_accepted(original_name: &str, content_type: Option<&str>) -> bool {
    ImageKind::from_filename(original_name).is_some()
        && content_type.and_then(ImageKind::from_mime).is_some()
}

/// Generate a unique stored name: `<unix-millis>-<random>.<ext>`.
///
/// The extension is copied from the original name with its case preserved.
pub fn generate_filename(original_name: &str) -> String {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let suffix: u32 = rand::rng().random_range(0..1_000_000_000);
    match extension(original_name) {
        Some(ext) => format!("{millis}-{suffix}.{ext}"),
        None => format!("{millis}-{suffix}"),
    }
}

/// Check that a stored name is a single flat file name.
pub fn validate_stored_name(name: &str) -> crate::Result<()> {
    let invalid = name.is_empty()
        || name.starts_with('.')
        || name.contains(['/', '\\', '\0'])
        || name.contains("..");
    if invalid {
        return Err(crate::Error::InvalidFilename(name.to_string()));
    }
    Ok(())
}
