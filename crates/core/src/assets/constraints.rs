//! Asset storage constraints.
//!
//! The content-type allow-list, the size bound, and the mapping between
//! image formats and the file extensions used for generated asset names.

use super::AssetError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default maximum asset size (5 MiB).
pub const DEFAULT_MAX_ASSET_BYTES: u64 = 5 * 1024 * 1024;

/// Public URL prefix under which stored assets are served and referenced.
pub const ASSET_URL_PREFIX: &str = "/uploads/";

/// Prefix of every generated asset file name.
pub const ASSET_NAME_PREFIX: &str = "image";

// ---------------------------------------------------------------------------
// Image formats
// ---------------------------------------------------------------------------

/// Image formats accepted by the asset store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageFormat {
    /// Every accepted format, in allow-list order.
    pub const ALL: [ImageFormat; 4] = [Self::Jpeg, Self::Png, Self::Gif, Self::Webp];

    /// Parse a MIME content type. Parameters (`; charset=...`) and case are ignored.
    pub fn from_content_type(content_type: &str) -> Result<Self, AssetError> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.content_type() == essence)
            .ok_or_else(|| AssetError::UnsupportedType(content_type.to_string()))
    }

    /// Canonical MIME type.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }

    /// Canonical file extension (without the dot).
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }

    fn accepts_extension(self, ext: &str) -> bool {
        match self {
            Self::Jpeg => matches!(ext, "jpg" | "jpeg"),
            other => other.extension() == ext,
        }
    }

    /// Extension for a generated asset name.
    ///
    /// Keeps the uploader's extension when it agrees with the content type,
    /// otherwise falls back to the canonical one.
    pub fn extension_for(self, original_name: Option<&str>) -> String {
        let original = original_name
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase());
        match original {
            Some(ext) if self.accepts_extension(&ext) => ext,
            _ => self.extension().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Size validation
// ---------------------------------------------------------------------------

/// Reject assets larger than `limit` bytes.
pub fn validate_asset_size(size: u64, limit: u64) -> Result<(), AssetError> {
    if size > limit {
        Err(AssetError::TooLarge { size, limit })
    } else {
        Ok(())
    }
}

/// Human-readable byte formatting.
pub fn format_bytes(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    let b = bytes as f64;
    if b >= GB {
        format!("{:.2} GB", b / GB)
    } else if b >= MB {
        format!("{:.2} MB", b / MB)
    } else if b >= KB {
        format!("{:.2} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn allow_list_accepts_images() {
        assert_eq!(ImageFormat::from_content_type("image/jpeg").unwrap(), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_content_type("image/png").unwrap(), ImageFormat::Png);
        assert_eq!(ImageFormat::from_content_type("image/gif").unwrap(), ImageFormat::Gif);
        assert_eq!(ImageFormat::from_content_type("image/webp").unwrap(), ImageFormat::Webp);
    }

    #[test]
    fn content_type_parameters_and_case_ignored() {
        assert_eq!(
            ImageFormat::from_content_type("Image/PNG; charset=binary").unwrap(),
            ImageFormat::Png
        );
    }

    #[test]
    fn allow_list_rejects_non_images() {
        assert_matches!(
            ImageFormat::from_content_type("application/pdf"),
            Err(AssetError::UnsupportedType(t)) if t == "application/pdf"
        );
        assert!(ImageFormat::from_content_type("image/svg+xml").is_err());
        assert!(ImageFormat::from_content_type("").is_err());
    }

    #[test]
    fn extension_keeps_matching_original() {
        assert_eq!(ImageFormat::Jpeg.extension_for(Some("cat.JPEG")), "jpeg");
        assert_eq!(ImageFormat::Png.extension_for(Some("mug.png")), "png");
    }

    #[test]
    fn extension_falls_back_to_canonical() {
        assert_eq!(ImageFormat::Png.extension_for(Some("mug.exe")), "png");
        assert_eq!(ImageFormat::Webp.extension_for(Some("noext")), "webp");
        assert_eq!(ImageFormat::Jpeg.extension_for(None), "jpg");
    }

    #[test]
    fn size_bound_is_inclusive() {
        assert!(validate_asset_size(DEFAULT_MAX_ASSET_BYTES, DEFAULT_MAX_ASSET_BYTES).is_ok());
        assert_matches!(
            validate_asset_size(6 * 1024 * 1024, DEFAULT_MAX_ASSET_BYTES),
            Err(AssetError::TooLarge { size, limit }) if size == 6 * 1024 * 1024 && limit == DEFAULT_MAX_ASSET_BYTES
        );
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_bytes(1_073_741_824), "1.00 GB");
    }
}
