//! Decoded image assets and resize results.

/// Image container format the pipeline can decode and re-encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// JPEG, the fallback when the decoder reports nothing usable.
    Jpeg,
    /// PNG.
    Png,
    /// GIF, the only animated family supported.
    Gif,
    /// WebP (static only).
    WebP,
}

impl ImageKind {
    /// Filename extension used for delivered output.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::WebP => "webp",
        }
    }

    /// MIME type for the attachment upload.
    #[must_use]
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::WebP => "image/webp",
        }
    }
}

/// A decoded upload, probed for format and animation before resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageAsset {
    /// Container format, falling back to JPEG when undetectable.
    pub kind: ImageKind,
    /// Whether the asset goes through the animated (multi-frame) path.
    pub is_animated: bool,
    /// Decoded frame count; 1 for static assets.
    pub frame_count: usize,
}

impl ImageAsset {
    /// A static single-frame asset of the given kind.
    #[must_use]
    pub const fn still(kind: ImageKind) -> Self {
        Self {
            kind,
            is_animated: false,
            frame_count: 1,
        }
    }

    /// An animated asset with the given retained frame count.
    #[must_use]
    pub const fn animated(frame_count: usize) -> Self {
        Self {
            kind: ImageKind::Gif,
            is_animated: true,
            frame_count,
        }
    }
}

/// The re-encoded result delivered back to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeOutcome {
    /// Encoded output bytes.
    pub bytes: Vec<u8>,
    /// Format of the encoded output.
    pub format: ImageKind,
    /// Delivery filename, always `resized.<ext>`.
    pub filename: String,
}

impl ResizeOutcome {
    /// Builds an outcome, deriving the filename from the format.
    #[must_use]
    pub fn new(bytes: Vec<u8>, format: ImageKind) -> Self {
        Self {
            bytes,
            format,
            filename: format!("resized.{}", format.extension()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_filename_follows_format() {
        let outcome = ResizeOutcome::new(vec![0xff], ImageKind::Jpeg);
        assert_eq!(outcome.filename, "resized.jpg");

        let outcome = ResizeOutcome::new(vec![0x47], ImageKind::Gif);
        assert_eq!(outcome.filename, "resized.gif");
    }

    #[test]
    fn test_asset_constructors() {
        assert_eq!(ImageAsset::still(ImageKind::Png).frame_count, 1);
        let anim = ImageAsset::animated(12);
        assert!(anim.is_animated);
        assert_eq!(anim.kind, ImageKind::Gif);
    }
}
