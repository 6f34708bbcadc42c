//! Resource hint categories.
//!
//! Maps an emitted file name to the `as` token a `<link rel="preload">`
//! needs. Extension matching follows the same groups the MIME table uses.

/// Category of a hinted resource, rendered as the `as` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HintKind {
    Script,
    Style,
    Font,
    Image,
    Document,
}

impl HintKind {
    /// Detect hint kind from an extension (without the leading dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "js" | "mjs" | "cjs" => Some(Self::Script),
            "css" => Some(Self::Style),
            "woff" | "woff2" | "eot" | "ttf" | "otf" => Some(Self::Font),
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "avif" | "svg" | "ico" | "bmp" | "tif"
            | "tiff" => Some(Self::Image),
            "html" | "htm" => Some(Self::Document),
            _ => None,
        }
    }

    /// The `as` attribute token for this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Script => "script",
            Self::Style => "style",
            Self::Font => "font",
            Self::Image => "image",
            Self::Document => "document",
        }
    }

    /// Fonts are always fetched in anonymous CORS mode.
    #[inline]
    pub const fn requires_cors(self) -> bool {
        matches!(self, Self::Font)
    }
}

/// Classify a file name or public path.
///
/// Query strings and fragments are ignored, so `/font.woff2?v=3#x`
/// classifies as a font.
pub fn classify(filename: &str) -> Option<HintKind> {
    let path = strip_suffixes(filename);
    let name = path.rsplit('/').next().unwrap_or(path);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() && !name[1..].contains('.') {
        // dotfile like `.htaccess`
        return None;
    }
    HintKind::from_extension(ext)
}

/// Cut `?query` and `#fragment` suffixes.
fn strip_suffixes(s: &str) -> &str {
    let end = s.find(['?', '#']).unwrap_or(s.len());
    &s[..end]
}
