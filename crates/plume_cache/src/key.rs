//! Cache key model for decoded SVG payloads
//!
//! A [`CacheKey`] is the structural identity of one decode result: where the
//! SVG data came from, the theme values that were baked into the decode, and
//! which color substitution pass (if any) ran during it. Two keys compare
//! equal exactly when the decoder would produce identical bytes for both.

use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::sync::Arc;

/// RGBA color with components in `0.0..=1.0`
///
/// Equality and hashing are bit-exact (`f32::to_bits`), so a color used in a
/// cache key never violates the `Eq`/`Hash` contract the way raw float
/// comparison would.
#[derive(Debug, Clone, Copy)]
pub struct Color {
    /// Red component
    pub r: f32,
    /// Green component
    pub g: f32,
    /// Blue component
    pub b: f32,
    /// Alpha component
    pub a: f32,
}

impl Color {
    /// Create a color from RGBA components
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from RGB components
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        self.r.to_bits() == other.r.to_bits()
            && self.g.to_bits() == other.g.to_bits()
            && self.b.to_bits() == other.b.to_bits()
            && self.a.to_bits() == other.a.to_bits()
    }
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.r.to_bits().hash(state);
        self.g.to_bits().hash(state);
        self.b.to_bits().hash(state);
        self.a.to_bits().hash(state);
    }
}

/// Theme values resolved into an SVG at decode time
///
/// The decoder substitutes `currentColor` references and resolves `em`/`ex`
/// units while compiling, so these values are part of the identity of the
/// decoded bytes: the same markup decoded under two themes is two cache
/// entries.
#[derive(Debug, Clone, Copy)]
pub struct SvgTheme {
    /// Color substituted for `currentColor` references, if any
    pub current_color: Option<Color>,
    /// Font size in logical pixels, used to resolve `em` units
    pub font_size: f32,
    /// Height of the lowercase `x`, used to resolve `ex` units
    pub x_height: f32,
}

impl SvgTheme {
    /// Create a theme with the given font size and an x-height of half of it
    pub fn new(font_size: f32) -> Self {
        Self {
            current_color: None,
            font_size,
            x_height: font_size / 2.0,
        }
    }

    /// Set the color substituted for `currentColor`
    pub fn with_current_color(mut self, color: Color) -> Self {
        self.current_color = Some(color);
        self
    }

    /// Override the x-height used to resolve `ex` units
    pub fn with_x_height(mut self, x_height: f32) -> Self {
        self.x_height = x_height;
        self
    }
}

impl Default for SvgTheme {
    fn default() -> Self {
        Self::new(14.0)
    }
}

impl PartialEq for SvgTheme {
    fn eq(&self, other: &Self) -> bool {
        self.current_color == other.current_color
            && self.font_size.to_bits() == other.font_size.to_bits()
            && self.x_height.to_bits() == other.x_height.to_bits()
    }
}

impl Eq for SvgTheme {}

impl Hash for SvgTheme {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.current_color.hash(state);
        self.font_size.to_bits().hash(state);
        self.x_height.to_bits().hash(state);
    }
}

/// Stable identity of a color substitution pass applied during decoding
///
/// Callers that decode through a color mapper derive a fingerprint for it and
/// carry that fingerprint in the key, rather than relying on the mapper's
/// address. Two mappers with the same fingerprint must perform the same
/// substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorMapperId(pub u64);

/// Where the SVG data for a decode came from
///
/// Identity is structural: two `File` sources with the same path are the same
/// source, regardless of which widget asked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SvgSource {
    /// Inline SVG markup
    Markup(Arc<str>),
    /// Raw SVG bytes already in memory
    Bytes(Arc<[u8]>),
    /// A file on disk
    File(PathBuf),
    /// An asset resolved through the host toolkit's bundle
    Asset {
        /// Path of the asset within the bundle
        path: String,
        /// Bundle to resolve against, or the ambient default bundle
        bundle: Option<String>,
        /// Package the asset ships in, for packaged assets
        package: Option<String>,
    },
    /// A resource fetched over HTTP
    Network {
        /// Request URL
        url: String,
        /// Request headers sent with the fetch
        headers: Vec<(String, String)>,
    },
}

impl SvgSource {
    /// Source backed by inline markup
    pub fn markup(markup: impl Into<Arc<str>>) -> Self {
        Self::Markup(markup.into())
    }

    /// Source backed by in-memory bytes
    pub fn bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::Bytes(bytes.into())
    }

    /// Source backed by a file on disk
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    /// Source backed by a bundled asset in the default bundle
    pub fn asset(path: impl Into<String>) -> Self {
        Self::Asset {
            path: path.into(),
            bundle: None,
            package: None,
        }
    }

    /// Source backed by a network resource with no extra headers
    pub fn network(url: impl Into<String>) -> Self {
        Self::Network {
            url: url.into(),
            headers: Vec::new(),
        }
    }
}

/// Identity of one decoded payload in the cache
///
/// Combines the data source with the decode-time configuration
/// ([`SvgTheme`], optional [`ColorMapperId`]). The cache never looks inside a
/// key; it only compares and hashes them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    source: SvgSource,
    theme: SvgTheme,
    color_mapper: Option<ColorMapperId>,
}

impl CacheKey {
    /// Create a key for a source decoded under a theme, with no color mapper
    pub fn new(source: SvgSource, theme: SvgTheme) -> Self {
        Self {
            source,
            theme,
            color_mapper: None,
        }
    }

    /// Attach the identity of the color mapper used for the decode
    pub fn with_color_mapper(mut self, mapper: ColorMapperId) -> Self {
        self.color_mapper = Some(mapper);
        self
    }

    /// The data source this key addresses
    pub fn source(&self) -> &SvgSource {
        &self.source
    }

    /// The theme baked into the decode
    pub fn theme(&self) -> &SvgTheme {
        &self.theme
    }

    /// The color mapper identity, if a mapper ran during the decode
    pub fn color_mapper(&self) -> Option<ColorMapperId> {
        self.color_mapper
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(key: &CacheKey) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_structural_equality() {
        let a = CacheKey::new(SvgSource::markup("<svg/>"), SvgTheme::default());
        let b = CacheKey::new(SvgSource::markup("<svg/>"), SvgTheme::default());
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_theme_changes_identity() {
        let source = SvgSource::file("icons/home.svg");
        let plain = CacheKey::new(source.clone(), SvgTheme::default());
        let tinted = CacheKey::new(
            source,
            SvgTheme::default().with_current_color(Color::rgb(1.0, 0.0, 0.0)),
        );
        assert_ne!(plain, tinted);
    }

    #[test]
    fn test_color_mapper_changes_identity() {
        let key = CacheKey::new(SvgSource::asset("icons/home.svg"), SvgTheme::default());
        let mapped = key.clone().with_color_mapper(ColorMapperId(7));
        assert_ne!(key, mapped);
        assert_eq!(mapped.color_mapper(), Some(ColorMapperId(7)));
    }

    #[test]
    fn test_distinct_sources_are_distinct_keys() {
        let theme = SvgTheme::default();
        let markup = CacheKey::new(SvgSource::markup("icons/home.svg"), theme);
        let file = CacheKey::new(SvgSource::file("icons/home.svg"), theme);
        let asset = CacheKey::new(SvgSource::asset("icons/home.svg"), theme);
        assert_ne!(markup, file);
        assert_ne!(file, asset);
    }

    #[test]
    fn test_default_theme_values() {
        let theme = SvgTheme::default();
        assert_eq!(theme.font_size, 14.0);
        assert_eq!(theme.x_height, 7.0);
        assert!(theme.current_color.is_none());
    }

    #[test]
    fn test_negative_zero_font_size_is_distinct() {
        // Bit-exact hashing: 0.0 and -0.0 are different identities, which keeps
        // Eq and Hash consistent with each other.
        let a = SvgTheme::new(0.0);
        let b = SvgTheme::new(-0.0);
        assert_ne!(a, b);
    }
}
