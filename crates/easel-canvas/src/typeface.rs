use std::fmt;
use std::sync::Arc;

use rusttype::Font;

/// A font resource, possibly the unavailable sentinel.
///
/// Text drawing stays total: backends fall back to the built-in bitmap font
/// when the typeface is unavailable, and loaders return the sentinel instead
/// of failing.
#[derive(Clone)]
pub struct Typeface {
    font: Option<Arc<Font<'static>>>,
    name: String,
}

impl Typeface {
    /// The sentinel typeface: reports unavailable and an empty name.
    pub fn unavailable() -> Self {
        Self {
            font: None,
            name: String::new(),
        }
    }

    /// Parses font data; `None` if the bytes are not a valid font.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Option<Self> {
        let font = Font::try_from_vec(bytes)?;
        Some(Self {
            font: Some(Arc::new(font)),
            name: name.into(),
        })
    }

    pub fn is_available(&self) -> bool {
        self.font.is_some()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn font(&self) -> Option<&Font<'static>> {
        self.font.as_deref()
    }
}

impl PartialEq for Typeface {
    /// Two typefaces are equal when they share the same font data (or are
    /// both the unavailable sentinel) and carry the same name.
    fn eq(&self, other: &Self) -> bool {
        let same_font = match (&self.font, &other.font) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_font && self.name == other.name
    }
}

impl Default for Typeface {
    fn default() -> Self {
        Self::unavailable()
    }
}

impl fmt::Debug for Typeface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Typeface")
            .field("name", &self.name)
            .field("available", &self.is_available())
            .finish()
    }
}
