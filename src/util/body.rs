//! Message body classification: image reference or literal text.

use std::sync::LazyLock;

use regex_lite::Regex;

// Case-insensitive image extension at the very end, optionally followed by a query string.
static IMAGE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(gif|jpe?g|tiff?|png|webp|bmp)(\?.*)?$").expect("image pattern compiles"));

/// How a post body should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Body<'a> {
    /// Render as an image whose source is the body itself.
    Image(&'a str),
    /// Render verbatim.
    Text(&'a str),
}

#[must_use]
pub fn classify(body: &str) -> Body<'_> {
    if IMAGE_URL.is_match(body) { Body::Image(body) } else { Body::Text(body) }
}

#[cfg(test)]
#[path = "body_test.rs"]
mod tests;
