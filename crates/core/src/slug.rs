//! Public share-link slugs.
//!
//! A slug is derived from the wishlist title and made unique with a random
//! hex suffix. Slugs never change after creation.

use rand::Rng;

/// Maximum length of the title-derived part of a slug.
pub const MAX_SLUG_BASE_LEN: usize = 60;

/// Base used when a title contains no usable characters.
const FALLBACK_BASE: &str = "wishlist";

/// Build the title-derived part of a slug.
///
/// Lower-cases the title, keeps ASCII letters and digits, turns runs of
/// whitespace into a single `-` and truncates to [`MAX_SLUG_BASE_LEN`].
///
/// ```
/// use wishly_core::slug::slug_base;
///
/// assert_eq!(slug_base("Ada's 30th Birthday!"), "adas-30th-birthday");
/// assert_eq!(slug_base("   "), "wishlist");
/// ```
pub fn slug_base(title: &str) -> String {
    let words: Vec<String> = title
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(char::is_ascii_alphanumeric)
                .map(|c| c.to_ascii_lowercase())
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect();

    let mut base = words.join("-");
    base.truncate(MAX_SLUG_BASE_LEN);
    let base = base.trim_end_matches('-');

    if base.is_empty() {
        FALLBACK_BASE.to_string()
    } else {
        base.to_string()
    }
}

/// Generate a slug: `{base}-{8 hex digits}`.
pub fn generate_slug(title: &str) -> String {
    let suffix: u32 = rand::rng().random();
    format!("{}-{suffix:08x}", slug_base(title))
}

/// Whether `s` only contains characters a generated slug can contain.
pub fn is_valid_slug(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= MAX_SLUG_BASE_LEN + 9
        && s.chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
