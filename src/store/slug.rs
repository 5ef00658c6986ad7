//! Text-to-slug normalization for directory and file names.
//!
//! Slugs are the on-disk identity of courses, modules, and topics, so
//! the transformation must be deterministic and idempotent. Uniqueness
//! is not handled here; callers check for collisions.

/// Convert free text to a filesystem- and URL-safe slug.
///
/// Lowercases, trims surrounding whitespace, drops everything that is
/// not a word character, whitespace, or hyphen, then collapses each
/// run of whitespace and hyphens into a single hyphen.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let trimmed = lowered.trim();

    let kept: String = trimmed
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace() || *c == '-')
        .collect();

    let mut slug = String::with_capacity(kept.len());
    let mut in_separator = false;
    for c in kept.chars() {
        if c.is_whitespace() || c == '-' {
            if !in_separator {
                slug.push('-');
                in_separator = true;
            }
        } else {
            slug.push(c);
            in_separator = false;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_slug() {
        assert_eq!(slugify("Introduction to Rust"), "introduction-to-rust");
        assert_eq!(slugify("CS101-Algorithms"), "cs101-algorithms");
    }

    #[test]
    fn test_punctuation_stripped() {
        assert_eq!(slugify("  Intro: Algorithms!  "), "intro-algorithms");
        assert_eq!(slugify("What's New?"), "whats-new");
    }

    #[test]
    fn test_separator_runs_collapse() {
        assert_eq!(slugify("a  -  b"), "a-b");
        assert_eq!(slugify("a---b"), "a-b");
        assert_eq!(slugify("a \t b"), "a-b");
    }

    #[test]
    fn test_underscore_is_word_char() {
        assert_eq!(slugify("snake_case title"), "snake_case-title");
    }

    #[test]
    fn test_idempotent() {
        for input in ["  Intro: Algorithms!  ", "Graphs & Trees", "a  -  b", "CS101"] {
            let once = slugify(input);
            assert_eq!(slugify(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_empty_and_symbol_only() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("   "), "");
    }
}
