//! Parsing for numbered section titles.
//!
//! Policy sections are written with their number in the title, the way they
//! read on the page: `"1. Acceptance of Terms"`. Generation needs the parts
//! separately to build stable anchors (`#acceptance-of-terms`) and the
//! on-page table of contents.

/// Result of parsing a section title like `3. Information Sharing and Disclosure`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTitle {
    /// Number prefix if present (e.g. `3`).
    pub number: Option<u32>,
    /// Title text after the prefix, trimmed. The full input when unnumbered.
    pub title: String,
    /// Lowercase, dash-separated anchor derived from `title`.
    pub slug: String,
}

/// Parse a section title following the `N. Title` convention.
///
/// - `"1. Acceptance of Terms"` → number=Some(1), title="Acceptance of Terms"
/// - `"10. Contact Information"` → number=Some(10)
/// - `"Agreement Overview"` → number=None, title="Agreement Overview"
/// - `"2025 Update"` → number=None (no dot after the digits)
pub fn parse_section_title(raw: &str) -> ParsedTitle {
    let raw = raw.trim();
    if let Some((prefix, rest)) = raw.split_once('.')
        && let Ok(num) = prefix.parse::<u32>()
    {
        let title = rest.trim().to_string();
        return ParsedTitle {
            number: Some(num),
            slug: slugify(&title),
            title,
        };
    }
    ParsedTitle {
        number: None,
        title: raw.to_string(),
        slug: slugify(raw),
    }
}

/// Lowercase ASCII alphanumerics joined by single dashes.
///
/// `"Your Rights & Choices"` → `"your-rights-choices"`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for word in text
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        if !slug.is_empty() {
            slug.push('-');
        }
        slug.push_str(&word.to_ascii_lowercase());
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_title() {
        let p = parse_section_title("1. Acceptance of Terms");
        assert_eq!(p.number, Some(1));
        assert_eq!(p.title, "Acceptance of Terms");
        assert_eq!(p.slug, "acceptance-of-terms");
    }

    #[test]
    fn two_digit_number() {
        let p = parse_section_title("10. Contact Information");
        assert_eq!(p.number, Some(10));
        assert_eq!(p.title, "Contact Information");
    }

    #[test]
    fn unnumbered_title() {
        let p = parse_section_title("Agreement Overview");
        assert_eq!(p.number, None);
        assert_eq!(p.title, "Agreement Overview");
        assert_eq!(p.slug, "agreement-overview");
    }

    #[test]
    fn digits_without_dot_are_part_of_title() {
        let p = parse_section_title("2025 Update");
        assert_eq!(p.number, None);
        assert_eq!(p.slug, "2025-update");
    }

    #[test]
    fn dot_inside_title_is_not_a_prefix() {
        let p = parse_section_title("Use of portfolio.com");
        assert_eq!(p.number, None);
        assert_eq!(p.title, "Use of portfolio.com");
        assert_eq!(p.slug, "use-of-portfolio-com");
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let p = parse_section_title("  6.   Links  ");
        assert_eq!(p.number, Some(6));
        assert_eq!(p.title, "Links");
    }

    #[test]
    fn slugify_collapses_punctuation() {
        assert_eq!(slugify("Your Rights & Choices"), "your-rights-choices");
        assert_eq!(slugify("  --UI/UX  "), "ui-ux");
        assert_eq!(slugify(""), "");
    }
}
