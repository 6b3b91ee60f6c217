//! Slug and file-name helpers shared by the store and the attachment rules.
//!
//! ## Slugs
//!
//! Categories and layout profiles get a URL slug derived from their name when
//! the admin leaves it blank. The conversion is plain ASCII:
//!
//! - `"Modern SaaS"` → `"modern-saas"`
//! - `"Data  Lab -- 2"` → `"data-lab-2"`
//! - `"timeline_pro"` → `"timeline_pro"` (underscores are word characters)
//! - `"Café Noir"` → `"caf-noir"` (non-ASCII is dropped, not transliterated)

/// Derive a URL slug from a display name.
///
/// Keeps ASCII alphanumerics, underscores and hyphens, lowercases everything,
/// and collapses runs of whitespace/hyphens into a single `-`. Leading and
/// trailing separators are trimmed.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else if c == '-' || c.is_whitespace() {
            pending_dash = true;
        }
    }
    slug
}

/// Lowercase extension of a stored file name, without the dot.
///
/// Returns an empty string when the name has no extension.
pub fn file_ext(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((_, ext)) if !ext.contains('/') => ext.to_ascii_lowercase(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_from_two_words() {
        assert_eq!(slugify("Modern SaaS"), "modern-saas");
    }

    #[test]
    fn slug_collapses_separator_runs() {
        assert_eq!(slugify("Data  Lab -- 2"), "data-lab-2");
    }

    #[test]
    fn slug_keeps_underscores() {
        assert_eq!(slugify("timeline_pro"), "timeline_pro");
    }

    #[test]
    fn slug_drops_punctuation_and_non_ascii() {
        assert_eq!(slugify("Café Noir!"), "caf-noir");
        assert_eq!(slugify("R&D: Projects"), "rd-projects");
    }

    #[test]
    fn slug_trims_edges() {
        assert_eq!(slugify("  -LP Cat-  "), "lp-cat");
    }

    #[test]
    fn slug_of_empty_is_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn ext_is_lowercased() {
        assert_eq!(file_ext("resumes/CV.PDF"), "pdf");
        assert_eq!(file_ext("notebook.ipynb"), "ipynb");
    }

    #[test]
    fn ext_missing() {
        assert_eq!(file_ext("README"), "");
        assert_eq!(file_ext("some.dir/README"), "");
    }

    #[test]
    fn ext_takes_last_dot() {
        assert_eq!(file_ext("archive.tar.gz"), "gz");
    }
}
