//!
//! Whole-string validation.
//!
//! Independent of the per-slot classes of the mask. The filter sees
//! the plain text as it would be after an edit and can veto the edit,
//! even if the mask accepted it.
//!

use crate::MaskError;
use regex::Regex;

/// Filter categories.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum FilterCategory {
    /// Accept everything.
    #[default]
    Any,
    /// ASCII digits.
    DigitsOnly,
    /// Alphabetic chars.
    LettersOnly,
    /// Alphabetic chars and digits.
    AlphaNumeric,
    /// Regular expression. Must match the whole text.
    Custom(Box<str>),
}

/// Compiled filter.
#[allow(variant_size_differences)]
#[derive(Debug, Default, Clone)]
pub enum Filter {
    #[default]
    Any,
    Chars(fn(char) -> bool),
    Pattern(Regex),
}

impl FilterCategory {
    /// Custom pattern category.
    pub fn custom(pattern: impl AsRef<str>) -> Self {
        FilterCategory::Custom(pattern.as_ref().into())
    }
}

impl Filter {
    /// Filter for the category.
    ///
    /// Fails if a custom pattern doesn't compile.
    pub fn new(category: &FilterCategory) -> Result<Filter, MaskError> {
        Ok(match category {
            FilterCategory::Any => Filter::Any,
            FilterCategory::DigitsOnly => Filter::Chars(|c| c.is_ascii_digit()),
            FilterCategory::LettersOnly => Filter::Chars(char::is_alphabetic),
            FilterCategory::AlphaNumeric => Filter::Chars(char::is_alphanumeric),
            FilterCategory::Custom(pattern) => {
                // anchor it, the whole text must match.
                let re = Regex::new(&format!("^(?:{})$", pattern))
                    .map_err(|e| MaskError::InvalidFilter(e.to_string()))?;
                Filter::Pattern(re)
            }
        })
    }

    /// Does the text pass the filter.
    pub fn is_text_valid(&self, text: &str) -> bool {
        match self {
            Filter::Any => true,
            Filter::Chars(test) => text.chars().all(test),
            Filter::Pattern(re) => re.is_match(text),
        }
    }
}

/// Validate the text against the category.
///
/// A custom pattern that doesn't compile rejects everything.
pub fn validate(category: &FilterCategory, text: &str) -> bool {
    match Filter::new(category) {
        Ok(filter) => filter.is_text_valid(text),
        Err(_) => false,
    }
}

#[cfg(test)]
mod test_filter {
    use crate::MaskError;
    use crate::filter::{Filter, FilterCategory, validate};

    #[test]
    fn test_categories() {
        assert!(validate(&FilterCategory::Any, "a1-ö "));
        assert!(validate(&FilterCategory::Any, ""));

        assert!(validate(&FilterCategory::DigitsOnly, "0123"));
        assert!(validate(&FilterCategory::DigitsOnly, ""));
        assert!(!validate(&FilterCategory::DigitsOnly, "12a"));
        assert!(!validate(&FilterCategory::DigitsOnly, "1 2"));

        assert!(validate(&FilterCategory::LettersOnly, "abcÄ"));
        assert!(!validate(&FilterCategory::LettersOnly, "ab1"));

        assert!(validate(&FilterCategory::AlphaNumeric, "ab1"));
        assert!(!validate(&FilterCategory::AlphaNumeric, "ab-1"));
    }

    #[test]
    fn test_custom() {
        let hex = FilterCategory::custom("[0-9a-f]*");
        assert!(validate(&hex, "00ff"));
        assert!(validate(&hex, ""));
        // anchored
        assert!(!validate(&hex, "00fg"));

        let alt = FilterCategory::custom("ab|cd");
        assert!(validate(&alt, "ab"));
        assert!(!validate(&alt, "abcd"));
    }

    #[test]
    fn test_invalid() {
        let broken = FilterCategory::custom("[0-9");
        assert!(matches!(
            Filter::new(&broken),
            Err(MaskError::InvalidFilter(_))
        ));
        assert!(!validate(&broken, ""));
    }
}
