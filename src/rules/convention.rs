//! Built-in naming conventions
//!
//! Each convention is an exact ASCII character class; no locale or Unicode
//! case folding is applied to candidates.

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

/// A built-in naming convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Convention {
    Lowercase,
    Uppercase,
    CamelCase,
    PascalCase,
    SnakeCase,
    ScreamingSnakeCase,
    KebabCase,
    PointCase,
}

lazy_static! {
    // Indexed by `Convention as usize`.
    static ref CONVENTION_REGEXES: Vec<Regex> = Convention::ALL
        .iter()
        .map(|c| {
            Regex::new(c.pattern()).expect("built-in convention patterns are valid regexes")
        })
        .collect();
}

impl Convention {
    /// Every convention, in declaration order
    pub const ALL: [Convention; 8] = [
        Self::Lowercase,
        Self::Uppercase,
        Self::CamelCase,
        Self::PascalCase,
        Self::SnakeCase,
        Self::ScreamingSnakeCase,
        Self::KebabCase,
        Self::PointCase,
    ];

    /// Look up a convention by its configuration name (case-sensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }

    /// Name used in configuration files and messages
    pub fn name(self) -> &'static str {
        match self {
            Self::Lowercase => "lowercase",
            Self::Uppercase => "UPPERCASE",
            Self::CamelCase => "camelCase",
            Self::PascalCase => "PascalCase",
            Self::SnakeCase => "snake_case",
            Self::ScreamingSnakeCase => "SCREAMING_SNAKE_CASE",
            Self::KebabCase => "kebab-case",
            Self::PointCase => "point.case",
        }
    }

    /// Anchored character class accepted by this convention
    pub fn pattern(self) -> &'static str {
        match self {
            Self::Lowercase => r"^[a-z0-9]+$",
            Self::Uppercase => r"^[A-Z0-9]+$",
            Self::CamelCase => r"^[a-z][a-zA-Z0-9]*$",
            Self::PascalCase => r"^[A-Z][a-zA-Z0-9]*$",
            Self::SnakeCase => r"^[a-z0-9]+(_[a-z0-9]+)*$",
            Self::ScreamingSnakeCase => r"^[A-Z0-9]+(_[A-Z0-9]+)*$",
            Self::KebabCase => r"^[a-z0-9]+(-[a-z0-9]+)*$",
            Self::PointCase => r"^[a-z0-9]+(\.[a-z0-9]+)*$",
        }
    }

    /// Plain-language shape of accepted names
    pub fn summary(self) -> &'static str {
        match self {
            Self::Lowercase => "lower-case letters and digits only",
            Self::Uppercase => "upper-case letters and digits only",
            Self::CamelCase => "starts lower-case, letters and digits, no separators",
            Self::PascalCase => "starts upper-case, letters and digits, no separators",
            Self::SnakeCase => "lower-case words joined by '_'",
            Self::ScreamingSnakeCase => "upper-case words joined by '_'",
            Self::KebabCase => "lower-case words joined by '-'",
            Self::PointCase => "lower-case words joined by '.'",
        }
    }

    /// Whether `candidate` has this convention's shape
    pub fn matches(self, candidate: &str) -> bool {
        CONVENTION_REGEXES[self as usize].is_match(candidate)
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Convention::Lowercase, "readme", true)]
    #[case(Convention::Lowercase, "v2", true)]
    #[case(Convention::Lowercase, "README", false)]
    #[case(Convention::Lowercase, "my-file", false)]
    #[case(Convention::Uppercase, "README", true)]
    #[case(Convention::Uppercase, "Readme", false)]
    #[case(Convention::CamelCase, "myFile", true)]
    #[case(Convention::CamelCase, "file2Name", true)]
    #[case(Convention::CamelCase, "my_file", false)]
    #[case(Convention::CamelCase, "MyFile", false)]
    #[case(Convention::PascalCase, "MyFile", true)]
    #[case(Convention::PascalCase, "myFile", false)]
    #[case(Convention::PascalCase, "My-File", false)]
    #[case(Convention::SnakeCase, "my_file", true)]
    #[case(Convention::SnakeCase, "file", true)]
    #[case(Convention::SnakeCase, "MyFile", false)]
    #[case(Convention::SnakeCase, "my__file", false)]
    #[case(Convention::SnakeCase, "_private", false)]
    #[case(Convention::ScreamingSnakeCase, "MAX_SIZE", true)]
    #[case(Convention::ScreamingSnakeCase, "Max_Size", false)]
    #[case(Convention::KebabCase, "my-file", true)]
    #[case(Convention::KebabCase, "my-file-2", true)]
    #[case(Convention::KebabCase, "my_file", false)]
    #[case(Convention::KebabCase, "-leading", false)]
    #[case(Convention::PointCase, "my.file", true)]
    #[case(Convention::PointCase, "my.File", false)]
    fn test_convention_examples(
        #[case] convention: Convention,
        #[case] candidate: &str,
        #[case] accepted: bool,
    ) {
        assert_eq!(convention.matches(candidate), accepted, "{convention} vs {candidate:?}");
    }

    #[test]
    fn test_empty_name_matches_nothing() {
        for convention in Convention::ALL {
            assert!(!convention.matches(""), "{convention} accepted an empty name");
        }
    }

    #[test]
    fn test_non_ascii_is_rejected() {
        assert!(!Convention::Lowercase.matches("café"));
        assert!(!Convention::CamelCase.matches("straße"));
    }

    #[test]
    fn test_names_round_trip() {
        for convention in Convention::ALL {
            assert_eq!(Convention::from_name(convention.name()), Some(convention));
        }
        assert_eq!(Convention::from_name("camelcase"), None);
    }
}
