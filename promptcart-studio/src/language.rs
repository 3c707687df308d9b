//! Display language and theme

use crate::taxonomy::{LocalizedName, Tag};
use serde::{Deserialize, Serialize};

/// Full-width comma joining primary-language labels
pub const PRIMARY_DELIMITER: &str = "，";

/// Delimiter joining secondary-language labels
pub const SECONDARY_DELIMITER: &str = ", ";

/// Display language
///
/// Selects the tag label shown, the prompt join delimiter, and the UI
/// string set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DisplayLanguage {
    /// Chinese
    #[default]
    #[serde(rename = "zh")]
    Primary,
    /// English
    #[serde(rename = "en")]
    Secondary,
}

impl DisplayLanguage {
    pub fn code(&self) -> &'static str {
        match self {
            DisplayLanguage::Primary => "zh",
            DisplayLanguage::Secondary => "en",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "zh" => Some(DisplayLanguage::Primary),
            "en" => Some(DisplayLanguage::Secondary),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            DisplayLanguage::Primary => DisplayLanguage::Secondary,
            DisplayLanguage::Secondary => DisplayLanguage::Primary,
        }
    }

    /// Delimiter used when deriving prompt text
    pub fn delimiter(&self) -> &'static str {
        match self {
            DisplayLanguage::Primary => PRIMARY_DELIMITER,
            DisplayLanguage::Secondary => SECONDARY_DELIMITER,
        }
    }

    /// Tag label in this language
    pub fn label<'a>(&self, tag: &'a Tag) -> &'a str {
        match self {
            DisplayLanguage::Primary => &tag.zh,
            DisplayLanguage::Secondary => &tag.en,
        }
    }

    /// Category or subcategory name in this language
    pub fn name<'a>(&self, name: &'a LocalizedName) -> &'a str {
        match self {
            DisplayLanguage::Primary => &name.zh,
            DisplayLanguage::Secondary => &name.en,
        }
    }
}

/// UI colour theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_roundtrip() {
        for lang in [DisplayLanguage::Primary, DisplayLanguage::Secondary] {
            assert_eq!(DisplayLanguage::from_code(lang.code()), Some(lang));
        }
        assert_eq!(DisplayLanguage::from_code("fr"), None);
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(DisplayLanguage::Primary.delimiter(), "\u{FF0C}");
        assert_eq!(DisplayLanguage::Secondary.delimiter(), ", ");
    }

    #[test]
    fn test_toggle_is_involution() {
        assert_eq!(
            DisplayLanguage::Primary.toggled().toggled(),
            DisplayLanguage::Primary
        );
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::parse(" dark "), Some(Theme::Dark));
        assert_eq!(Theme::parse("sepia"), None);
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&DisplayLanguage::Secondary).unwrap();
        assert_eq!(json, "\"en\"");
    }
}
