//! Supported response languages.

use serde::{Deserialize, Serialize};

/// A language the advisor can answer in and the catalog is translated to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ja,
}

impl Language {
    /// Every supported language, in catalog column order.
    pub const ALL: [Language; 2] = [Language::En, Language::Ja];

    /// The wire code (`"en"`, `"ja"`), also passed to the weather provider.
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ja => "ja",
        }
    }

    /// The English name used inside the system prompt.
    pub fn prompt_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ja => "Japanese",
        }
    }

    /// What a client shows when a chat request fails outright.
    pub fn error_apology(self) -> &'static str {
        match self {
            Language::En => "Sorry, an error occurred.",
            Language::Ja => "申し訳ありません。エラーが発生しました。",
        }
    }

    /// Column index into per-language tables.
    pub fn index(self) -> usize {
        match self {
            Language::En => 0,
            Language::Ja => 1,
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "ja" => Ok(Language::Ja),
            other => Err(format!("Unsupported language '{other}'. Use 'en' or 'ja'.")),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_case_insensitively() {
        assert_eq!("JA".parse::<Language>().unwrap(), Language::Ja);
        assert_eq!(" en ".parse::<Language>().unwrap(), Language::En);
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn default_is_english() {
        assert_eq!(Language::default(), Language::En);
        assert_eq!(Language::default().prompt_name(), "English");
    }

    #[test]
    fn serde_uses_lowercase_codes() {
        let lang: Language = serde_json::from_str("\"ja\"").unwrap();
        assert_eq!(lang, Language::Ja);
        assert_eq!(serde_json::to_string(&Language::En).unwrap(), "\"en\"");
    }
}
