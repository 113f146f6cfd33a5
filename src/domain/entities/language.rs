use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Locale tag partitioning every content collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Sl,
    En,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Sl, Language::En];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Sl => "sl",
            Language::En => "en",
        }
    }

    /// Picks a language from an `Accept-Language` header value.
    /// Only a leading English tag switches away from the default.
    pub fn from_accept_language(header: &str) -> Self {
        if header.trim_start().to_ascii_lowercase().starts_with("en") {
            Language::En
        } else {
            Language::Sl
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sl" => Ok(Language::Sl),
            "en" => Ok(Language::En),
            other => Err(format!("Unsupported language: {}", other)),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
