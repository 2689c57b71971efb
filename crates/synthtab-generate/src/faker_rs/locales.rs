use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Locales the faker corpus is drawn from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocaleKey {
    #[default]
    #[serde(rename = "en_US")]
    EnUs,
    #[serde(rename = "pt_BR")]
    PtBr,
}

impl LocaleKey {
    pub const ALL: [LocaleKey; 2] = [LocaleKey::EnUs, LocaleKey::PtBr];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "en_US" | "en-US" | "en" => Some(Self::EnUs),
            "pt_BR" | "pt-BR" | "pt" => Some(Self::PtBr),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::EnUs => "en_US",
            Self::PtBr => "pt_BR",
        }
    }
}

impl fmt::Display for LocaleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocaleKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| {
            let supported: Vec<&str> = Self::ALL.iter().map(|locale| locale.as_str()).collect();
            format!(
                "unsupported locale '{value}' (expected one of {})",
                supported.join(", ")
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_locale_lists_supported_ones() {
        let err = "fr_FR".parse::<LocaleKey>().unwrap_err();
        assert_eq!(err, "unsupported locale 'fr_FR' (expected one of en_US, pt_BR)");
        assert_eq!("pt-BR".parse::<LocaleKey>(), Ok(LocaleKey::PtBr));
    }
}
