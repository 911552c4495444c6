#[cfg(test)]
#[path = "language_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Hash,
    PartialEq,
    Eq,
    EnumIter,
    EnumVariantNames,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Zh,
    Ja,
    De,
    Fr,
    Ko,
    Es,
}

impl Language {
    /// Accepts bare codes and full locale tags, so `zh-CN` resolves to `zh`.
    pub fn parse(text: &str) -> Option<Language> {
        let code = text
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_lowercase();

        return Language::iter().find(|e| return e.to_string() == code);
    }

    pub fn label(&self) -> &'static str {
        match self {
            Language::En => return "EN",
            Language::Zh => return "中文",
            Language::Ja => return "日本語",
            Language::De => return "DE",
            Language::Fr => return "FR",
            Language::Ko => return "한국어",
            Language::Es => return "ES",
        }
    }

    pub fn next(&self) -> Language {
        let all = Language::iter().collect::<Vec<Language>>();
        let idx = all.iter().position(|e| return e == self).unwrap_or(0);

        return all[(idx + 1) % all.len()];
    }
}
