#[cfg(test)]
#[path = "translations_test.rs"]
mod tests;

use std::collections::HashMap;

use once_cell::sync::Lazy;
use rust_embed::RustEmbed;
use strum::IntoEnumIterator;

use crate::domain::models::Language;

#[derive(RustEmbed)]
#[folder = "assets/locales/"]
struct Locales;

type Table = HashMap<String, String>;

static TABLES: Lazy<HashMap<Language, Table>> = Lazy::new(|| {
    let mut tables = HashMap::new();
    for lang in Language::iter() {
        tables.insert(lang, Translations::load(lang));
    }

    return tables;
});

pub struct Translations {}

impl Translations {
    fn load(lang: Language) -> Table {
        let Some(file) = Locales::get(&format!("{lang}.json")) else {
            tracing::warn!(lang = lang.to_string(), "Missing locale file");
            return Table::new();
        };

        match serde_json::from_slice::<Table>(&file.data) {
            Ok(table) => return table,
            Err(err) => {
                tracing::warn!(lang = lang.to_string(), error = ?err, "Malformed locale file");
                return Table::new();
            }
        }
    }

    pub fn keys(lang: Language) -> Vec<String> {
        let mut keys = TABLES
            .get(&lang)
            .map(|e| return e.keys().cloned().collect::<Vec<String>>())
            .unwrap_or_default();
        keys.sort();

        return keys;
    }

    /// Looks up `key`, falling back to English and then to the key itself.
    pub fn get(lang: Language, key: &str) -> String {
        for table_lang in [lang, Language::En] {
            if let Some(val) = TABLES.get(&table_lang).and_then(|e| return e.get(key)) {
                if !val.is_empty() {
                    return val.to_string();
                }
            }
        }

        return key.to_string();
    }

    /// Like `get`, replacing `{{name}}` placeholders with `args`.
    pub fn format(lang: Language, key: &str, args: &[(&str, &str)]) -> String {
        let mut res = Translations::get(lang, key);
        for (name, val) in args.iter() {
            res = res.replace(&format!("{{{{{name}}}}}"), val);
        }

        return res;
    }
}
