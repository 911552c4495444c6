#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::env;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::ArgMatches;
use clap::Command;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use tokio::fs;

use crate::domain::models::Language;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

pub const DEFAULT_URL: &str = "https://future-hn.densematrix.ai";

#[derive(Clone, Copy, Eq, PartialEq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    #[strum(serialize = "api-url")]
    ApiURL,
    ConfigFile,
    #[strum(serialize = "device-id")]
    DeviceID,
    DimensionsFile,
    Lang,
    OutputDir,
    #[strum(serialize = "site-url")]
    SiteURL,
    TokenFile,
    Year,
}

fn config_dir() -> path::PathBuf {
    #[cfg(not(target_os = "macos"))]
    let dir = dirs::config_dir().unwrap_or_else(env::temp_dir);
    #[cfg(target_os = "macos")]
    let dir = dirs::home_dir()
        .map(|e| return e.join(".config"))
        .unwrap_or_else(env::temp_dir);

    return dir.join("futurehn");
}

fn data_dir() -> path::PathBuf {
    return dirs::data_dir()
        .unwrap_or_else(env::temp_dir)
        .join("futurehn");
}

pub struct Config {}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    pub fn default(key: ConfigKey) -> String {
        if key == ConfigKey::Lang {
            let locale = env::var("LANG").unwrap_or_else(|_| return "".to_string());
            return Language::parse(&locale).unwrap_or_default().to_string();
        }

        let res = match key {
            ConfigKey::ApiURL => DEFAULT_URL.to_string(),
            ConfigKey::DimensionsFile => "".to_string(),
            ConfigKey::OutputDir => "./public".to_string(),
            ConfigKey::SiteURL => DEFAULT_URL.to_string(),
            ConfigKey::Year => "2035".to_string(),

            // Special
            ConfigKey::ConfigFile => config_dir()
                .join("config.toml")
                .to_string_lossy()
                .to_string(),
            ConfigKey::DeviceID => "".to_string(),
            ConfigKey::Lang => "".to_string(),
            ConfigKey::TokenFile => data_dir()
                .join("future-hn-tokens.json")
                .to_string_lossy()
                .to_string(),
        };

        return res;
    }

    pub async fn load(cmd: Command, clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        for key in ConfigKey::iter() {
            Config::set(key, &Config::default(key))
        }

        let mut config_file = Config::default(ConfigKey::ConfigFile);
        for matches in clap_arg_matches.as_slice() {
            if let Ok(Some(arg_config_file)) =
                matches.try_get_one::<String>(&ConfigKey::ConfigFile.to_string())
            {
                config_file = arg_config_file.to_string();
            }
        }

        let config_path = path::PathBuf::from(config_file);
        if config_path.exists() {
            let toml_str = fs::read_to_string(config_path).await?;
            let doc = toml_str.parse::<toml_edit::Document>()?;

            for key in ConfigKey::iter() {
                if let Some(val) = doc.get(&key.to_string()) {
                    // Use clap value parsers to do validation.
                    let mut possible_values = vec![];
                    if let Some(arg) = cmd
                        .get_arguments()
                        .find(|e| return e.get_long() == Some(key.to_string().as_str()))
                    {
                        possible_values = arg
                            .get_possible_values()
                            .iter()
                            .map(|e| return e.get_name().to_string())
                            .collect::<Vec<String>>();
                    }

                    if let Some(val_int) = val.as_integer() {
                        Config::set(key, &val_int.to_string());
                    } else if let Some(val_str) = val.as_str() {
                        if val_str.is_empty() {
                            continue;
                        }
                        if !possible_values.is_empty()
                            && !possible_values.contains(&val_str.to_string())
                        {
                            bail!(format!("config.toml has an invalid value for key '{key}': {val_str}\nPossible values are: {}", possible_values.join(", ")));
                        }
                        Config::set(key, val_str);
                    } else {
                        bail!(format!(
                            "config.toml has an invalid value for key '{key}': {}",
                            val.to_string().trim()
                        ));
                    }
                }
            }
        }

        for key in ConfigKey::iter() {
            for matches in clap_arg_matches.as_slice() {
                if let Ok(Some(val)) = matches.try_get_one::<String>(&key.to_string()) {
                    if val.is_empty() {
                        continue;
                    }
                    Config::set(key, val)
                }
            }
        }

        Config::year()?;

        tracing::debug!(
            api_url = Config::get(ConfigKey::ApiURL),
            site_url = Config::get(ConfigKey::SiteURL),
            lang = Config::get(ConfigKey::Lang),
            year = Config::get(ConfigKey::Year),
            token_file = Config::get(ConfigKey::TokenFile),
            "config"
        );

        return Ok(());
    }

    /// The configured year, which must fall inside the selectable range.
    pub fn year() -> Result<u16> {
        let raw = Config::get(ConfigKey::Year);
        let Ok(year) = raw.parse::<u16>() else {
            bail!(format!("Year must be a number, got '{raw}'"));
        };
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            bail!(format!(
                "Year must be between {MIN_YEAR} and {MAX_YEAR}, got {year}"
            ));
        }

        return Ok(year);
    }

    pub fn serialize_default(cmd: Command) -> String {
        let toml_str = ConfigKey::iter()
            .filter_map(|key| {
                if key == ConfigKey::ConfigFile {
                    return None;
                }

                let arg = cmd
                    .get_arguments()
                    .find(|e| return e.get_long() == Some(key.to_string().as_str()))?;

                let mut description = arg
                    .get_help()
                    .map(|e| return e.to_string())
                    .unwrap_or_default();

                description = description
                    .split("[default:")
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string();

                if !arg.get_possible_values().is_empty() {
                    let possible_values = arg
                        .get_possible_values()
                        .iter()
                        .map(|e| return e.get_name().to_string())
                        .collect::<Vec<_>>()
                        .join(", ");
                    description = format!("{description} [possible values: {}]", possible_values);
                }

                let mut val = Config::default(key);
                if val.is_empty() {
                    val = format!("# {key} = \"\"");
                } else if val.parse::<i32>().is_ok() {
                    val = format!("{key} = {val}");
                } else {
                    val = format!("{key} = \"{val}\"");
                }

                return Some(format!("# {description}\n{val}"));
            })
            .collect::<Vec<String>>()
            .join("\n\n");

        return toml_str;
    }
}

pub const MIN_YEAR: u16 = 2030;
pub const MAX_YEAR: u16 = 2040;
