#[cfg(test)]
#[path = "dimension_test.rs"]
mod tests;

use std::collections::HashSet;
use std::path;

use anyhow::bail;
use anyhow::Result;
use rust_embed::RustEmbed;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use tokio::fs;

#[derive(RustEmbed)]
#[folder = "assets/seo/"]
struct SeoAssets;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionValue {
    pub id: String,
    pub en: String,
    pub zh: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    #[serde(default)]
    pub name_zh: String,
    pub values: Vec<DimensionValue>,
}

/// Named axes of content variation, in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DimensionSet {
    dimensions: Vec<Dimension>,
}

impl DimensionSet {
    pub fn new(dimensions: Vec<Dimension>) -> DimensionSet {
        return DimensionSet { dimensions };
    }

    pub fn get(&self, name: &str) -> Option<&Dimension> {
        return self.dimensions.iter().find(|e| return e.name == name);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dimension> {
        return self.dimensions.iter();
    }

    pub fn names(&self) -> Vec<String> {
        return self
            .dimensions
            .iter()
            .map(|e| return e.name.to_string())
            .collect();
    }

    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for dimension in self.dimensions.iter() {
            if dimension.name.trim().is_empty() {
                bail!("Dimension names must not be empty");
            }
            if !names.insert(dimension.name.as_str()) {
                bail!(format!("Dimension '{}' is declared twice", dimension.name));
            }

            let mut ids = HashSet::new();
            for value in dimension.values.iter() {
                if value.id.trim().is_empty() {
                    bail!(format!("Dimension '{}' has a value without an id", dimension.name));
                }
                if !is_valid_id(&value.id) {
                    bail!(format!(
                        "Dimension '{}' value id '{}' may only use a-z, 0-9, '_' and '-'",
                        dimension.name, value.id
                    ));
                }
                if value.en.trim().is_empty() || value.zh.trim().is_empty() {
                    bail!(format!(
                        "Dimension '{}' value '{}' has an empty label",
                        dimension.name, value.id
                    ));
                }
                if !ids.insert(value.id.as_str()) {
                    bail!(format!(
                        "Dimension '{}' has duplicate value id '{}'",
                        dimension.name, value.id
                    ));
                }
            }
        }

        return Ok(());
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SlugSource {
    /// Join the value IDs.
    Id,
    /// Join the slugified English labels.
    Label,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PolicyConfig {
    Pairs {
        pairs: Vec<(String, String)>,
        #[serde(default)]
        slug: Option<SlugSource>,
    },
    Products {
        products: Vec<Vec<String>>,
        #[serde(default)]
        slug: Option<SlugSource>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    pub name: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionsConfig {
    pub tool: String,
    pub tool_url: String,
    #[serde(default)]
    pub publisher: Option<Publisher>,
    pub dimensions: DimensionSet,
    #[serde(default)]
    pub policy: Option<PolicyConfig>,
}

impl DimensionsConfig {
    pub fn parse(payload: &str) -> Result<DimensionsConfig> {
        let mut config: DimensionsConfig = serde_json::from_str(payload)?;
        config.tool_url = config.tool_url.trim_end_matches('/').to_string();
        if config.tool_url.is_empty() {
            bail!("Dimension config is missing tool_url");
        }
        config.dimensions.validate()?;

        return Ok(config);
    }

    /// Loads a config from disk, or the bundled default when `file` is empty.
    pub async fn load(file: &str) -> Result<DimensionsConfig> {
        if file.is_empty() {
            return DimensionsConfig::bundled();
        }

        let file_path = path::PathBuf::from(file);
        if !file_path.exists() {
            bail!(format!("No dimension config found at {file}"));
        }

        let payload = fs::read_to_string(file_path).await?;
        return DimensionsConfig::parse(&payload);
    }

    pub fn bundled() -> Result<DimensionsConfig> {
        let Some(file) = SeoAssets::get("dimensions.json") else {
            bail!("Bundled dimensions.json is missing from assets");
        };

        let payload = String::from_utf8(file.data.to_vec())?;
        return DimensionsConfig::parse(&payload);
    }
}

/// Value IDs end up in page directory names and URLs.
pub fn is_valid_id(id: &str) -> bool {
    return !id.is_empty()
        && id
            .chars()
            .all(|c| return c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-');
}
