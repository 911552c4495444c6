#[cfg(test)]
#[path = "policy_test.rs"]
mod tests;

use std::collections::HashSet;

use anyhow::bail;
use anyhow::Result;

use crate::domain::models::is_valid_id;
use crate::domain::models::Dimension;
use crate::domain::models::DimensionSet;
use crate::domain::models::Page;
use crate::domain::models::PolicyConfig;
use crate::domain::models::Selection;
use crate::domain::models::SlugSource;

pub type PolicyBox = Box<dyn CombinationPolicy + Send + Sync>;

/// Decides which dimensions get cross-joined into pages.
pub trait CombinationPolicy {
    /// Each entry is an ordered tuple of dimensions to fully cross-join.
    fn combinations<'a>(&self, set: &'a DimensionSet) -> Result<Vec<Vec<&'a Dimension>>>;

    fn slug_source(&self) -> SlugSource;
}

/// Two-way products from an explicit list of dimension name pairs.
pub struct PairsPolicy {
    pairs: Vec<(String, String)>,
    slug: SlugSource,
}

impl PairsPolicy {
    pub fn new(pairs: Vec<(String, String)>, slug: Option<SlugSource>) -> PairsPolicy {
        return PairsPolicy {
            pairs,
            slug: slug.unwrap_or(SlugSource::Label),
        };
    }
}

impl CombinationPolicy for PairsPolicy {
    fn combinations<'a>(&self, set: &'a DimensionSet) -> Result<Vec<Vec<&'a Dimension>>> {
        let mut res = vec![];
        for (first, second) in self.pairs.iter() {
            let (Some(first_dim), Some(second_dim)) = (set.get(first), set.get(second)) else {
                tracing::warn!(
                    first = first.as_str(),
                    second = second.as_str(),
                    "Skipping pair with an unknown dimension"
                );
                continue;
            };

            res.push(vec![first_dim, second_dim]);
        }

        return Ok(res);
    }

    fn slug_source(&self) -> SlugSource {
        return self.slug;
    }
}

/// N-way products from an explicit list of dimension name tuples.
pub struct ProductsPolicy {
    products: Vec<Vec<String>>,
    slug: SlugSource,
}

impl ProductsPolicy {
    pub fn new(products: Vec<Vec<String>>, slug: Option<SlugSource>) -> ProductsPolicy {
        return ProductsPolicy {
            products,
            slug: slug.unwrap_or(SlugSource::Id),
        };
    }

    /// The stock Future Hacker News set, keyed by value IDs.
    pub fn standard() -> ProductsPolicy {
        let products = [
            vec!["topic", "year", "tone"],
            vec!["topic", "year", "event_type"],
            vec!["topic", "tone", "event_type"],
            vec!["topic", "year", "tone", "event_type"],
        ]
        .iter()
        .map(|names| return names.iter().map(|e| return e.to_string()).collect())
        .collect();

        return ProductsPolicy::new(products, Some(SlugSource::Id));
    }
}

impl CombinationPolicy for ProductsPolicy {
    fn combinations<'a>(&self, set: &'a DimensionSet) -> Result<Vec<Vec<&'a Dimension>>> {
        let mut res = vec![];
        for names in self.products.iter() {
            let mut dimensions = vec![];
            for name in names.iter() {
                let Some(dimension) = set.get(name) else {
                    bail!(format!("Combination references unknown dimension '{name}'"));
                };
                dimensions.push(dimension);
            }

            res.push(dimensions);
        }

        return Ok(res);
    }

    fn slug_source(&self) -> SlugSource {
        return self.slug;
    }
}

pub struct PolicyManager {}

impl PolicyManager {
    pub fn get(config: &Option<PolicyConfig>) -> PolicyBox {
        match config {
            Some(PolicyConfig::Pairs { pairs, slug }) => {
                return Box::new(PairsPolicy::new(pairs.clone(), *slug));
            }
            Some(PolicyConfig::Products { products, slug }) => {
                return Box::new(ProductsPolicy::new(products.clone(), *slug));
            }
            None => {
                return Box::new(ProductsPolicy::standard());
            }
        }
    }
}

/// Lowercases, collapses runs of anything outside `[a-z0-9]` into a single
/// `-` and trims dashes from both ends.
pub fn slugify(text: &str) -> String {
    let mut res = String::new();
    for c in text.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            res.push(c);
        } else if !res.ends_with('-') {
            res.push('-');
        }
    }

    return res.trim_matches('-').to_string();
}

fn page_slug(selections: &[Selection], source: SlugSource) -> String {
    return selections
        .iter()
        .map(|e| {
            if source == SlugSource::Label {
                let label = slugify(&e.value.en);
                if !label.is_empty() {
                    return label;
                }
            }
            return e.value.id.to_string();
        })
        .collect::<Vec<String>>()
        .join("-");
}

/// Odometer increment. Returns false once every position has wrapped.
fn advance(indices: &mut [usize], dimensions: &[&Dimension]) -> bool {
    for pos in (0..indices.len()).rev() {
        indices[pos] += 1;
        if indices[pos] < dimensions[pos].values.len() {
            return true;
        }
        indices[pos] = 0;
    }

    return false;
}

#[derive(Debug, Default)]
pub struct Enumeration {
    pub pages: Vec<Page>,
    /// Combinations dropped because an earlier one already claimed the slug.
    pub duplicates: usize,
}

/// Walks every combination in order, last dimension varying fastest. The
/// first page to claim a slug wins.
pub fn enumerate_pages(set: &DimensionSet, policy: &dyn CombinationPolicy) -> Result<Enumeration> {
    let mut res = Enumeration::default();
    let mut seen = HashSet::new();

    for dimensions in policy.combinations(set)? {
        if dimensions.is_empty() || dimensions.iter().any(|e| return e.values.is_empty()) {
            continue;
        }

        let mut indices = vec![0; dimensions.len()];
        loop {
            let selections = dimensions
                .iter()
                .zip(indices.iter())
                .map(|(dimension, idx)| {
                    return Selection {
                        dimension: dimension.name.to_string(),
                        value: dimension.values[*idx].clone(),
                    };
                })
                .collect::<Vec<Selection>>();

            let slug = page_slug(&selections, policy.slug_source());
            // Each slug names exactly one directory under the page root.
            if !is_valid_id(&slug) {
                bail!(format!("Refusing to write a page with slug '{slug}'"));
            }
            if seen.insert(slug.to_string()) {
                res.pages.push(Page { slug, selections });
            } else {
                res.duplicates += 1;
            }

            if !advance(&mut indices, &dimensions) {
                break;
            }
        }
    }

    return Ok(res);
}
