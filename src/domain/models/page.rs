use super::DimensionValue;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    pub dimension: String,
    pub value: DimensionValue,
}

/// One generated static page, keyed by its slug.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    pub slug: String,
    pub selections: Vec<Selection>,
}

impl Page {
    pub fn value(&self, dimension: &str) -> Option<&DimensionValue> {
        return self
            .selections
            .iter()
            .find(|e| return e.dimension == dimension)
            .map(|e| return &e.value);
    }

    pub fn url(&self, tool_url: &str) -> String {
        return format!("{tool_url}/{}/{}/", PAGE_DIR, self.slug);
    }
}

/// Directory under the output root holding one folder per page.
pub const PAGE_DIR: &str = "p";
