use serde_derive::Deserialize;
use serde_derive::Serialize;

/// A generated headline. Immutable once received and scoped to the
/// (year, language) request that produced it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub comments: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    pub text: String,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub time: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryDetails {
    pub story_id: u64,
    pub summary: String,
    #[serde(default)]
    pub comments: Vec<Comment>,
}
