#[cfg(test)]
#[path = "story_list_test.rs"]
mod tests;

use std::collections::HashMap;
use std::collections::HashSet;

use anyhow::Result;

use crate::domain::models::DetailsRequest;
use crate::domain::models::Story;
use crate::domain::models::StoryDetails;

/// The generated front page plus expand/collapse state and a per-story
/// detail cache.
#[derive(Default)]
pub struct StoryList {
    stories: Vec<Story>,
    expanded: Option<u64>,
    details: HashMap<u64, StoryDetails>,
    in_flight: HashSet<u64>,
    cursor: usize,
    epoch: u64,
}

impl StoryList {
    /// Replaces the list. Results of fetches started before this call are
    /// discarded when they arrive.
    pub fn set_stories(&mut self, stories: Vec<Story>) {
        self.stories = stories;
        self.expanded = None;
        self.details.clear();
        self.in_flight.clear();
        self.cursor = 0;
        self.epoch += 1;
    }

    pub fn stories(&self) -> &[Story] {
        return &self.stories;
    }

    pub fn is_empty(&self) -> bool {
        return self.stories.is_empty();
    }

    pub fn epoch(&self) -> u64 {
        return self.epoch;
    }

    pub fn expanded(&self) -> Option<u64> {
        return self.expanded;
    }

    pub fn is_expanded(&self, story_id: u64) -> bool {
        return self.expanded == Some(story_id);
    }

    /// Collapses an expanded story, otherwise expands it. Returns a request
    /// only when the details are neither cached nor already being fetched.
    pub fn toggle(&mut self, story_id: u64) -> Option<DetailsRequest> {
        if self.is_expanded(story_id) {
            self.expanded = None;
            return None;
        }

        self.expanded = Some(story_id);
        if self.details.contains_key(&story_id) || self.in_flight.contains(&story_id) {
            return None;
        }

        self.in_flight.insert(story_id);
        return Some(DetailsRequest {
            story_id,
            epoch: self.epoch,
        });
    }

    pub fn toggle_selected(&mut self) -> Option<DetailsRequest> {
        let story_id = self.selected()?.id;
        return self.toggle(story_id);
    }

    pub fn apply_details(&mut self, req: DetailsRequest, res: Result<StoryDetails>) {
        if req.epoch != self.epoch {
            tracing::debug!(
                story_id = req.story_id,
                epoch = req.epoch,
                current = self.epoch,
                "Discarding stale story details"
            );
            return;
        }

        self.in_flight.remove(&req.story_id);
        match res {
            Ok(details) => {
                self.details.insert(req.story_id, details);
            }
            Err(err) => {
                tracing::debug!(story_id = req.story_id, error = ?err, "Story details failed");
            }
        }
    }

    /// True while the details of an expanded story are being fetched.
    pub fn is_loading(&self, story_id: u64) -> bool {
        return self.is_expanded(story_id) && self.in_flight.contains(&story_id);
    }

    pub fn details_for(&self, story_id: u64) -> Option<&StoryDetails> {
        return self.details.get(&story_id);
    }

    pub fn selected(&self) -> Option<&Story> {
        return self.stories.get(self.cursor);
    }

    pub fn cursor(&self) -> usize {
        return self.cursor;
    }

    pub fn select_next(&mut self) {
        if self.cursor + 1 < self.stories.len() {
            self.cursor += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn select_page_down(&mut self, page: usize) {
        if self.stories.is_empty() {
            return;
        }
        self.cursor = (self.cursor + page).min(self.stories.len() - 1);
    }

    pub fn select_page_up(&mut self, page: usize) {
        self.cursor = self.cursor.saturating_sub(page);
    }
}

/// Front page numbering starts at one.
pub fn rank(idx: usize) -> String {
    return format!("{}.", idx + 1);
}
