use anyhow::anyhow;
use anyhow::Result;
use test_utils::details_fixture;
use test_utils::stories_fixture;

use super::rank;
use super::StoryList;
use crate::domain::models::GenerateResponse;
use crate::domain::models::StoryDetails;

fn story_list() -> Result<StoryList> {
    let res = serde_json::from_str::<GenerateResponse>(stories_fixture())?;
    let mut list = StoryList::default();
    list.set_stories(res.stories);

    return Ok(list);
}

fn details() -> Result<StoryDetails> {
    return Ok(serde_json::from_str::<StoryDetails>(details_fixture())?);
}

#[test]
fn it_requests_details_once_per_story() -> Result<()> {
    let mut list = story_list()?;

    let req = list.toggle(1).unwrap();
    assert_eq!(req.story_id, 1);
    assert!(list.is_loading(1));

    assert!(list.toggle(1).is_none());
    assert!(list.toggle(1).is_none());
    assert!(list.is_loading(1));

    list.apply_details(req, details());
    assert!(list.toggle(1).is_none());
    assert!(list.toggle(1).is_none());
    assert!(list.toggle(1).is_none());
    assert_eq!(list.details_for(1).map(|e| e.comments.len()), Some(2));

    return Ok(());
}

#[test]
fn it_caches_details_that_arrive_after_collapsing() -> Result<()> {
    let mut list = story_list()?;

    let req = list.toggle(1).unwrap();
    list.toggle(1);
    assert_eq!(list.expanded(), None);

    list.apply_details(req, details());
    assert!(list.details_for(1).is_some());

    assert!(list.toggle(1).is_none());
    assert!(list.is_expanded(1));
    assert!(!list.is_loading(1));

    return Ok(());
}

#[test]
fn it_expands_one_story_at_a_time() -> Result<()> {
    let mut list = story_list()?;

    let first = list.toggle(1).unwrap();
    let second = list.toggle(2).unwrap();

    assert!(list.is_expanded(2));
    assert!(!list.is_expanded(1));
    assert_ne!(first.story_id, second.story_id);

    list.apply_details(first, details());
    assert!(list.details_for(1).is_some());
    assert!(list.is_loading(2));

    return Ok(());
}

#[test]
fn it_discards_stale_details() -> Result<()> {
    let mut list = story_list()?;

    let stale = list.toggle(1).unwrap();
    let res = serde_json::from_str(stories_fixture()).map(|e: GenerateResponse| e.stories)?;
    list.set_stories(res);

    list.apply_details(stale, details());
    assert!(list.details_for(1).is_none());

    let fresh = list.toggle(1).unwrap();
    assert_eq!(fresh.epoch, stale.epoch + 1);

    return Ok(());
}

#[test]
fn it_swallows_failed_fetches() -> Result<()> {
    let mut list = story_list()?;

    let req = list.toggle(3).unwrap();
    list.apply_details(req, Err(anyhow!("HTTP 500")));

    assert!(list.details_for(3).is_none());
    assert!(!list.is_loading(3));
    assert!(list.is_expanded(3));

    list.toggle(3);
    assert!(list.toggle(3).is_some());

    return Ok(());
}

#[test]
fn it_moves_the_cursor_within_bounds() -> Result<()> {
    let mut list = story_list()?;

    list.select_prev();
    assert_eq!(list.cursor(), 0);

    list.select_page_down(10);
    assert_eq!(list.cursor(), 2);
    list.select_next();
    assert_eq!(list.cursor(), 2);

    list.select_page_up(1);
    assert_eq!(list.selected().map(|e| e.id), Some(2));

    let req = list.toggle_selected().unwrap();
    assert_eq!(req.story_id, 2);

    return Ok(());
}

#[test]
fn it_ranks_from_one() {
    assert_eq!(rank(0), "1.");
    assert_eq!(rank(29), "30.");
}
