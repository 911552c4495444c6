use anyhow::Result;
use test_utils::dimensions_fixture;

use super::cta_url;
use super::description;
use super::heading;
use super::render_page;
use crate::domain::models::DimensionValue;
use crate::domain::models::DimensionsConfig;
use crate::domain::models::Page;
use crate::domain::models::Selection;

fn selection(dimension: &str, id: &str, en: &str) -> Selection {
    return Selection {
        dimension: dimension.to_string(),
        value: DimensionValue {
            id: id.to_string(),
            en: en.to_string(),
            zh: en.to_string(),
        },
    };
}

fn full_page() -> Page {
    return Page {
        slug: "ai-2030-optimistic-launch".to_string(),
        selections: vec![
            selection("topic", "ai", "AI"),
            selection("year", "2030", "2030"),
            selection("tone", "optimistic", "Optimistic"),
            selection("event_type", "launch", "Launch"),
        ],
    };
}

#[test]
fn it_builds_headings() {
    assert_eq!(heading(&full_page()), "Optimistic AI Launch News from 2030");

    let page = Page {
        slug: "space-acquisition".to_string(),
        selections: vec![
            selection("topic", "space", "Space"),
            selection("event_type", "acquisition", "Acquisition"),
        ],
    };
    assert_eq!(heading(&page), "Space Acquisition News");
}

#[test]
fn it_includes_extra_dimensions_in_headings() {
    let page = Page {
        slug: "eu-2040".to_string(),
        selections: vec![
            selection("region", "eu", "European"),
            selection("year", "2040", "2040"),
        ],
    };
    assert_eq!(heading(&page), "European News from 2040");
}

#[test]
fn it_builds_descriptions() {
    insta::assert_snapshot!(description(&full_page()), @"AI-generated optimistic ai news from 2030. See what HN headlines might look like!");

    let page = Page {
        slug: "launch".to_string(),
        selections: vec![selection("event_type", "launch", "Launch")],
    };
    insta::assert_snapshot!(description(&page), @"AI-generated tech news from the future. See what HN headlines might look like!");
}

#[test]
fn it_builds_cta_urls() {
    insta::assert_snapshot!(
        cta_url("https://future-hn.example.com", &full_page()),
        @"https://future-hn.example.com?ref=p&topic=ai&year=2030&tone=optimistic&event_type=launch"
    );
}

#[test]
fn it_renders_pages() -> Result<()> {
    let config = DimensionsConfig::parse(dimensions_fixture())?;
    let html = render_page(&config, &full_page())?;

    assert!(html.starts_with("<!DOCTYPE html><html lang=\"en\">"));
    assert!(html.contains(
        "<title>Optimistic AI Launch News from 2030 | Future Hacker News</title>"
    ));
    assert!(html.contains(
        "<link rel=\"canonical\" href=\"https://future-hn.example.com/p/ai-2030-optimistic-launch/\">"
    ));
    assert!(html.contains("<meta property=\"og:type\" content=\"website\">"));
    assert!(html.contains("<meta property=\"og:site_name\" content=\"Future Hacker News\">"));
    assert!(html.contains("?ref=p&amp;topic=ai&amp;year=2030"));
    assert!(html.contains("<h1>Optimistic AI Launch News from 2030</h1>"));

    return Ok(());
}

#[test]
fn it_renders_valid_json_ld() -> Result<()> {
    let config = DimensionsConfig::parse(dimensions_fixture())?;
    let mut page = full_page();
    page.selections[0] = selection("topic", "xss", "\"Quotes\" </script> & <b>Tags</b>");
    let html = render_page(&config, &page)?;

    let start = html.find("<script type=\"application/ld+json\">").unwrap()
        + "<script type=\"application/ld+json\">".len();
    let end = start + html[start..].find("</script>").unwrap();
    let ld = serde_json::from_str::<serde_json::Value>(&html[start..end])?;

    assert_eq!(ld["@type"], "WebApplication");
    assert_eq!(
        ld["name"],
        "Optimistic \"Quotes\" </script> & <b>Tags</b> Launch News from 2030 | Future Hacker News"
    );
    assert!(html.contains("&lt;b&gt;Tags&lt;/b&gt;"));
    assert!(!html.contains("<b>Tags</b>"));

    return Ok(());
}
