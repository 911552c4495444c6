#[cfg(test)]
#[path = "render_test.rs"]
mod tests;

use anyhow::Result;

use crate::domain::models::DimensionsConfig;
use crate::domain::models::Page;

const TOPIC: &str = "topic";
const YEAR: &str = "year";
const TONE: &str = "tone";
const EVENT: &str = "event_type";

const STYLE: &str = "*{margin:0;padding:0;box-sizing:border-box}body{font-family:Verdana,Geneva,sans-serif;background:#f6f6ef;color:#000;padding:24px;max-width:720px;margin:0 auto;line-height:1.6}h1{color:#ff6600;font-size:1.5rem;margin-bottom:1rem}p{margin-bottom:1rem;color:#666}.cta{background:#ff6600;color:#fff;padding:12px 24px;text-decoration:none;display:inline-block;margin:20px 0;font-weight:700}.cta:hover{background:#e55b00}footer{margin-top:2rem;font-size:.8rem;color:#999}";

fn label(page: &Page, dimension: &str) -> Option<String> {
    return page.value(dimension).map(|e| return e.en.to_string());
}

fn collapse_whitespace(text: &str) -> String {
    return text.split_whitespace().collect::<Vec<&str>>().join(" ");
}

/// `[tone] [topic] [event] [other] News [from year]`
pub fn heading(page: &Page) -> String {
    let mut parts = vec![];
    for dimension in [TONE, TOPIC, EVENT] {
        if let Some(text) = label(page, dimension) {
            parts.push(text);
        }
    }

    for selection in page.selections.iter() {
        if ![TONE, TOPIC, EVENT, YEAR].contains(&selection.dimension.as_str()) {
            parts.push(selection.value.en.to_string());
        }
    }

    parts.push("News".to_string());
    if let Some(year) = label(page, YEAR) {
        parts.push(format!("from {year}"));
    }

    return parts.join(" ");
}

pub fn description(page: &Page) -> String {
    let tone = label(page, TONE).unwrap_or_default().to_lowercase();
    let topic = label(page, TOPIC)
        .map(|e| return e.to_lowercase())
        .unwrap_or_else(|| return "tech".to_string());
    let year = label(page, YEAR).unwrap_or_else(|| return "the future".to_string());

    return collapse_whitespace(&format!(
        "AI-generated {tone} {topic} news from {year}. See what HN headlines might look like!"
    ));
}

fn body_copy(page: &Page) -> String {
    let topic = label(page, TOPIC)
        .map(|e| return e.to_lowercase())
        .unwrap_or_else(|| return "tech".to_string());
    let year = label(page, YEAR).unwrap_or_else(|| return "the future".to_string());
    let tone = label(page, TONE)
        .map(|e| return e.to_lowercase())
        .unwrap_or_else(|| return "realistic".to_string());

    return format!(
        "What will {topic} headlines look like in {year}? Our AI generates {tone} Hacker News posts from the future."
    );
}

/// Link back to the tool carrying every selected value ID.
pub fn cta_url(tool_url: &str, page: &Page) -> String {
    let mut query = vec!["ref=p".to_string()];
    for selection in page.selections.iter() {
        query.push(format!(
            "{}={}",
            urlencoding::encode(&selection.dimension),
            urlencoding::encode(&selection.value.id)
        ));
    }

    return format!("{tool_url}?{}", query.join("&"));
}

fn json_ld(config: &DimensionsConfig, title: &str, description: &str, url: &str) -> Result<String> {
    let mut doc = serde_json::json!({
        "@context": "https://schema.org",
        "@type": "WebApplication",
        "name": title,
        "description": description,
        "url": url,
        "applicationCategory": "EntertainmentApplication",
        "operatingSystem": "Web",
        "offers": { "@type": "Offer", "price": "0", "priceCurrency": "USD" },
    });

    if let Some(publisher) = &config.publisher {
        doc["author"] = serde_json::json!({
            "@type": "Organization",
            "name": publisher.name,
            "url": publisher.url,
        });
    }

    // A literal `</script>` inside a label must not close the block early.
    return Ok(serde_json::to_string(&doc)?.replace("</", "<\\/"));
}

/// Renders one self-contained HTML document for a page.
pub fn render_page(config: &DimensionsConfig, page: &Page) -> Result<String> {
    let h1 = heading(page);
    let title = format!("{h1} | {}", config.tool);
    let desc = description(page);
    let url = page.url(&config.tool_url);
    let site_name = config
        .publisher
        .as_ref()
        .map(|e| return e.name.to_string())
        .unwrap_or_else(|| return config.tool.to_string());
    let ld = json_ld(config, &title, &desc, &url)?;
    let cta = cta_url(&config.tool_url, page);

    let attr = |val: &str| return html_escape::encode_double_quoted_attribute(val).to_string();
    let text = |val: &str| return html_escape::encode_text(val).to_string();

    let head = format!(
        concat!(
            "<meta charset=\"UTF-8\">",
            "<meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">",
            "<title>{title}</title>",
            "<meta name=\"description\" content=\"{desc}\">",
            "<link rel=\"canonical\" href=\"{url}\">",
            "<meta property=\"og:title\" content=\"{og_title}\">",
            "<meta property=\"og:description\" content=\"{desc}\">",
            "<meta property=\"og:url\" content=\"{url}\">",
            "<meta property=\"og:type\" content=\"website\">",
            "<meta property=\"og:site_name\" content=\"{site_name}\">",
            "<script type=\"application/ld+json\">{ld}</script>",
            "<style>{style}</style>"
        ),
        title = text(&title),
        desc = attr(&desc),
        url = attr(&url),
        og_title = attr(&title),
        site_name = attr(&site_name),
        ld = ld,
        style = STYLE,
    );

    let body = format!(
        concat!(
            "<h1>{h1}</h1>",
            "<p>{copy}</p>",
            "<a href=\"{cta}\" class=\"cta\">Generate Future News →</a>",
            "<footer>{footer}</footer>"
        ),
        h1 = text(&h1),
        copy = text(&body_copy(page)),
        cta = attr(&cta),
        footer = text(&format!("{} by {site_name}", config.tool)),
    );

    return Ok(format!(
        "<!DOCTYPE html><html lang=\"en\"><head>{head}</head><body>{body}</body></html>"
    ));
}
