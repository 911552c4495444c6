#[cfg(test)]
#[path = "sitemap_test.rs"]
mod tests;

use chrono::NaiveDate;

use crate::domain::models::Page;

pub const SITEMAP_INDEX: &str = "sitemap.xml";
pub const SITEMAP_MAIN: &str = "sitemap-main.xml";
pub const SITEMAP_PROGRAMMATIC: &str = "sitemap-programmatic.xml";

const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";
const XMLNS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

fn url_entry(loc: &str, lastmod: &str, changefreq: &str, priority: &str) -> String {
    return format!(
        "<url><loc>{}</loc><lastmod>{lastmod}</lastmod><changefreq>{changefreq}</changefreq><priority>{priority}</priority></url>",
        html_escape::encode_text(loc)
    );
}

/// One `<url>` per generated page.
pub fn programmatic_sitemap(tool_url: &str, pages: &[Page], today: NaiveDate) -> String {
    let lastmod = today.format("%Y-%m-%d").to_string();
    let mut xml = format!("{XML_HEADER}\n<urlset xmlns=\"{XMLNS}\">\n");
    for page in pages.iter() {
        xml.push_str(&url_entry(&page.url(tool_url), &lastmod, "monthly", "0.6"));
        xml.push('\n');
    }
    xml.push_str("</urlset>");

    return xml;
}

pub fn main_sitemap(tool_url: &str, today: NaiveDate) -> String {
    let lastmod = today.format("%Y-%m-%d").to_string();
    return format!(
        "{XML_HEADER}\n<urlset xmlns=\"{XMLNS}\">\n{}\n</urlset>",
        url_entry(tool_url, &lastmod, "weekly", "1.0")
    );
}

pub fn sitemap_index(tool_url: &str) -> String {
    let entries = [SITEMAP_MAIN, SITEMAP_PROGRAMMATIC]
        .iter()
        .map(|name| {
            return format!(
                "<sitemap><loc>{}</loc></sitemap>",
                html_escape::encode_text(&format!("{tool_url}/{name}"))
            );
        })
        .collect::<Vec<String>>()
        .join("\n");

    return format!("{XML_HEADER}\n<sitemapindex xmlns=\"{XMLNS}\">\n{entries}\n</sitemapindex>");
}
