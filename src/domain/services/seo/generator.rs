#[cfg(test)]
#[path = "generator_test.rs"]
mod tests;

use std::fmt;
use std::path;

use anyhow::Result;
use chrono::NaiveDate;
use chrono::Utc;
use tokio::fs;

use super::enumerate_pages;
use super::main_sitemap;
use super::programmatic_sitemap;
use super::render_page;
use super::sitemap_index;
use super::PolicyBox;
use super::PolicyManager;
use super::SITEMAP_INDEX;
use super::SITEMAP_MAIN;
use super::SITEMAP_PROGRAMMATIC;
use crate::domain::models::DimensionsConfig;
use crate::domain::models::PAGE_DIR;

const PROGRESS_EVERY: usize = 2000;

pub struct GenerateOptions {
    pub output_dir: path::PathBuf,
    pub dry_run: bool,
    pub today: NaiveDate,
}

impl GenerateOptions {
    pub fn new(output_dir: &str, dry_run: bool) -> GenerateOptions {
        return GenerateOptions {
            output_dir: path::PathBuf::from(output_dir),
            dry_run,
            today: Utc::now().date_naive(),
        };
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct GenerateReport {
    pub pages: usize,
    pub duplicates: usize,
    pub output_dir: path::PathBuf,
    pub dry_run: bool,
}

impl fmt::Display for GenerateReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.dry_run {
            return write!(
                f,
                "Dry run: {} pages would be written to {} ({} duplicate slugs skipped)",
                self.pages,
                self.output_dir.display(),
                self.duplicates
            );
        }

        return write!(
            f,
            "Generated {} pages in {} ({} duplicate slugs skipped)\nSitemaps: {SITEMAP_INDEX}, {SITEMAP_MAIN}, {SITEMAP_PROGRAMMATIC}",
            self.pages,
            self.output_dir.display(),
            self.duplicates
        );
    }
}

/// Renders the static SEO page tree and its sitemaps.
pub struct SeoGenerator {
    config: DimensionsConfig,
    policy: PolicyBox,
}

impl SeoGenerator {
    pub fn new(config: DimensionsConfig) -> SeoGenerator {
        let policy = PolicyManager::get(&config.policy);
        return SeoGenerator { config, policy };
    }

    pub fn with_policy(config: DimensionsConfig, policy: PolicyBox) -> SeoGenerator {
        return SeoGenerator { config, policy };
    }

    /// Wipes the page directory and writes every page from scratch. Not
    /// incremental: a failed run is repaired by running again.
    pub async fn generate(&self, opts: &GenerateOptions) -> Result<GenerateReport> {
        let enumeration = enumerate_pages(&self.config.dimensions, self.policy.as_ref())?;
        let total = enumeration.pages.len();
        tracing::info!(
            pages = total,
            duplicates = enumeration.duplicates,
            "Enumerated pages"
        );

        let report = GenerateReport {
            pages: total,
            duplicates: enumeration.duplicates,
            output_dir: opts.output_dir.clone(),
            dry_run: opts.dry_run,
        };
        if opts.dry_run {
            return Ok(report);
        }

        let page_root = opts.output_dir.join(PAGE_DIR);
        if page_root.exists() {
            fs::remove_dir_all(&page_root).await?;
        }
        fs::create_dir_all(&page_root).await?;

        for (idx, page) in enumeration.pages.iter().enumerate() {
            let page_dir = page_root.join(&page.slug);
            fs::create_dir_all(&page_dir).await?;

            let html = render_page(&self.config, page)?;
            fs::write(page_dir.join("index.html"), html).await?;

            if (idx + 1) % PROGRESS_EVERY == 0 {
                tracing::info!(written = idx + 1, total = total, "Writing pages");
            }
        }

        let tool_url = &self.config.tool_url;
        fs::write(
            opts.output_dir.join(SITEMAP_PROGRAMMATIC),
            programmatic_sitemap(tool_url, &enumeration.pages, opts.today),
        )
        .await?;
        fs::write(
            opts.output_dir.join(SITEMAP_MAIN),
            main_sitemap(tool_url, opts.today),
        )
        .await?;
        fs::write(opts.output_dir.join(SITEMAP_INDEX), sitemap_index(tool_url)).await?;

        tracing::info!(
            pages = total,
            output_dir = opts.output_dir.to_string_lossy().to_string(),
            "Finished generating pages"
        );

        return Ok(report);
    }
}
