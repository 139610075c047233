//! Listing-element field extraction
//!
//! The navigator hands each listing element's HTML to a `ListingParser`
//! and gets back the raw field bundle. Parsing is pure per-element text
//! scraping; a failed element is skipped by the caller and never aborts
//! the batch.

use crate::record::RawListing;
use scraper::{Html, Selector};
use thiserror::Error;

/// Errors raised while scraping one listing element
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("missing node `{0}` in listing element")]
    MissingNode(&'static str),
}

/// Converts one listing element's HTML into a raw field bundle
pub trait ListingParser {
    fn parse(&self, html: &str) -> Result<RawListing, ExtractError>;
}

/// Parser for the recruiting site's job-card markup
pub struct BossListingParser {
    title: Selector,
    area: Selector,
    salary: Selector,
    company: Selector,
    company_tags: Selector,
    info_tags: Selector,
    welfare: Selector,
    skills: Selector,
}

impl BossListingParser {
    pub fn new() -> Self {
        // Selector syntax is compile-time constant; parse cannot fail.
        Self {
            title: Selector::parse("span.job-name").unwrap(),
            area: Selector::parse("span.job-area").unwrap(),
            salary: Selector::parse("span.salary").unwrap(),
            company: Selector::parse(".company-name a").unwrap(),
            company_tags: Selector::parse(".company-tag-list li").unwrap(),
            info_tags: Selector::parse(".job-info .tag-list li").unwrap(),
            welfare: Selector::parse(".info-desc").unwrap(),
            skills: Selector::parse(".job-card-footer .tag-list li").unwrap(),
        }
    }

    fn first_text(
        &self,
        fragment: &Html,
        selector: &Selector,
        node: &'static str,
    ) -> Result<String, ExtractError> {
        fragment
            .select(selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .ok_or(ExtractError::MissingNode(node))
    }
}

impl Default for BossListingParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingParser for BossListingParser {
    fn parse(&self, html: &str) -> Result<RawListing, ExtractError> {
        let fragment = Html::parse_fragment(html);

        let title = self.first_text(&fragment, &self.title, "job-name")?;
        let location = self.first_text(&fragment, &self.area, "job-area")?;
        let salary_range = self.first_text(&fragment, &self.salary, "salary")?;
        let company = self.first_text(&fragment, &self.company, "company-name")?;

        // Company tag strip: industry, financing stage, then optionally the
        // head count.
        let company_tags: Vec<String> = fragment
            .select(&self.company_tags)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .collect();
        let industry = company_tags
            .first()
            .cloned()
            .ok_or(ExtractError::MissingNode("company-tag-list"))?;
        let finance = company_tags
            .get(1)
            .cloned()
            .ok_or(ExtractError::MissingNode("company-tag-list"))?;
        let scale = company_tags.get(2).cloned();

        // Requirement tags: experience then education.
        let info_tags: Vec<String> = fragment
            .select(&self.info_tags)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .collect();
        let experience = info_tags
            .first()
            .cloned()
            .ok_or(ExtractError::MissingNode("tag-list"))?;
        let education = info_tags
            .get(1)
            .cloned()
            .ok_or(ExtractError::MissingNode("tag-list"))?;

        let welfare = fragment
            .select(&self.welfare)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string());

        let skills = fragment
            .select(&self.skills)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(RawListing {
            title,
            location,
            company,
            industry,
            finance,
            scale,
            welfare,
            salary_range,
            experience,
            education,
            skills,
            // Address and description only appear on detail pages.
            address: None,
            desc: None,
        })
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Job-card markup matching the parser's selectors, shared by the
    //! navigator and orchestrator tests

    pub(crate) fn listing_html(title: &str, location: &str, salary: &str) -> String {
        listing_html_inner(title, location, &format!(r#"<span class="salary">{salary}</span>"#))
    }

    /// A card whose salary node is absent, making the element invalid
    pub(crate) fn listing_html_missing_salary(title: &str) -> String {
        listing_html_inner(title, "北京·朝阳区", "")
    }

    fn listing_html_inner(title: &str, location: &str, salary_html: &str) -> String {
        format!(
            r#"<li class="job-card-wrapper">
  <div class="job-card-body">
    <a class="job-card-left" href="/job_detail/x.html">
      <div class="job-title">
        <span class="job-name">{title}</span>
        <span class="job-area-wrapper"><span class="job-area">{location}</span></span>
      </div>
      <div class="job-info">
        {salary_html}
        <ul class="tag-list"><li>3-5年</li><li>本科</li></ul>
      </div>
    </a>
    <div class="job-card-right">
      <div class="company-info">
        <h3 class="company-name"><a href="/company/y.html">示例科技</a></h3>
        <ul class="company-tag-list"><li>互联网</li><li>A轮</li><li>100-499人</li></ul>
      </div>
    </div>
  </div>
  <div class="job-card-footer">
    <ul class="tag-list"><li>Python</li><li>Linux</li></ul>
    <div class="info-desc">五险一金，年终奖</div>
  </div>
</li>"#
        )
    }
}
