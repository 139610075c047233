//! Headless Chrome implementation of the session trait

use crate::browser::{BrowserError, BrowserResult, Category, Session};
use crate::config::BrowserConfig;
use headless_chrome::{Browser, LaunchOptionsBuilder, Tab};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Toggle that expands the first category group of the index menu
const MENU_TOGGLE_SELECTOR: &str = "#main dl dd b";

/// Category links inside the expanded menu
const CATEGORY_LINK_SELECTOR: &str = "#main dl div ul li div a";

/// Listing elements of a loaded category page
const LISTING_SELECTOR: &str = "ul.job-list-box > li";

/// Reads the expanded menu into (group heading, link text) pairs. Run as a
/// single script so each link is paired with its `h4` heading in one DOM
/// pass.
const CATEGORY_SCRAPE_JS: &str = r#"
JSON.stringify(Array.from(
  document.querySelectorAll('#main dl div ul li div a')
).map(a => {
  const item = a.closest('li');
  const heading = item ? item.querySelector('h4') : null;
  return {
    name: heading ? heading.innerText.trim() : '',
    sub_name: (a.innerText || '').trim(),
  };
}))
"#;

#[derive(Debug, Deserialize)]
struct CategoryEntry {
    name: String,
    sub_name: String,
}

/// The browser crate reports failures as `anyhow` errors; collapse them
/// into the driver variant.
fn driver_err(e: anyhow::Error) -> BrowserError {
    BrowserError::Driver(e.to_string())
}

/// A session over one headless Chrome tab.
///
/// The `Browser` handle is held for the lifetime of the session; dropping
/// it terminates the Chrome process.
pub struct ChromeSession {
    _browser: Browser,
    tab: Arc<Tab>,
    index_url: String,
}

impl ChromeSession {
    /// Launches Chrome and opens a fresh tab.
    ///
    /// Driver discovery is delegated to the browser crate; an explicit
    /// binary path from the config takes precedence.
    pub fn launch(config: &BrowserConfig, index_url: &str) -> BrowserResult<Self> {
        let options = LaunchOptionsBuilder::default()
            .headless(config.headless)
            .path(config.chrome_path.clone().map(PathBuf::from))
            .sandbox(false)
            .build()
            .map_err(|e| BrowserError::Driver(e.to_string()))?;

        let browser = Browser::new(options).map_err(driver_err)?;
        let tab = browser.new_tab().map_err(driver_err)?;

        Ok(Self {
            _browser: browser,
            tab,
            index_url: index_url.to_string(),
        })
    }

    fn navigate(&self, url: &str) -> BrowserResult<()> {
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| BrowserError::Navigation(format!("{url}: {e}")))?;
        Ok(())
    }

    fn evaluate(&self, expression: &str) -> BrowserResult<Option<serde_json::Value>> {
        let result = self.tab.evaluate(expression, false).map_err(driver_err)?;
        Ok(result.value)
    }
}

impl Session for ChromeSession {
    fn open_index(&mut self) -> BrowserResult<()> {
        let url = self.index_url.clone();
        self.navigate(&url)
    }

    fn back(&mut self) -> BrowserResult<()> {
        self.evaluate("history.back()")?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| BrowserError::Navigation(format!("history back: {e}")))?;
        Ok(())
    }

    fn open_menu(&mut self) -> BrowserResult<()> {
        let toggle = self
            .tab
            .find_element(MENU_TOGGLE_SELECTOR)
            .map_err(|_| BrowserError::ElementNotFound(MENU_TOGGLE_SELECTOR.to_string()))?;
        toggle.click().map_err(driver_err)?;
        Ok(())
    }

    fn category_links(&mut self) -> BrowserResult<Vec<Category>> {
        let value = self
            .evaluate(CATEGORY_SCRAPE_JS)?
            .ok_or_else(|| BrowserError::ElementNotFound(CATEGORY_LINK_SELECTOR.to_string()))?;
        let json = value
            .as_str()
            .ok_or_else(|| BrowserError::Driver("category scrape returned non-string".to_string()))?;
        let entries: Vec<CategoryEntry> = serde_json::from_str(json)
            .map_err(|e| BrowserError::Driver(format!("category scrape: {e}")))?;

        Ok(entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| Category {
                name: entry.name,
                sub_name: entry.sub_name,
                index,
            })
            .collect())
    }

    fn click_category(&mut self, index: usize) -> BrowserResult<()> {
        let links = self
            .tab
            .find_elements(CATEGORY_LINK_SELECTOR)
            .map_err(|_| BrowserError::ElementNotFound(CATEGORY_LINK_SELECTOR.to_string()))?;
        let link = links.get(index).ok_or_else(|| {
            BrowserError::ElementNotFound(format!("category link at position {index}"))
        })?;
        link.click().map_err(driver_err)?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| BrowserError::Navigation(format!("category {index}: {e}")))?;
        Ok(())
    }

    fn scroll_to_bottom(&mut self) -> BrowserResult<()> {
        self.evaluate("window.scrollTo(0, document.body.scrollHeight);")?;
        Ok(())
    }

    fn listing_sources(&mut self) -> BrowserResult<Vec<String>> {
        // A category page with no listings is a valid empty batch, not an
        // error.
        let elements = match self.tab.find_elements(LISTING_SELECTOR) {
            Ok(elements) => elements,
            Err(_) => return Ok(Vec::new()),
        };

        let mut sources = Vec::with_capacity(elements.len());
        for element in &elements {
            match element.get_content() {
                Ok(html) => sources.push(html),
                Err(e) => {
                    tracing::warn!("Failed to read listing element: {}", e);
                }
            }
        }
        Ok(sources)
    }
}
