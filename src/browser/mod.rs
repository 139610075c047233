//! Browser session abstraction
//!
//! The crawl loop drives a single stateful browser session through a small
//! set of page-level operations. The trait is the seam between the crawl
//! orchestration and the actual DOM: one implementation drives a headless
//! Chrome tab, tests use a scripted session.

mod chrome;

pub use chrome::ChromeSession;

use thiserror::Error;

/// Errors raised by browser-level operations
#[derive(Debug, Error)]
pub enum BrowserError {
    /// A selector matched nothing. The menu toggle disappearing is the
    /// most common failure, typically a layout change or a verification
    /// challenge blocking the page.
    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("browser call failed: {0}")]
    Driver(String),
}

/// Result type alias for browser operations
pub type BrowserResult<T> = std::result::Result<T, BrowserError>;

/// One entry of the category menu.
///
/// Categories are re-derived from the live menu on every cycle; a handle
/// from a previous cycle is stale once the page navigates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub sub_name: String,
    pub index: usize,
}

/// Page-level operations over the shared browser session
pub trait Session {
    /// Navigates to the site index page
    fn open_index(&mut self) -> BrowserResult<()>;

    /// Goes back one step in browser history
    fn back(&mut self) -> BrowserResult<()>;

    /// Clicks the top-level menu toggle so the category links render
    fn open_menu(&mut self) -> BrowserResult<()>;

    /// Reads the currently rendered category links, in menu order
    fn category_links(&mut self) -> BrowserResult<Vec<Category>>;

    /// Clicks the category link at the given menu position
    fn click_category(&mut self, index: usize) -> BrowserResult<()>;

    /// Scrolls to the bottom of the current page
    fn scroll_to_bottom(&mut self) -> BrowserResult<()>;

    /// Returns the HTML of every listing element on the current page
    fn listing_sources(&mut self) -> BrowserResult<Vec<String>>;
}
