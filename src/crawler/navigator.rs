//! Category navigator
//!
//! Drives one click-scroll-extract-return cycle per category over the
//! shared browser session, tracking where in the cycle it is. The
//! navigator owns the pacing delays; the session only performs page-level
//! operations.

use crate::browser::{BrowserResult, Category, Session};
use crate::config::CrawlerConfig;
use crate::extract::ListingParser;
use crate::record::JobRecord;
use crate::region::CityIndex;
use rand::Rng;
use std::fmt;
use std::time::Duration;

/// Phase of the current category cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    /// On the index page, menu collapsed
    Idle,
    /// Category links are rendered and clickable
    MenuOpen,
    /// A category page navigation has been triggered
    CategorySelected,
    /// Lazy-loaded listings have been scrolled in
    ListingsLoaded,
    /// The listing batch has been read off the page
    Extracted,
    /// Navigated back, menu not yet reopened
    Returned,
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::MenuOpen => "menu_open",
            Self::CategorySelected => "category_selected",
            Self::ListingsLoaded => "listings_loaded",
            Self::Extracted => "extracted",
            Self::Returned => "returned",
        };
        write!(f, "{name}")
    }
}

/// Blocking delays between navigation steps.
///
/// The scroll pause is a deliberate pacing measure against burst traffic,
/// drawn uniformly from the configured window.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    pub scroll_pause_min: Duration,
    pub scroll_pause_max: Duration,
    pub recovery_settle: Duration,
}

impl Pacing {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            scroll_pause_min: Duration::from_millis(config.scroll_pause_min_ms),
            scroll_pause_max: Duration::from_millis(config.scroll_pause_max_ms),
            recovery_settle: Duration::from_millis(config.recovery_settle_ms),
        }
    }

    /// No delays (for testing)
    #[cfg(test)]
    pub fn none() -> Self {
        Self {
            scroll_pause_min: Duration::ZERO,
            scroll_pause_max: Duration::ZERO,
            recovery_settle: Duration::ZERO,
        }
    }
}

/// Walks the category menu and extracts listing batches
pub struct Navigator<S, P> {
    session: S,
    parser: P,
    pacing: Pacing,
    phase: CyclePhase,
}

impl<S: Session, P: ListingParser> Navigator<S, P> {
    pub fn new(session: S, parser: P, pacing: Pacing) -> Self {
        Self {
            session,
            parser,
            pacing,
            phase: CyclePhase::Idle,
        }
    }

    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    /// Navigates to the index page
    pub fn open_index(&mut self) -> BrowserResult<()> {
        self.session.open_index()?;
        self.phase = CyclePhase::Idle;
        Ok(())
    }

    /// Clicks the menu toggle so the category links render
    pub fn open_menu(&mut self) -> BrowserResult<()> {
        self.session.open_menu()?;
        self.phase = CyclePhase::MenuOpen;
        Ok(())
    }

    /// Reads the live category menu.
    ///
    /// The menu can reload with different contents between cycles, so the
    /// sequence (and its length) is re-derived on every call.
    pub fn list_categories(&mut self) -> BrowserResult<Vec<Category>> {
        self.session.category_links()
    }

    /// Clicks the category link at the given position, triggering a page
    /// navigation
    pub fn select_category(&mut self, index: usize) -> BrowserResult<()> {
        self.session.click_category(index)?;
        self.phase = CyclePhase::CategorySelected;
        Ok(())
    }

    /// Scrolls to the bottom twice with a randomized pause in between so
    /// lazy-loaded listings render
    pub fn load_listings(&mut self) -> BrowserResult<()> {
        self.session.scroll_to_bottom()?;
        let pause = self.scroll_pause();
        if !pause.is_zero() {
            std::thread::sleep(pause);
        }
        self.session.scroll_to_bottom()?;
        self.phase = CyclePhase::ListingsLoaded;
        Ok(())
    }

    /// Extracts every listing element into a record batch.
    ///
    /// A single element failing to parse, or producing a record with a
    /// missing required field, is logged and skipped; it never aborts the
    /// batch.
    pub fn extract_listings(
        &mut self,
        category: &Category,
        create_time: &str,
        cities: &CityIndex,
    ) -> BrowserResult<Vec<JobRecord>> {
        let sources = self.session.listing_sources()?;

        let mut batch = Vec::new();
        for source in &sources {
            let listing = match self.parser.parse(source) {
                Ok(listing) => listing,
                Err(e) => {
                    tracing::warn!("Skipping listing element: {}", e);
                    continue;
                }
            };

            match JobRecord::from_listing(
                listing,
                &category.name,
                &category.sub_name,
                create_time,
                cities,
            ) {
                Ok(record) => batch.push(record),
                Err(e) => tracing::warn!("Discarding listing: {}", e),
            }
        }

        tracing::debug!(
            "Extracted {} records from {} listing elements",
            batch.len(),
            sources.len()
        );
        self.phase = CyclePhase::Extracted;
        Ok(batch)
    }

    /// Returns to the open menu, via browser history first and a full
    /// index reload as fallback
    pub fn return_to_menu(&mut self) -> BrowserResult<()> {
        match self.session.back() {
            Ok(()) => {
                self.phase = CyclePhase::Returned;
                if self.session.open_menu().is_ok() {
                    self.phase = CyclePhase::MenuOpen;
                    return Ok(());
                }
                tracing::debug!("Menu toggle missing after history back, reloading index");
            }
            Err(e) => tracing::debug!("History back failed ({}), reloading index", e),
        }

        self.session.open_index()?;
        self.session.open_menu()?;
        self.phase = CyclePhase::MenuOpen;
        Ok(())
    }

    /// Recovery path after a failed cycle: reload the index, let the page
    /// settle, reopen the menu
    pub fn recover(&mut self) -> BrowserResult<()> {
        self.session.open_index()?;
        if !self.pacing.recovery_settle.is_zero() {
            std::thread::sleep(self.pacing.recovery_settle);
        }
        self.session.open_menu()?;
        self.phase = CyclePhase::MenuOpen;
        Ok(())
    }

    fn scroll_pause(&self) -> Duration {
        let min = self.pacing.scroll_pause_min.as_millis() as u64;
        let max = self.pacing.scroll_pause_max.as_millis() as u64;
        if max == 0 || min >= max {
            return self.pacing.scroll_pause_min;
        }
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }
}
