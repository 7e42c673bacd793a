//! Section navigation over a scrolled page.
//!
//! The page is five sections stacked vertically, each one body-height tall.
//! The scroll position is the only state; the current section and the
//! scroll-to-top hint are derived from it.
//!
//! # Example
//!
//! ```
//! use folio_tui::state::{Navigator, NavigatorConfig, Section};
//!
//! let nav = Navigator::new(NavigatorConfig::default());
//! nav.set_section_height(20);
//! nav.navigate_to(Section::Skills);
//! assert_eq!(nav.scroll(), 60);
//! assert_eq!(nav.current(), Section::Skills);
//! assert!(nav.scroll_top_visible());
//! ```

use spark_signals::{signal, Signal};

// =============================================================================
// Section
// =============================================================================

/// Page sections in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Section {
    #[default]
    Home,
    About,
    Projects,
    Skills,
    Contact,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Home,
        Section::About,
        Section::Projects,
        Section::Skills,
        Section::Contact,
    ];

    /// Anchor id.
    pub const fn id(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::About => "about",
            Self::Projects => "projects",
            Self::Skills => "skills",
            Self::Contact => "contact",
        }
    }

    /// Navigation label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::About => "About",
            Self::Projects => "Projects",
            Self::Skills => "Skills",
            Self::Contact => "Contact",
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Section at a page position, clamped to the last one.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }

    /// Next section, wrapping to Home.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous section, wrapping to Contact.
    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Which section contains `scroll + probe_offset`.
///
/// A zero section height means nothing has been laid out yet: Home.
pub fn current_section(scroll: u16, section_height: u16, probe_offset: u16) -> Section {
    if section_height == 0 {
        return Section::Home;
    }
    let probe = scroll as usize + probe_offset as usize;
    Section::from_index(probe / section_height as usize)
}

// =============================================================================
// Navigator
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigatorConfig {
    /// Rows below the top edge used to decide the current section.
    pub probe_offset: u16,
    /// Scroll rows past which the scroll-to-top hint may show.
    pub scroll_top_threshold: u16,
    /// Rows moved per scroll command.
    pub scroll_step: u16,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            probe_offset: 2,
            scroll_top_threshold: 6,
            scroll_step: 2,
        }
    }
}

/// Reactive scroll position plus section geometry.
#[derive(Clone)]
pub struct Navigator {
    config: NavigatorConfig,
    scroll: Signal<u16>,
    section_height: Signal<u16>,
}

impl Navigator {
    pub fn new(config: NavigatorConfig) -> Self {
        Self {
            config,
            scroll: signal(0),
            section_height: signal(0),
        }
    }

    pub fn config(&self) -> NavigatorConfig {
        self.config
    }

    pub fn scroll(&self) -> u16 {
        self.scroll.get()
    }

    pub fn scroll_signal(&self) -> Signal<u16> {
        self.scroll.clone()
    }

    pub fn section_height(&self) -> u16 {
        self.section_height.get()
    }

    /// Furthest scroll position: the last section at the top.
    pub fn max_scroll(&self) -> u16 {
        let height = self.section_height() as u32;
        (height * (Section::ALL.len() as u32 - 1)).min(u16::MAX as u32) as u16
    }

    /// Update the section height (viewport resize), keeping the current
    /// section at the top.
    pub fn set_section_height(&self, height: u16) {
        if height == self.section_height() {
            return;
        }
        let current = self.current();
        self.section_height.set(height);
        if self.scroll() != 0 {
            self.set_scroll(self.top_of(current));
        }
    }

    pub fn current(&self) -> Section {
        current_section(self.scroll(), self.section_height(), self.config.probe_offset)
    }

    pub fn scroll_top_visible(&self) -> bool {
        self.current() != Section::Home && self.scroll() > self.config.scroll_top_threshold
    }

    pub fn navigate_to(&self, section: Section) {
        tracing::debug!(section = section.id(), "navigate");
        self.set_scroll(self.top_of(section));
    }

    pub fn next_section(&self) {
        self.navigate_to(self.current().next());
    }

    pub fn previous_section(&self) {
        self.navigate_to(self.current().previous());
    }

    /// Scroll by `steps` scroll steps (negative scrolls up), clamped.
    pub fn scroll_by(&self, steps: i32) {
        let delta = steps as i64 * self.config.scroll_step as i64;
        let target = (self.scroll() as i64 + delta).clamp(0, self.max_scroll() as i64);
        self.set_scroll(target as u16);
    }

    pub fn scroll_to_top(&self) {
        self.set_scroll(0);
    }

    fn top_of(&self, section: Section) -> u16 {
        let top = section.index() as u32 * self.section_height() as u32;
        top.min(self.max_scroll() as u32) as u16
    }

    fn set_scroll(&self, value: u16) {
        if value != self.scroll() {
            self.scroll.set(value);
        }
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(NavigatorConfig::default())
    }
}

// =============================================================================
// Tests
// =============================================================================
