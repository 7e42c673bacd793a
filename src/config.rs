//! Page configuration.
//!
//! Every field has a default matching the published portfolio; the binary
//! overrides individual fields from command-line flags.

use crate::state::{NavigatorConfig, PreloaderConfig, TypingConfig};

/// Everything the page shell needs to know up front.
#[derive(Debug, Clone, PartialEq)]
pub struct FolioConfig {
    /// Text typed and erased by the hero animator.
    pub headline: String,
    /// Substring of `headline` drawn in the accent color.
    pub name: String,
    /// Preloader title, also the navigation brand.
    pub title: String,
    /// Static line under the headline.
    pub tagline: String,
    pub typing: TypingConfig,
    pub preloader: PreloaderConfig,
    pub navigation: NavigatorConfig,
    /// Caret blink rate. 0 keeps the caret solid.
    pub caret_fps: u8,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            headline: "Hello, I'm Asad Ali".to_string(),
            name: "Asad Ali".to_string(),
            title: "Asad Ali".to_string(),
            tagline: "Full-Stack Web Developer passionate about creating beautiful, \
                      functional web applications that solve real-world problems."
                .to_string(),
            typing: TypingConfig::default(),
            preloader: PreloaderConfig::default(),
            navigation: NavigatorConfig::default(),
            caret_fps: 2,
        }
    }
}
