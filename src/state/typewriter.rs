//! Typewriter - Pure type / pause / erase / pause state machine
//!
//! No timers live here. The machine answers "what does one tick do" and
//! "what happens when a pause ends"; [`super::typing::TypingAnimator`] maps
//! those answers onto scheduler timers.
//!
//! The reveal cursor counts chars, not bytes, so multi-byte text reveals one
//! visible character per tick.

use std::time::Duration;

use crate::types::{Direction, Phase};

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Pacing of the typing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingConfig {
    /// Tick period while typing (default: 100ms per char).
    pub type_interval: Duration,
    /// Tick period while erasing (default: 50ms per char).
    pub erase_interval: Duration,
    /// Hold after the full text is shown (default: 1200ms).
    pub pause_after_typing: Duration,
    /// Hold after the text is fully erased (default: 800ms).
    pub pause_after_erasing: Duration,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            type_interval: Duration::from_millis(100),
            erase_interval: Duration::from_millis(50),
            pause_after_typing: Duration::from_millis(1200),
            pause_after_erasing: Duration::from_millis(800),
        }
    }
}

// =============================================================================
// STEP
// =============================================================================

/// What the host should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Keep ticking at the current period.
    Continue,
    /// Stop ticking and resume after the given delay.
    Pause(Duration),
    /// The machine is paused; the tick changed nothing.
    Idle,
}

// =============================================================================
// MACHINE
// =============================================================================

/// Typing animation state machine over a fixed target string.
#[derive(Debug, Clone)]
pub struct Typewriter {
    text: String,
    /// Byte offset of every char boundary, including the end.
    boundaries: Vec<usize>,
    cursor: usize,
    phase: Phase,
    direction: Direction,
    config: TypingConfig,
}

impl Typewriter {
    /// Create a machine with default pacing, already in the start state.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_config(text, TypingConfig::default())
    }

    /// Create a machine with explicit pacing, already in the start state.
    pub fn with_config(text: impl Into<String>, config: TypingConfig) -> Self {
        let text = text.into();
        let boundaries = text
            .char_indices()
            .map(|(offset, _)| offset)
            .chain(std::iter::once(text.len()))
            .collect();

        Self {
            text,
            boundaries,
            cursor: 0,
            phase: Phase::Typing,
            direction: Direction::Forward,
            config,
        }
    }

    /// Reset to `i = 0`, Typing, Forward. Restarts unconditionally.
    pub fn start(&mut self) {
        self.cursor = 0;
        self.phase = Phase::Typing;
        self.direction = Direction::Forward;
    }

    /// Apply one tick in the current direction.
    pub fn tick(&mut self) -> Step {
        match self.phase {
            Phase::Typing => {
                if self.cursor < self.len() {
                    self.cursor += 1;
                }
                if self.cursor == self.len() {
                    self.phase = Phase::PausedAfterTyping;
                    Step::Pause(self.config.pause_after_typing)
                } else {
                    Step::Continue
                }
            }
            Phase::Erasing => {
                self.cursor = self.cursor.saturating_sub(1);
                if self.cursor == 0 {
                    self.phase = Phase::PausedAfterErasing;
                    Step::Pause(self.config.pause_after_erasing)
                } else {
                    Step::Continue
                }
            }
            Phase::PausedAfterTyping | Phase::PausedAfterErasing => Step::Idle,
        }
    }

    /// End the current pause, flipping direction.
    ///
    /// Returns the tick period of the phase just entered, or None if the
    /// machine was not paused.
    pub fn resume(&mut self) -> Option<Duration> {
        match self.phase {
            Phase::PausedAfterTyping => {
                self.phase = Phase::Erasing;
                self.direction = Direction::Backward;
            }
            Phase::PausedAfterErasing => {
                self.phase = Phase::Typing;
                self.direction = Direction::Forward;
            }
            Phase::Typing | Phase::Erasing => return None,
        }
        Some(self.tick_period())
    }

    /// Tick period of the current phase. Pauses report the period of the
    /// phase they follow.
    pub fn tick_period(&self) -> Duration {
        match self.direction {
            Direction::Forward => self.config.type_interval,
            Direction::Backward => self.config.erase_interval,
        }
    }

    /// Revealed prefix `[0, i)` of the target text.
    pub fn current_text(&self) -> &str {
        &self.text[..self.boundaries[self.cursor]]
    }

    /// True while a tick loop is active (caret shown).
    pub fn is_typing(&self) -> bool {
        self.phase.is_active()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Number of revealed chars.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Target length in chars.
    pub fn len(&self) -> usize {
        self.boundaries.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn config(&self) -> &TypingConfig {
        &self.config
    }
}

// =============================================================================
// TESTS
// =============================================================================
