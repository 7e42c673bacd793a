//! Click Feedback - Shared, lazily-initialized sound resource
//!
//! One [`AudioResource`] is created by the application and handed to every
//! call site that plays a click. It creates its sink at most once, resumes
//! the sink if it is suspended before each use, and swallows every failure:
//! sound is a best-effort side effect and never reaches animation state.
//!
//! # Pattern
//!
//! - `acquire()` - create the sink on first use, reuse afterwards
//! - `resume()` - wake a suspended sink
//! - `play_click()` - acquire + resume + play, errors logged at warn
//! - `prime()` - first-interaction warm-up, done once

use std::cell::{Cell, RefCell};
use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

// =============================================================================
// CLICK TONE
// =============================================================================

/// Envelope of the click sound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickTone {
    /// Oscillator start frequency (Hz).
    pub start_hz: f32,
    /// Frequency reached at the end of the sweep (Hz).
    pub end_hz: f32,
    /// Frequency sweep length.
    pub sweep: Duration,
    /// Peak gain after the attack.
    pub peak_gain: f32,
    /// Total sound length.
    pub length: Duration,
}

impl Default for ClickTone {
    fn default() -> Self {
        Self {
            start_hz: 800.0,
            end_hz: 400.0,
            sweep: Duration::from_millis(100),
            peak_gain: 0.1,
            length: Duration::from_millis(150),
        }
    }
}

// =============================================================================
// SINKS
// =============================================================================

/// Playback state of a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkState {
    Running,
    Suspended,
}

/// Something that can make a click.
pub trait SoundSink {
    fn state(&self) -> SinkState;
    fn resume(&mut self) -> io::Result<()>;
    fn play(&mut self, tone: &ClickTone) -> io::Result<()>;
}

/// Terminal bell. Starts suspended until the first user interaction.
pub struct TerminalBell<W: Write = io::Stdout> {
    out: W,
    state: SinkState,
}

impl TerminalBell {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            state: SinkState::Suspended,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SoundSink for TerminalBell<W> {
    fn state(&self) -> SinkState {
        self.state
    }

    fn resume(&mut self) -> io::Result<()> {
        self.state = SinkState::Running;
        Ok(())
    }

    fn play(&mut self, _tone: &ClickTone) -> io::Result<()> {
        self.out.write_all(b"\x07")?;
        self.out.flush()
    }
}

/// Sink used when sound is disabled.
#[derive(Debug, Default)]
pub struct SilentSink;

impl SoundSink for SilentSink {
    fn state(&self) -> SinkState {
        SinkState::Running
    }

    fn resume(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn play(&mut self, _tone: &ClickTone) -> io::Result<()> {
        Ok(())
    }
}

// =============================================================================
// SHARED RESOURCE
// =============================================================================

type SinkFactory = Box<dyn Fn() -> io::Result<Box<dyn SoundSink>>>;

/// Explicitly owned click-sound resource. Inject one instance everywhere.
pub struct AudioResource {
    factory: SinkFactory,
    sink: RefCell<Option<Box<dyn SoundSink>>>,
    init_attempts: Cell<u32>,
    primed: Cell<bool>,
    tone: ClickTone,
}

impl AudioResource {
    /// Create a resource whose sink is built by `factory` on first use.
    pub fn new(factory: impl Fn() -> io::Result<Box<dyn SoundSink>> + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            sink: RefCell::new(None),
            init_attempts: Cell::new(0),
            primed: Cell::new(false),
            tone: ClickTone::default(),
        }
    }

    /// Terminal bell resource.
    pub fn terminal_bell() -> Self {
        Self::new(|| Ok(Box::new(TerminalBell::stdout()) as Box<dyn SoundSink>))
    }

    /// Resource that never makes a sound.
    pub fn silent() -> Self {
        Self::new(|| Ok(Box::new(SilentSink) as Box<dyn SoundSink>))
    }

    /// Create the sink if it does not exist yet. Returns whether a sink is available.
    ///
    /// A failed creation is retried on the next call.
    pub fn acquire(&self) -> bool {
        if self.sink.borrow().is_some() {
            return true;
        }
        self.init_attempts.set(self.init_attempts.get() + 1);
        match (self.factory)() {
            Ok(sink) => {
                *self.sink.borrow_mut() = Some(sink);
                tracing::debug!("audio sink initialized");
                true
            }
            Err(error) => {
                tracing::warn!(%error, "failed to initialize audio sink");
                false
            }
        }
    }

    /// Resume the sink if it is suspended.
    pub fn resume(&self) {
        let mut sink = self.sink.borrow_mut();
        if let Some(sink) = sink.as_mut() {
            if sink.state() == SinkState::Suspended {
                if let Err(error) = sink.resume() {
                    tracing::warn!(%error, "failed to resume audio sink");
                }
            }
        }
    }

    /// Play the click. Never fails.
    pub fn play_click(&self) {
        if !self.acquire() {
            return;
        }
        self.resume();
        if let Some(sink) = self.sink.borrow_mut().as_mut() {
            if let Err(error) = sink.play(&self.tone) {
                tracing::warn!(%error, "click playback failed");
            }
        }
    }

    /// First-interaction warm-up. Only the first call does anything.
    pub fn prime(&self) {
        if self.primed.replace(true) {
            return;
        }
        if self.acquire() {
            self.resume();
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.sink.borrow().is_some()
    }

    /// How many times sink creation was attempted.
    pub fn init_attempts(&self) -> u32 {
        self.init_attempts.get()
    }

    pub fn sink_state(&self) -> Option<SinkState> {
        self.sink.borrow().as_ref().map(|s| s.state())
    }

    pub fn tone(&self) -> &ClickTone {
        &self.tone
    }
}

impl fmt::Debug for AudioResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioResource")
            .field("initialized", &self.is_initialized())
            .field("init_attempts", &self.init_attempts.get())
            .field("primed", &self.primed.get())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    /// Sink that records plays into a shared counter.
    struct CountingSink {
        state: SinkState,
        plays: Rc<Cell<u32>>,
        fail_play: bool,
    }

    impl SoundSink for CountingSink {
        fn state(&self) -> SinkState {
            self.state
        }

        fn resume(&mut self) -> io::Result<()> {
            self.state = SinkState::Running;
            Ok(())
        }

        fn play(&mut self, _tone: &ClickTone) -> io::Result<()> {
            if self.fail_play {
                return Err(io::Error::other("device gone"));
            }
            self.plays.set(self.plays.get() + 1);
            Ok(())
        }
    }

    fn counting(fail_play: bool) -> (AudioResource, Rc<Cell<u32>>, Rc<Cell<u32>>) {
        let plays = Rc::new(Cell::new(0));
        let created = Rc::new(Cell::new(0));
        let plays_clone = plays.clone();
        let created_clone = created.clone();
        let resource = AudioResource::new(move || {
            created_clone.set(created_clone.get() + 1);
            Ok(Box::new(CountingSink {
                state: SinkState::Suspended,
                plays: plays_clone.clone(),
                fail_play,
            }) as Box<dyn SoundSink>)
        });
        (resource, plays, created)
    }

    #[test]
    fn test_sink_created_at_most_once() {
        let (audio, plays, created) = counting(false);
        assert!(!audio.is_initialized());

        audio.play_click();
        audio.play_click();
        audio.play_click();

        assert_eq!(created.get(), 1);
        assert_eq!(plays.get(), 3);
        assert_eq!(audio.init_attempts(), 1);
    }

    #[test]
    fn test_resumed_before_use() {
        let (audio, _plays, _created) = counting(false);
        assert!(audio.acquire());
        assert_eq!(audio.sink_state(), Some(SinkState::Suspended));
        audio.play_click();
        assert_eq!(audio.sink_state(), Some(SinkState::Running));
    }

    #[test]
    fn test_failures_are_swallowed() {
        let (audio, plays, _created) = counting(true);
        audio.play_click();
        assert_eq!(plays.get(), 0);

        let broken = AudioResource::new(|| Err(io::Error::other("no audio device")));
        broken.play_click();
        broken.play_click();
        assert!(!broken.is_initialized());
        assert_eq!(broken.init_attempts(), 2);
    }

    #[test]
    fn test_prime_runs_once() {
        let (audio, plays, created) = counting(false);
        audio.prime();
        audio.prime();
        assert_eq!(created.get(), 1);
        assert_eq!(plays.get(), 0);
        assert_eq!(audio.sink_state(), Some(SinkState::Running));
    }

    #[test]
    fn test_terminal_bell_writes_bel() {
        let mut bell = TerminalBell::new(Vec::new());
        assert_eq!(bell.state(), SinkState::Suspended);
        bell.resume().unwrap();
        bell.play(&ClickTone::default()).unwrap();
        assert_eq!(bell.into_inner(), b"\x07");
    }

    #[test]
    fn test_default_tone_matches_click_envelope() {
        let tone = ClickTone::default();
        assert_eq!(tone.start_hz, 800.0);
        assert_eq!(tone.end_hz, 400.0);
        assert_eq!(tone.length, Duration::from_millis(150));
    }
}
