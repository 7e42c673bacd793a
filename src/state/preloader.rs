//! Preloader Sequencer - One-shot intro timeline
//!
//! Plays the title intro and signals once when the main view may appear:
//!
//! ```text
//! Entering ──1000ms──▶ Visible ──750ms──▶ FadingText ──800ms──▶ FadingOut ──800ms──▶ Done
//!  text fades in         hold              text fades out        surface fades out     onLoaded()
//!  and slides to 0
//! ```
//!
//! Stages are chained by stage-completion timeouts. A separate frame interval
//! samples the active tween into signals. Every tween uses power3.inOut.
//!
//! A [`PreloaderHandle`] is one run. Its notifier guard is private to that
//! run, so two handles can never share or corrupt each other's one-shot.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use spark_signals::{signal, Signal};

use super::loaded::LoadedNotifier;
use super::scheduler::{Scheduler, TimerHandle};
use crate::types::PreloaderStage;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Preloader timeline configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreloaderConfig {
    /// Title fade/slide in (default: 1000ms).
    pub enter: Duration,
    /// Hold before the title fades (default: 750ms).
    pub hold: Duration,
    /// Title fade out (default: 800ms).
    pub text_fade: Duration,
    /// Whole surface fade out (default: 800ms).
    pub surface_fade: Duration,
    /// Tween sampling period (default: 16ms).
    pub frame_interval: Duration,
    /// Rows the title starts above its resting position (default: 2.0).
    pub entry_offset: f32,
}

impl Default for PreloaderConfig {
    fn default() -> Self {
        Self {
            enter: Duration::from_millis(1000),
            hold: Duration::from_millis(750),
            text_fade: Duration::from_millis(800),
            surface_fade: Duration::from_millis(800),
            frame_interval: Duration::from_millis(16),
            entry_offset: 2.0,
        }
    }
}

impl PreloaderConfig {
    /// Length of a stage. `Done` has none.
    pub fn stage_duration(&self, stage: PreloaderStage) -> Duration {
        match stage {
            PreloaderStage::Entering => self.enter,
            PreloaderStage::Visible => self.hold,
            PreloaderStage::FadingText => self.text_fade,
            PreloaderStage::FadingOut => self.surface_fade,
            PreloaderStage::Done => Duration::ZERO,
        }
    }

    /// Time from `run` until `onLoaded`.
    pub fn total(&self) -> Duration {
        self.enter + self.hold + self.text_fade + self.surface_fade
    }
}

// =============================================================================
// EASING + FRAME SAMPLING
// =============================================================================

/// Cubic ease-in-out (power3.inOut). Input and output clamped to [0, 1].
pub fn power3_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Visual state of the preloader at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreloaderFrame {
    pub text_opacity: f32,
    /// Rows above the resting position (positive = higher).
    pub text_offset: f32,
    pub surface_opacity: f32,
    /// False once the surface is removed from the view.
    pub visible: bool,
}

impl PreloaderFrame {
    /// Initial frame: title hidden and raised, surface opaque.
    pub fn initial(config: &PreloaderConfig) -> Self {
        Self {
            text_opacity: 0.0,
            text_offset: config.entry_offset,
            surface_opacity: 1.0,
            visible: true,
        }
    }

    /// Sample `stage` at `elapsed` time into it.
    pub fn sample(config: &PreloaderConfig, stage: PreloaderStage, elapsed: Duration) -> Self {
        let progress = |duration: Duration| {
            if duration.is_zero() {
                1.0
            } else {
                power3_in_out(elapsed.as_secs_f32() / duration.as_secs_f32())
            }
        };

        match stage {
            PreloaderStage::Entering => {
                let p = progress(config.enter);
                Self {
                    text_opacity: p,
                    text_offset: config.entry_offset * (1.0 - p),
                    surface_opacity: 1.0,
                    visible: true,
                }
            }
            PreloaderStage::Visible => Self {
                text_opacity: 1.0,
                text_offset: 0.0,
                surface_opacity: 1.0,
                visible: true,
            },
            PreloaderStage::FadingText => Self {
                text_opacity: 1.0 - progress(config.text_fade),
                text_offset: 0.0,
                surface_opacity: 1.0,
                visible: true,
            },
            PreloaderStage::FadingOut => Self {
                text_opacity: 0.0,
                text_offset: 0.0,
                surface_opacity: 1.0 - progress(config.surface_fade),
                visible: true,
            },
            PreloaderStage::Done => Self {
                text_opacity: 0.0,
                text_offset: 0.0,
                surface_opacity: 0.0,
                visible: false,
            },
        }
    }
}

// =============================================================================
// SEQUENCER
// =============================================================================

struct PreloaderState {
    stage: PreloaderStage,
    stage_started: Duration,
    frame_timer: Option<TimerHandle>,
    stage_timer: Option<TimerHandle>,
}

struct PreloaderShared {
    config: PreloaderConfig,
    state: RefCell<PreloaderState>,
    notifier: LoadedNotifier,
    stage_signal: Signal<PreloaderStage>,
    frame_signal: Signal<PreloaderFrame>,
}

impl PreloaderShared {
    fn publish_frame(&self, now: Duration) {
        let (stage, started) = {
            let state = self.state.borrow();
            (state.stage, state.stage_started)
        };
        let elapsed = now.saturating_sub(started);
        self.frame_signal.set(PreloaderFrame::sample(&self.config, stage, elapsed));
    }

    fn take_timers(&self) -> Vec<TimerHandle> {
        let mut state = self.state.borrow_mut();
        state.frame_timer.take().into_iter().chain(state.stage_timer.take()).collect()
    }
}

/// Entry point for the intro timeline.
pub struct PreloaderSequencer;

impl PreloaderSequencer {
    /// Start the Entering stage. `on_loaded` runs exactly once, after
    /// FadingOut completes, unless the run is canceled first.
    pub fn run(
        scheduler: &Scheduler,
        config: PreloaderConfig,
        on_loaded: impl FnOnce() + 'static,
    ) -> PreloaderHandle {
        let now = scheduler.now();
        let shared = Rc::new(PreloaderShared {
            config,
            state: RefCell::new(PreloaderState {
                stage: PreloaderStage::Entering,
                stage_started: now,
                frame_timer: None,
                stage_timer: None,
            }),
            notifier: LoadedNotifier::new(on_loaded),
            stage_signal: signal(PreloaderStage::Entering),
            frame_signal: signal(PreloaderFrame::initial(&config)),
        });

        tracing::debug!(total = ?config.total(), "preloader started");

        let weak = Rc::downgrade(&shared);
        let frame_timer = scheduler.set_interval(
            config.frame_interval,
            Box::new(move |sched| {
                if let Some(shared) = weak.upgrade() {
                    shared.publish_frame(sched.now());
                }
            }),
        );
        shared.state.borrow_mut().frame_timer = Some(frame_timer);
        arm_stage_end(&shared, scheduler);

        PreloaderHandle {
            scheduler: scheduler.clone(),
            shared,
        }
    }
}

fn arm_stage_end(shared: &Rc<PreloaderShared>, scheduler: &Scheduler) {
    let stage = shared.state.borrow().stage;
    let weak = Rc::downgrade(shared);
    let handle = scheduler.set_timeout(
        shared.config.stage_duration(stage),
        Box::new(move |sched| {
            if let Some(shared) = weak.upgrade() {
                on_stage_complete(&shared, sched);
            }
        }),
    );
    shared.state.borrow_mut().stage_timer = Some(handle);
}

fn on_stage_complete(shared: &Rc<PreloaderShared>, scheduler: &Scheduler) {
    let now = scheduler.now();
    let next = {
        let mut state = shared.state.borrow_mut();
        state.stage_timer = None;
        state.stage = state.stage.next();
        state.stage_started = now;
        state.stage
    };
    tracing::debug!(stage = ?next, at = ?now, "preloader stage");
    shared.stage_signal.set(next);
    shared.publish_frame(now);

    if next == PreloaderStage::Done {
        for handle in shared.take_timers() {
            scheduler.clear(handle);
        }
        shared.notifier.fire();
    } else {
        arm_stage_end(shared, scheduler);
    }
}

/// One run of the preloader. Dropping it cancels the run.
pub struct PreloaderHandle {
    scheduler: Scheduler,
    shared: Rc<PreloaderShared>,
}

impl PreloaderHandle {
    /// Tear down the timeline without invoking `onLoaded`.
    ///
    /// A completed run is left as is.
    pub fn cancel(&self) {
        for handle in self.shared.take_timers() {
            self.scheduler.clear(handle);
        }
        if !self.is_done() {
            self.shared.notifier.disarm();
            tracing::debug!(stage = ?self.stage(), "preloader canceled");
        }
    }

    pub fn stage(&self) -> PreloaderStage {
        self.shared.state.borrow().stage
    }

    /// Latest sampled frame.
    pub fn frame(&self) -> PreloaderFrame {
        self.shared.frame_signal.get()
    }

    pub fn is_done(&self) -> bool {
        self.stage() == PreloaderStage::Done
    }

    /// Whether `onLoaded` has been delivered (or the run was canceled).
    pub fn has_signaled(&self) -> bool {
        self.shared.notifier.has_fired()
    }

    pub fn stage_signal(&self) -> Signal<PreloaderStage> {
        self.shared.stage_signal.clone()
    }

    pub fn frame_signal(&self) -> Signal<PreloaderFrame> {
        self.shared.frame_signal.clone()
    }

    pub fn config(&self) -> &PreloaderConfig {
        &self.shared.config
    }
}

impl Drop for PreloaderHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn counter() -> (Rc<Cell<u32>>, impl FnOnce() + 'static) {
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        (count, move || count_clone.set(count_clone.get() + 1))
    }

    #[test]
    fn test_easing_endpoints_and_symmetry() {
        assert_eq!(power3_in_out(0.0), 0.0);
        assert_eq!(power3_in_out(1.0), 1.0);
        assert!((power3_in_out(0.5) - 0.5).abs() < 1e-6);
        assert!((power3_in_out(0.25) + power3_in_out(0.75) - 1.0).abs() < 1e-6);
        assert_eq!(power3_in_out(-1.0), 0.0);
        assert_eq!(power3_in_out(2.0), 1.0);
    }

    #[test]
    fn test_stages_follow_timeline() {
        let scheduler = Scheduler::new();
        let (count, on_loaded) = counter();
        let handle = PreloaderSequencer::run(&scheduler, PreloaderConfig::default(), on_loaded);

        assert_eq!(handle.stage(), PreloaderStage::Entering);
        scheduler.advance_to(ms(999));
        assert_eq!(handle.stage(), PreloaderStage::Entering);
        scheduler.advance_to(ms(1000));
        assert_eq!(handle.stage(), PreloaderStage::Visible);
        scheduler.advance_to(ms(1750));
        assert_eq!(handle.stage(), PreloaderStage::FadingText);
        scheduler.advance_to(ms(2550));
        assert_eq!(handle.stage(), PreloaderStage::FadingOut);
        assert_eq!(count.get(), 0);

        scheduler.advance_to(ms(3349));
        assert_eq!(count.get(), 0);
        scheduler.advance_to(ms(3350));
        assert_eq!(handle.stage(), PreloaderStage::Done);
        assert_eq!(count.get(), 1);
        assert!(!handle.frame().visible);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_on_loaded_exactly_once() {
        let scheduler = Scheduler::new();
        let (count, on_loaded) = counter();
        let handle = PreloaderSequencer::run(&scheduler, PreloaderConfig::default(), on_loaded);

        scheduler.advance_by(ms(10_000));
        handle.cancel();
        drop(handle);
        scheduler.advance_by(ms(10_000));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_cancel_never_fires() {
        let scheduler = Scheduler::new();
        let (count, on_loaded) = counter();
        let handle = PreloaderSequencer::run(&scheduler, PreloaderConfig::default(), on_loaded);

        scheduler.advance_to(ms(2000));
        handle.cancel();
        assert_eq!(scheduler.pending_count(), 0);
        scheduler.advance_by(ms(10_000));
        assert_eq!(count.get(), 0);
        assert_eq!(handle.stage(), PreloaderStage::FadingText);
    }

    #[test]
    fn test_drop_cancels() {
        let scheduler = Scheduler::new();
        let (count, on_loaded) = counter();
        let handle = PreloaderSequencer::run(&scheduler, PreloaderConfig::default(), on_loaded);
        scheduler.advance_to(ms(500));
        drop(handle);

        assert_eq!(scheduler.pending_count(), 0);
        scheduler.advance_by(ms(10_000));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_concurrent_runs_have_independent_guards() {
        let scheduler = Scheduler::new();
        let (first, first_cb) = counter();
        let (second, second_cb) = counter();

        let a = PreloaderSequencer::run(&scheduler, PreloaderConfig::default(), first_cb);
        scheduler.advance_to(ms(100));
        let b = PreloaderSequencer::run(&scheduler, PreloaderConfig::default(), second_cb);

        scheduler.advance_to(ms(3350));
        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 0);
        assert!(a.is_done());
        assert!(!b.is_done());

        scheduler.advance_to(ms(3450));
        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 1);
    }

    #[test]
    fn test_frames_animate_opacity_and_offset() {
        let scheduler = Scheduler::new();
        let config = PreloaderConfig::default();
        let handle = PreloaderSequencer::run(&scheduler, config, || {});

        let initial = handle.frame();
        assert_eq!(initial.text_opacity, 0.0);
        assert_eq!(initial.text_offset, config.entry_offset);

        scheduler.advance_to(ms(496));
        let mid = handle.frame();
        assert!(mid.text_opacity > 0.0 && mid.text_opacity < 1.0);
        assert!(mid.text_offset > 0.0 && mid.text_offset < config.entry_offset);

        scheduler.advance_to(ms(1200));
        let held = handle.frame();
        assert_eq!(held.text_opacity, 1.0);
        assert_eq!(held.text_offset, 0.0);

        scheduler.advance_to(ms(2950));
        let fading = handle.frame();
        assert_eq!(fading.text_opacity, 0.0);
        assert!(fading.surface_opacity < 1.0 && fading.surface_opacity > 0.0);
    }

    #[test]
    fn test_sample_is_pure() {
        let config = PreloaderConfig::default();
        let a = PreloaderFrame::sample(&config, PreloaderStage::FadingText, ms(400));
        let b = PreloaderFrame::sample(&config, PreloaderStage::FadingText, ms(400));
        assert_eq!(a, b);
        assert!((a.text_opacity - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_total_duration() {
        assert_eq!(PreloaderConfig::default().total(), ms(3350));
    }
}
