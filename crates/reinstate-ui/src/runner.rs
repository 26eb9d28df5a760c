use std::cell::{Cell, RefCell};
use std::rc::Rc;

use reinstate_core::{Completion, EffectParams, EffectRunner};
use web_time::{Duration, Instant};

pub trait Clock {
    fn now(&self) -> Instant;
}

pub struct SystemClock;
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock you can drive deterministically.
#[derive(Clone)]
pub struct ManualClock(Rc<Cell<Instant>>);

impl ManualClock {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(Instant::now())))
    }
    pub fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.0.get()
    }
}

struct RunningEffect {
    params: EffectParams,
    start: Instant,
    progress: f32,
    done: Completion,
}

/// Effect runner driven by frame ticks against a [`Clock`].
///
/// The visual work runs when the effect starts; its completion fires on the
/// first `tick` at or past the effect's duration.
pub struct TimedRunner {
    clock: Rc<dyn Clock>,
    running: RefCell<Vec<RunningEffect>>,
}

impl TimedRunner {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            clock,
            running: RefCell::new(Vec::new()),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.running.borrow().len()
    }

    /// Eased progress of every in-flight effect, oldest first.
    pub fn progress(&self) -> Vec<f32> {
        self.running.borrow().iter().map(|e| e.progress).collect()
    }

    /// Advance every effect to the clock's current time and complete the
    /// ones that are over. Returns true while anything is still running.
    pub fn tick(&self) -> bool {
        let now = self.clock.now();
        let finished: Vec<Completion> = {
            let mut running = self.running.borrow_mut();
            let mut finished = Vec::new();
            running.retain_mut(|e| {
                let elapsed = now.saturating_duration_since(e.start);
                e.progress = e.params.progress(elapsed);
                if elapsed >= e.params.duration {
                    finished.push(e.done.clone());
                    false
                } else {
                    true
                }
            });
            finished
        };
        // Completions may start follow-up effects.
        for done in finished {
            done.run();
        }
        !self.running.borrow().is_empty()
    }
}

impl EffectRunner for TimedRunner {
    fn run_effect(&self, params: &EffectParams, work: Box<dyn FnOnce()>, done: Completion) {
        work();
        if params.duration.is_zero() {
            done.run();
            return;
        }
        log::trace!(
            "effect started: {:?} over {:?}",
            params.options,
            params.duration
        );
        self.running.borrow_mut().push(RunningEffect {
            params: *params,
            start: self.clock.now(),
            progress: 0.0,
            done,
        });
    }
}
