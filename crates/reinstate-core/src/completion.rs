use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// A zero-argument callback that runs at most once, however many clones
/// of it are fired.
#[derive(Clone)]
pub struct Completion(Rc<RefCell<Option<Box<dyn FnOnce()>>>>);

impl Completion {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Rc::new(RefCell::new(Some(Box::new(f)))))
    }

    pub fn noop() -> Self {
        Self(Rc::new(RefCell::new(None)))
    }

    /// Runs at most once (safe to call multiple times).
    pub fn run(&self) {
        // Take before calling so the callback may re-enter freely.
        let f = self.0.borrow_mut().take();
        if let Some(f) = f {
            f()
        }
    }

    pub fn has_run(&self) -> bool {
        self.0.borrow().is_none()
    }

    /// A completion that runs `first`, then `self`.
    pub fn after(self, first: impl FnOnce() + 'static) -> Completion {
        Completion::new(move || {
            first();
            self.run();
        })
    }
}

impl Default for Completion {
    fn default() -> Self {
        Self::noop()
    }
}

/// Join point: `done` runs once every armed completion has fired.
pub struct Barrier {
    pending: Rc<Cell<usize>>,
    done: Completion,
}

impl Barrier {
    pub fn new(done: Completion) -> Self {
        Self {
            pending: Rc::new(Cell::new(0)),
            done,
        }
    }

    /// Register one participant. Must be called for every participant
    /// before any of them can fire.
    pub fn arm(&self) -> Completion {
        self.pending.set(self.pending.get() + 1);
        let pending = self.pending.clone();
        let done = self.done.clone();
        Completion::new(move || {
            let left = pending.get() - 1;
            pending.set(left);
            if left == 0 {
                done.run();
            }
        })
    }
}
