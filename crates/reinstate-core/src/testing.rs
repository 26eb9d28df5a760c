//! Recording test doubles for the surface, child and runner contracts.
//!
//! Everything writes into one shared [`Journal`] so tests can assert on the
//! interleaving of surface calls, lifecycle hooks and effects.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use crate::animation::EffectParams;
use crate::completion::Completion;
use crate::surface::{ChildHandle, EffectRunner, Lifecycle, Surface};

#[derive(Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }
    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

pub fn journal() -> Journal {
    Journal::default()
}

/// A child identified by pointer, named for the journal.
#[derive(Clone)]
pub struct MockChild(Rc<MockChildInner>);

struct MockChildInner {
    name: String,
    journal: Journal,
}

impl MockChild {
    pub fn new(name: impl Into<String>, journal: &Journal) -> Self {
        Self(Rc::new(MockChildInner {
            name: name.into(),
            journal: journal.clone(),
        }))
    }
    pub fn name(&self) -> &str {
        &self.0.name
    }
}

impl fmt::Debug for MockChild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MockChild({})", self.0.name)
    }
}

impl ChildHandle for MockChild {
    fn is_same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
    fn lifecycle(&self, event: Lifecycle) {
        self.0.journal.push(format!("{} {event:?}", self.0.name));
    }
}

#[derive(Default)]
struct SurfaceState {
    adopted: Vec<MockChild>,
    /// Back to front.
    views: Vec<(MockChild, bool)>,
}

pub struct RecordingSurface {
    state: RefCell<SurfaceState>,
    journal: Journal,
}

impl RecordingSurface {
    pub fn new(journal: Journal) -> Self {
        Self {
            state: RefCell::new(SurfaceState::default()),
            journal,
        }
    }

    /// Names of visible views, back to front.
    pub fn visible(&self) -> Vec<String> {
        self.state
            .borrow()
            .views
            .iter()
            .filter(|(_, hidden)| !hidden)
            .map(|(c, _)| c.name().to_string())
            .collect()
    }

    pub fn hosted_count(&self) -> usize {
        self.state.borrow().adopted.len()
    }

    pub fn is_hidden(&self, child: &MockChild) -> bool {
        self.state
            .borrow()
            .views
            .iter()
            .any(|(c, hidden)| c.is_same(child) && *hidden)
    }

    fn view_index(&self, child: &MockChild) -> Option<usize> {
        self.state
            .borrow()
            .views
            .iter()
            .position(|(c, _)| c.is_same(child))
    }
}

impl Surface<MockChild> for RecordingSurface {
    fn adopt(&self, child: &MockChild) {
        self.journal.push(format!("adopt {}", child.name()));
        self.state.borrow_mut().adopted.push(child.clone());
    }

    fn release(&self, child: &MockChild) {
        self.journal.push(format!("release {}", child.name()));
        self.state.borrow_mut().adopted.retain(|c| !c.is_same(child));
    }

    fn hosts(&self, child: &MockChild) -> bool {
        self.state.borrow().adopted.iter().any(|c| c.is_same(child))
    }

    fn insert_view(&self, child: &MockChild) {
        self.journal.push(format!("insert {}", child.name()));
        // a pre-hidden child keeps its flag
        let hidden = self.is_hidden(child);
        let mut state = self.state.borrow_mut();
        state.views.retain(|(c, _)| !c.is_same(child));
        state.views.push((child.clone(), hidden));
    }

    fn remove_view(&self, child: &MockChild) {
        self.journal.push(format!("remove {}", child.name()));
        self.state.borrow_mut().views.retain(|(c, _)| !c.is_same(child));
    }

    fn constrain_to_fill(&self, child: &MockChild) {
        self.journal.push(format!("fill {}", child.name()));
    }

    fn bring_to_front(&self, child: &MockChild) {
        self.journal.push(format!("front {}", child.name()));
        if let Some(i) = self.view_index(child) {
            let mut state = self.state.borrow_mut();
            let v = state.views.remove(i);
            state.views.push(v);
        }
    }

    fn send_to_back(&self, child: &MockChild) {
        self.journal.push(format!("back {}", child.name()));
        if let Some(i) = self.view_index(child) {
            let mut state = self.state.borrow_mut();
            let v = state.views.remove(i);
            state.views.insert(0, v);
        }
    }

    fn set_hidden(&self, child: &MockChild, hidden: bool) {
        self.journal.push(format!(
            "{} {}",
            if hidden { "hide" } else { "show" },
            child.name()
        ));
        let mut state = self.state.borrow_mut();
        match state.views.iter_mut().find(|(c, _)| c.is_same(child)) {
            Some(entry) => entry.1 = hidden,
            // not inserted yet: remember the flag for insert_view
            None => state.views.push((child.clone(), hidden)),
        }
    }
}

/// Holds every effect open until the test finishes it.
pub struct DeferredRunner {
    pending: RefCell<VecDeque<Completion>>,
    journal: Journal,
}

impl DeferredRunner {
    pub fn new(journal: Journal) -> Self {
        Self {
            pending: RefCell::new(VecDeque::new()),
            journal,
        }
    }

    pub fn in_flight(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Finish the oldest in-flight effect. Returns false if none was pending.
    pub fn finish_next(&self) -> bool {
        let next = self.pending.borrow_mut().pop_front();
        match next {
            Some(done) => {
                done.run();
                true
            }
            None => false,
        }
    }

    /// Finish effects, including ones started by earlier completions, until idle.
    pub fn finish_all(&self) {
        while self.finish_next() {}
    }
}

impl EffectRunner for DeferredRunner {
    fn run_effect(&self, params: &EffectParams, work: Box<dyn FnOnce()>, done: Completion) {
        self.journal
            .push(format!("effect {}ms", params.duration.as_millis()));
        work();
        self.pending.borrow_mut().push_back(done);
    }
}
