use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use reinstate_core::{ChildHandle, Lifecycle};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// A named, identity-compared child presentation that remembers the
/// lifecycle events it received.
#[derive(Clone)]
pub struct Screen(Rc<ScreenInner>);

struct ScreenInner {
    id: u64,
    title: String,
    events: RefCell<Vec<Lifecycle>>,
}

impl Screen {
    pub fn new(title: impl Into<String>) -> Self {
        Self(Rc::new(ScreenInner {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            title: title.into(),
            events: RefCell::new(Vec::new()),
        }))
    }

    pub fn id(&self) -> u64 {
        self.0.id
    }

    pub fn title(&self) -> &str {
        &self.0.title
    }

    pub fn events(&self) -> Vec<Lifecycle> {
        self.0.events.borrow().clone()
    }

    /// Attached and not since detached.
    pub fn is_attached(&self) -> bool {
        matches!(
            self.0.events.borrow().last(),
            Some(Lifecycle::WillAttach | Lifecycle::DidAttach)
        )
    }
}

impl ChildHandle for Screen {
    fn is_same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn lifecycle(&self, event: Lifecycle) {
        log::trace!("{} ({}) {event:?}", self.0.title, self.0.id);
        self.0.events.borrow_mut().push(event);
    }
}

impl fmt::Debug for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Screen({} #{})", self.0.title, self.0.id)
    }
}
