use std::cell::{Cell, RefCell};

use reinstate_core::{ChildHandle, Lifecycle, TabSurface};

/// A headless tab bar. Every child stays attached for the host's lifetime;
/// only the selection changes.
pub struct TabHost<C: ChildHandle> {
    children: RefCell<Vec<C>>,
    selected: Cell<Option<usize>>,
    observers: RefCell<Vec<Box<dyn Fn(usize)>>>,
}

impl<C: ChildHandle> Default for TabHost<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ChildHandle> TabHost<C> {
    pub fn new() -> Self {
        Self {
            children: RefCell::new(Vec::new()),
            selected: Cell::new(None),
            observers: RefCell::new(Vec::new()),
        }
    }

    pub fn children(&self) -> Vec<C> {
        self.children.borrow().clone()
    }

    pub fn selected_child(&self) -> Option<C> {
        let index = self.selected.get()?;
        self.children.borrow().get(index).cloned()
    }

    /// Select a tab the way a user tap would, telling observers. Returns
    /// false for an out-of-range index or a tap on the selected tab.
    pub fn tap(&self, index: usize) -> bool {
        if index >= self.children.borrow().len() || self.selected.get() == Some(index) {
            return false;
        }
        self.selected.set(Some(index));
        for observer in self.observers.borrow().iter() {
            observer(index);
        }
        true
    }
}

impl<C: ChildHandle> TabSurface<C> for TabHost<C> {
    fn set_children(&self, children: Vec<C>) {
        for child in &children {
            child.lifecycle(Lifecycle::WillAttach);
        }
        let old = std::mem::replace(&mut *self.children.borrow_mut(), children.clone());
        for child in old {
            child.lifecycle(Lifecycle::WillDetach);
            child.lifecycle(Lifecycle::DidDetach);
        }
        for child in &children {
            child.lifecycle(Lifecycle::DidAttach);
        }
        self.selected.set(None);
    }

    fn select(&self, index: usize) {
        if index < self.children.borrow().len() {
            self.selected.set(Some(index));
        }
    }

    fn selected(&self) -> Option<usize> {
        self.selected.get()
    }

    fn observe_selection(&self, observer: Box<dyn Fn(usize)>) {
        self.observers.borrow_mut().push(observer);
    }
}
