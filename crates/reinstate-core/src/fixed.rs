use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::diagnostics::{Diagnostics, Notice};
use crate::error::{ContainerError, Result};
use crate::surface::{ChildHandle, StateValue};

const NAME: &str = "FixedSetEngine";

/// A surface presenting a fixed row of children with one selected, the
/// way a tab bar does.
pub trait TabSurface<C: ChildHandle> {
    fn set_children(&self, children: Vec<C>);
    fn select(&self, index: usize);
    fn selected(&self) -> Option<usize>;
    /// Called with the new index whenever the selection changes from outside
    /// (a user tapping a tab), not for `select` calls.
    fn observe_selection(&self, observer: Box<dyn Fn(usize)>);
}

/// One registered `(state, child)` pair.
#[derive(Clone, Debug)]
pub struct TabItem<S, C> {
    pub state: S,
    pub child: C,
}

impl<S, C> TabItem<S, C> {
    pub fn new(state: S, child: C) -> Self {
        Self { state, child }
    }
}

struct TabState {
    current: usize,
    configured: bool,
}

pub struct FixedSetEngine<S: StateValue, C: ChildHandle> {
    items: Rc<[TabItem<S, C>]>,
    inner: Rc<RefCell<TabState>>,
    surface: Rc<dyn TabSurface<C>>,
    diagnostics: Diagnostics,
}

impl<S: StateValue, C: ChildHandle> Clone for FixedSetEngine<S, C> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            inner: self.inner.clone(),
            surface: self.surface.clone(),
            diagnostics: self.diagnostics.clone(),
        }
    }
}

impl<S: StateValue, C: ChildHandle> FixedSetEngine<S, C> {
    /// Items keep their order. Duplicate states are not detected; the first
    /// match wins on lookup.
    pub fn new(
        items: Vec<TabItem<S, C>>,
        initial: &S,
        surface: Rc<dyn TabSurface<C>>,
    ) -> Result<Self> {
        if items.is_empty() {
            return Err(ContainerError::EmptyTabSet);
        }
        let current = items
            .iter()
            .position(|item| &item.state == initial)
            .ok_or_else(|| ContainerError::InitialStateNotRegistered(format!("{initial:?}")))?;
        Ok(Self {
            items: items.into(),
            inner: Rc::new(RefCell::new(TabState {
                current,
                configured: false,
            })),
            surface,
            diagnostics: Diagnostics::default(),
        })
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn items(&self) -> &[TabItem<S, C>] {
        &self.items
    }

    pub fn current_item(&self) -> &TabItem<S, C> {
        &self.items[self.inner.borrow().current]
    }

    pub fn current_index(&self) -> usize {
        self.inner.borrow().current
    }

    pub fn state(&self) -> S {
        self.current_item().state.clone()
    }

    pub fn is_configured(&self) -> bool {
        self.inner.borrow().configured
    }

    pub fn configure_initial_state(&self) {
        if self.is_configured() {
            self.diagnostics
                .notice(Notice::RedundantConfiguration { container: NAME });
            return;
        }
        self.inner.borrow_mut().configured = true;
        self.surface
            .set_children(self.items.iter().map(|item| item.child.clone()).collect());
        self.surface.select(self.current_index());

        let inner = Rc::downgrade(&self.inner);
        let len = self.items.len();
        let diagnostics = self.diagnostics.clone();
        self.surface.observe_selection(Box::new(move |index| {
            sync_selection(&inner, len, index, &diagnostics)
        }));
    }

    /// Select the item registered for `to`.
    pub fn try_transition(&self, to: &S) -> Result<()> {
        let index = self
            .items
            .iter()
            .position(|item| &item.state == to)
            .ok_or_else(|| ContainerError::UnregisteredState(format!("{to:?}")))?;
        self.surface.select(index);
        self.inner.borrow_mut().current = index;
        Ok(())
    }

    /// Panics if `to` is not one of the registered states.
    pub fn transition(&self, to: &S) {
        if let Err(e) = self.try_transition(to) {
            panic!("{e}");
        }
    }
}

fn sync_selection(
    inner: &Weak<RefCell<TabState>>,
    len: usize,
    index: usize,
    diagnostics: &Diagnostics,
) {
    let Some(inner) = inner.upgrade() else {
        return;
    };
    if index < len {
        diagnostics.notice(Notice::ExternalSelection { index });
        inner.borrow_mut().current = index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockChild, journal};
    use std::cell::Cell;

    #[derive(Clone, Debug, PartialEq)]
    enum Tab {
        Feed,
        Search,
        Profile,
        Settings,
    }

    #[derive(Default)]
    struct MockTabs {
        children: RefCell<Vec<MockChild>>,
        selected: Cell<Option<usize>>,
        set_calls: Cell<u32>,
        observers: RefCell<Vec<Box<dyn Fn(usize)>>>,
    }

    impl MockTabs {
        fn tap(&self, index: usize) {
            self.selected.set(Some(index));
            for o in self.observers.borrow().iter() {
                o(index);
            }
        }
    }

    impl TabSurface<MockChild> for MockTabs {
        fn set_children(&self, children: Vec<MockChild>) {
            self.set_calls.set(self.set_calls.get() + 1);
            *self.children.borrow_mut() = children;
        }
        fn select(&self, index: usize) {
            self.selected.set(Some(index));
        }
        fn selected(&self) -> Option<usize> {
            self.selected.get()
        }
        fn observe_selection(&self, observer: Box<dyn Fn(usize)>) {
            self.observers.borrow_mut().push(observer);
        }
    }

    fn items() -> Vec<TabItem<Tab, MockChild>> {
        let j = journal();
        [Tab::Feed, Tab::Search, Tab::Profile]
            .into_iter()
            .map(|t| {
                let c = MockChild::new(format!("{t:?}"), &j);
                TabItem::new(t, c)
            })
            .collect()
    }

    fn engine(initial: Tab) -> (Rc<MockTabs>, FixedSetEngine<Tab, MockChild>) {
        let tabs = Rc::new(MockTabs::default());
        let e = FixedSetEngine::new(items(), &initial, tabs.clone())
            .unwrap()
            .with_diagnostics(Diagnostics::silent());
        (tabs, e)
    }

    #[test]
    fn configure_registers_all_and_selects_initial() {
        let (tabs, e) = engine(Tab::Search);
        e.configure_initial_state();
        e.configure_initial_state();

        assert_eq!(tabs.set_calls.get(), 1);
        assert_eq!(tabs.children.borrow().len(), 3);
        assert_eq!(tabs.selected(), Some(1));
        assert_eq!(e.state(), Tab::Search);
    }

    #[test]
    fn transition_switches_selection_without_building_children() {
        let (tabs, e) = engine(Tab::Feed);
        e.configure_initial_state();
        let profile = e.items()[2].child.clone();

        e.transition(&Tab::Profile);

        assert_eq!(tabs.selected(), Some(2));
        assert_eq!(e.state(), Tab::Profile);
        assert!(e.current_item().child.is_same(&profile));
        assert_eq!(tabs.set_calls.get(), 1);
    }

    #[test]
    #[should_panic(expected = "unexpected state")]
    fn transition_to_unregistered_state_is_fatal() {
        let (_tabs, e) = engine(Tab::Feed);
        e.configure_initial_state();
        e.transition(&Tab::Settings);
    }

    #[test]
    fn try_transition_reports_unregistered_state() {
        let (tabs, e) = engine(Tab::Feed);
        e.configure_initial_state();
        assert_eq!(
            e.try_transition(&Tab::Settings),
            Err(ContainerError::UnregisteredState("Settings".into()))
        );
        assert_eq!(tabs.selected(), Some(0));
        assert_eq!(e.state(), Tab::Feed);
    }

    #[test]
    fn construction_is_validated() {
        let tabs: Rc<dyn TabSurface<MockChild>> = Rc::new(MockTabs::default());
        assert_eq!(
            FixedSetEngine::<Tab, MockChild>::new(Vec::new(), &Tab::Feed, tabs.clone()).err(),
            Some(ContainerError::EmptyTabSet)
        );
        assert_eq!(
            FixedSetEngine::new(items(), &Tab::Settings, tabs).err(),
            Some(ContainerError::InitialStateNotRegistered("Settings".into()))
        );
    }

    #[test]
    fn user_tap_resyncs_current_item() {
        let (tabs, e) = engine(Tab::Feed);
        e.configure_initial_state();
        tabs.tap(2);
        assert_eq!(e.state(), Tab::Profile);
        assert_eq!(e.current_index(), 2);
    }
}
