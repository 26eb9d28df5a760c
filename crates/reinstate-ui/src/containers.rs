//! The three public containers: each pairs a headless surface with the
//! engine that drives it.

use std::rc::Rc;

use reinstate_core::{
    ChildHandle, Completion, ContainerError, Containment, Diagnostics, EffectRunner,
    FixedSetEngine, SingleSlotEngine, StateValue, TabItem, TransitionEffect,
};
use reinstate_navigation::{Frame, NavigationSurface, PopPolicy, StackEngine};

use crate::geometry::Size;
use crate::navigation::{NavTransition, NavigationHost};
use crate::region::Region;
use crate::tabs::TabHost;

/// A region showing exactly one child, the one built for the current state.
pub struct StatefulView<S: StateValue, C: ChildHandle> {
    region: Rc<Region<C>>,
    engine: SingleSlotEngine<S, C>,
}

impl<S: StateValue, C: ChildHandle> StatefulView<S, C> {
    pub fn new(
        initial: S,
        bounds: Size,
        runner: Rc<dyn EffectRunner>,
        child_for: impl Fn(&S) -> C + 'static,
    ) -> Self {
        let region = Rc::new(Region::new(bounds));
        let containment = Containment::new(region.clone(), runner);
        Self {
            region,
            engine: SingleSlotEngine::new(initial, containment, child_for),
        }
    }

    pub fn with_effect_policy(
        mut self,
        f: impl Fn(&S, &S) -> Option<TransitionEffect> + 'static,
    ) -> Self {
        self.engine = self.engine.with_effect_policy(f);
        self
    }

    pub fn ignoring_same_state(mut self, ignores: bool) -> Self {
        self.engine = self.engine.ignoring_same_state(ignores);
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.engine = self.engine.with_diagnostics(diagnostics);
        self
    }

    /// Show the child for the initial state. Call once the region is live.
    pub fn load(&self) {
        self.engine.configure_initial_state();
    }

    pub fn transition(&self, to: S, animated: bool, completion: Completion) {
        self.engine.transition(to, animated, completion);
    }

    pub fn state(&self) -> S {
        self.engine.state()
    }

    pub fn current_child(&self) -> Option<C> {
        self.engine.current_child()
    }

    pub fn is_configured(&self) -> bool {
        self.engine.is_configured()
    }

    pub fn region(&self) -> &Region<C> {
        &self.region
    }

    pub fn engine(&self) -> &SingleSlotEngine<S, C> {
        &self.engine
    }
}

/// A navigation stack whose entries follow the state.
pub struct StatefulNavigation<S: StateValue, C: ChildHandle> {
    host: NavigationHost<C>,
    engine: StackEngine<S, C>,
}

impl<S: StateValue, C: ChildHandle> StatefulNavigation<S, C> {
    pub fn new(
        initial: S,
        runner: Rc<dyn EffectRunner>,
        child_for: impl Fn(&S) -> C + 'static,
    ) -> Self {
        let host = NavigationHost::new(runner);
        let surface: Rc<dyn NavigationSurface<C>> = Rc::new(host.clone());
        Self {
            engine: StackEngine::new(initial, surface, child_for),
            host,
        }
    }

    pub fn with_pop_policy(mut self, policy: PopPolicy<S>) -> Self {
        self.engine = self.engine.with_pop_policy(policy);
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.engine = self.engine.with_diagnostics(diagnostics);
        self
    }

    pub fn with_nav_transition(self, transition: NavTransition) -> Self {
        self.host.set_transition(transition);
        self
    }

    pub fn load(&self) {
        self.engine.configure_initial_state();
    }

    /// Move to `to`, popping back to a matching entry when there is one.
    pub fn transition(&self, to: S, animated: bool, completion: Completion) {
        self.engine.transition(to, true, animated, completion);
    }

    pub fn transition_with(&self, to: S, can_pop: bool, animated: bool, completion: Completion) {
        self.engine.transition(to, can_pop, animated, completion);
    }

    pub fn handle_back(&self, animated: bool) -> bool {
        self.host.handle_back(animated)
    }

    pub fn state(&self) -> S {
        self.engine.state()
    }

    pub fn states(&self) -> Vec<S> {
        self.engine.states()
    }

    pub fn frames(&self) -> Vec<Frame<S, C>> {
        self.engine.frames()
    }

    pub fn current_child(&self) -> Option<C> {
        self.engine.current_child()
    }

    pub fn is_configured(&self) -> bool {
        self.engine.is_configured()
    }

    pub fn host(&self) -> &NavigationHost<C> {
        &self.host
    }
}

/// Tabs over a fixed set of pre-built children.
pub struct StatefulTabs<S: StateValue, C: ChildHandle> {
    host: Rc<TabHost<C>>,
    engine: FixedSetEngine<S, C>,
}

impl<S: StateValue, C: ChildHandle> StatefulTabs<S, C> {
    pub fn new(items: Vec<TabItem<S, C>>, initial: &S) -> Result<Self, ContainerError> {
        let host = Rc::new(TabHost::new());
        let engine = FixedSetEngine::new(items, initial, host.clone())?;
        Ok(Self { host, engine })
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.engine = self.engine.with_diagnostics(diagnostics);
        self
    }

    pub fn load(&self) {
        self.engine.configure_initial_state();
    }

    /// Select the tab registered for `to`. Panics if there is none.
    pub fn transition(&self, to: &S) {
        self.engine.transition(to);
    }

    pub fn try_transition(&self, to: &S) -> Result<(), ContainerError> {
        self.engine.try_transition(to)
    }

    /// Select a tab as the user would.
    pub fn tap(&self, index: usize) -> bool {
        self.host.tap(index)
    }

    pub fn state(&self) -> S {
        self.engine.state()
    }

    pub fn current_item(&self) -> &TabItem<S, C> {
        self.engine.current_item()
    }

    pub fn items(&self) -> &[TabItem<S, C>] {
        self.engine.items()
    }

    pub fn is_configured(&self) -> bool {
        self.engine.is_configured()
    }

    pub fn host(&self) -> &TabHost<C> {
        &self.host
    }
}
