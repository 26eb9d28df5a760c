use std::cell::RefCell;
use std::rc::Rc;

use crate::completion::Completion;
use crate::containment::Containment;
use crate::diagnostics::{Diagnostics, Notice};
use crate::surface::{ChildHandle, StateValue};
use crate::transition::{TransitionEffect, default_effect};

const NAME: &str = "SingleSlotEngine";

pub type ChildFactory<S, C> = Rc<dyn Fn(&S) -> C>;
pub type EffectPolicy<S> = Rc<dyn Fn(&S, &S) -> Option<TransitionEffect>>;

struct SlotState<S, C> {
    state: S,
    current: Option<C>,
}

/// Keeps exactly one child, the one produced for the current state, in a
/// surface.
pub struct SingleSlotEngine<S: StateValue, C: ChildHandle> {
    inner: Rc<RefCell<SlotState<S, C>>>,
    containment: Containment<C>,
    child_for: ChildFactory<S, C>,
    effect_for: EffectPolicy<S>,
    ignores_same_state: bool,
    diagnostics: Diagnostics,
}

impl<S: StateValue, C: ChildHandle> Clone for SingleSlotEngine<S, C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            containment: self.containment.clone(),
            child_for: self.child_for.clone(),
            effect_for: self.effect_for.clone(),
            ignores_same_state: self.ignores_same_state,
            diagnostics: self.diagnostics.clone(),
        }
    }
}

impl<S: StateValue, C: ChildHandle> SingleSlotEngine<S, C> {
    pub fn new(
        initial: S,
        containment: Containment<C>,
        child_for: impl Fn(&S) -> C + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SlotState {
                state: initial,
                current: None,
            })),
            containment,
            child_for: Rc::new(child_for),
            effect_for: Rc::new(default_effect::<S>),
            ignores_same_state: true,
            diagnostics: Diagnostics::default(),
        }
    }

    /// Chooses the effect for an animated transition between two states.
    pub fn with_effect_policy(
        mut self,
        f: impl Fn(&S, &S) -> Option<TransitionEffect> + 'static,
    ) -> Self {
        self.effect_for = Rc::new(f);
        self
    }

    /// When false, a transition to the current state builds and swaps in a
    /// fresh child like any other transition.
    pub fn ignoring_same_state(mut self, ignores: bool) -> Self {
        self.ignores_same_state = ignores;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn state(&self) -> S {
        self.inner.borrow().state.clone()
    }

    pub fn current_child(&self) -> Option<C> {
        self.inner.borrow().current.clone()
    }

    pub fn is_configured(&self) -> bool {
        self.inner.borrow().current.is_some()
    }

    pub fn ignores_same_state(&self) -> bool {
        self.ignores_same_state
    }

    pub fn configure_initial_state(&self) {
        if self.is_configured() {
            self.diagnostics
                .notice(Notice::RedundantConfiguration { container: NAME });
            return;
        }
        let state = self.state();
        let child = (self.child_for)(&state);
        self.inner.borrow_mut().current = Some(child.clone());
        self.containment.add_child(child, None, Completion::noop());
    }

    pub fn transition(&self, to: S, animated: bool, completion: Completion) {
        let (current, from) = {
            let inner = self.inner.borrow();
            (inner.current.clone(), inner.state.clone())
        };

        if self.ignores_same_state && to == from {
            self.diagnostics.notice(Notice::SameStateIgnored {
                container: NAME,
                state: format!("{to:?}"),
            });
            return;
        }

        let Some(current) = current else {
            self.diagnostics
                .notice(Notice::TransitionBeforeConfiguration { container: NAME });
            self.inner.borrow_mut().state = to;
            self.configure_initial_state();
            completion.run();
            return;
        };

        let child = (self.child_for)(&to);
        let effect = if animated {
            (self.effect_for)(&from, &to)
        } else {
            None
        };

        let commit = {
            let inner = self.inner.clone();
            let child = child.clone();
            move || {
                let mut inner = inner.borrow_mut();
                inner.state = to;
                inner.current = Some(child);
            }
        };
        self.containment
            .replace_child(current, child, effect, completion.after(commit));
    }
}
