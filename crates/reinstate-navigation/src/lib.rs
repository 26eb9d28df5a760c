//! Navigation stacks driven by a state value.
//!
//! [`StackEngine`] mirrors a [`NavigationSurface`]'s stack as a list of
//! [`Frame`]s and decides, for every new state, whether to push a fresh
//! child or pop back to one already in the stack.
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use reinstate_core::{ChildHandle, Completion, Diagnostics, Notice, StateValue};

const NAME: &str = "StackEngine";

/// A stack-shaped surface, the way a navigation controller is one.
pub trait NavigationSurface<C: ChildHandle> {
    /// Replace the whole stack without animation.
    fn set_children(&self, children: Vec<C>);
    /// Bottom to top.
    fn children(&self) -> Vec<C>;
    fn depth(&self) -> usize {
        self.children().len()
    }
    fn push(&self, child: C, animated: bool, done: Completion);
    /// Pop until `child` is on top. `child` must be in the stack.
    fn pop_to(&self, child: &C, animated: bool, done: Completion);
    /// Swap the child at `index` in place, without any visual change.
    fn replace_at(&self, index: usize, child: C);
    /// Called with the new depth every time the stack settles, including
    /// after pops the engine did not ask for (a back gesture).
    fn observe_depth(&self, observer: Box<dyn Fn(usize)>);
}

/// States that know when popping back to an older state is acceptable.
///
/// Usually a broader `==`: two fully equal states must always be poppable.
pub trait NavigationEquatable: PartialEq {
    fn can_pop_to(old: &Self, new: &Self) -> bool {
        old == new
    }
}

/// Decides whether an existing frame's state may be popped back to for a
/// new state.
pub struct PopPolicy<S>(Rc<dyn Fn(&S, &S) -> bool>);

impl<S> Clone for PopPolicy<S> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<S: PartialEq + 'static> PopPolicy<S> {
    pub fn exact() -> Self {
        Self(Rc::new(|old: &S, new: &S| old == new))
    }
}

impl<S: NavigationEquatable + 'static> PopPolicy<S> {
    pub fn navigation_equatable() -> Self {
        Self(Rc::new(|old: &S, new: &S| S::can_pop_to(old, new)))
    }
}

impl<S> PopPolicy<S> {
    pub fn custom(f: impl Fn(&S, &S) -> bool + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn allows(&self, old: &S, new: &S) -> bool {
        (self.0)(old, new)
    }
}

/// One `(state, child)` pair at a stack position.
#[derive(Clone)]
pub struct Frame<S, C> {
    pub state: S,
    pub child: C,
}

impl<S: fmt::Debug, C> fmt::Debug for Frame<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Frame").field(&self.state).finish()
    }
}

struct StackState<S, C> {
    state: S,
    frames: Vec<Frame<S, C>>,
    /// A push or pop issued by the engine has not settled yet.
    in_flight: bool,
    observing: bool,
}

pub struct StackEngine<S: StateValue, C: ChildHandle> {
    inner: Rc<RefCell<StackState<S, C>>>,
    surface: Rc<dyn NavigationSurface<C>>,
    child_for: Rc<dyn Fn(&S) -> C>,
    can_pop_to: PopPolicy<S>,
    diagnostics: Diagnostics,
}

impl<S: StateValue, C: ChildHandle> Clone for StackEngine<S, C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            surface: self.surface.clone(),
            child_for: self.child_for.clone(),
            can_pop_to: self.can_pop_to.clone(),
            diagnostics: self.diagnostics.clone(),
        }
    }
}

impl<S: StateValue, C: ChildHandle> StackEngine<S, C> {
    pub fn new(
        initial: S,
        surface: Rc<dyn NavigationSurface<C>>,
        child_for: impl Fn(&S) -> C + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(StackState {
                state: initial,
                frames: Vec::new(),
                in_flight: false,
                observing: false,
            })),
            surface,
            child_for: Rc::new(child_for),
            can_pop_to: PopPolicy::exact(),
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn with_pop_policy(mut self, policy: PopPolicy<S>) -> Self {
        self.can_pop_to = policy;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn state(&self) -> S {
        self.inner.borrow().state.clone()
    }

    /// States of every frame, bottom to top.
    pub fn states(&self) -> Vec<S> {
        self.inner
            .borrow()
            .frames
            .iter()
            .map(|f| f.state.clone())
            .collect()
    }

    pub fn frames(&self) -> Vec<Frame<S, C>> {
        self.inner.borrow().frames.clone()
    }

    pub fn depth(&self) -> usize {
        self.inner.borrow().frames.len()
    }

    pub fn current_child(&self) -> Option<C> {
        self.inner.borrow().frames.last().map(|f| f.child.clone())
    }

    pub fn is_configured(&self) -> bool {
        !self.inner.borrow().frames.is_empty()
    }

    pub fn configure_initial_state(&self) {
        if self.is_configured() {
            self.diagnostics
                .notice(Notice::RedundantConfiguration { container: NAME });
            return;
        }
        let state = self.state();
        let child = (self.child_for)(&state);
        let subscribe = {
            let mut inner = self.inner.borrow_mut();
            inner.frames = vec![Frame {
                state,
                child: child.clone(),
            }];
            !std::mem::replace(&mut inner.observing, true)
        };
        self.surface.set_children(vec![child]);

        if subscribe {
            let inner = Rc::downgrade(&self.inner);
            let diagnostics = self.diagnostics.clone();
            self.surface.observe_depth(Box::new(move |depth| {
                resync_depth(&inner, depth, &diagnostics);
            }));
        }
    }

    /// Report that the surface's stack now has `depth` children. Frames
    /// above that depth are dropped.
    pub fn depth_changed(&self, depth: usize) {
        resync_depth(&Rc::downgrade(&self.inner), depth, &self.diagnostics);
    }

    /// Move to `to`, pushing a new child or popping back to an existing one.
    ///
    /// A child that is already in the stack is always popped to, even when
    /// `can_pop` is false.
    pub fn transition(&self, to: S, can_pop: bool, animated: bool, completion: Completion) {
        if !self.is_configured() {
            self.diagnostics
                .notice(Notice::TransitionBeforeConfiguration { container: NAME });
            self.inner.borrow_mut().state = to;
            self.configure_initial_state();
            completion.run();
            return;
        }

        let child = (self.child_for)(&to);

        let duplicate = self
            .inner
            .borrow()
            .frames
            .iter()
            .position(|f| f.child.is_same(&child));
        if duplicate.is_some() {
            self.diagnostics.notice(Notice::ChildAlreadyInStack {
                state: format!("{to:?}"),
            });
            self.pop_to(child, to, animated, completion);
            return;
        }

        let existing = if can_pop {
            let inner = self.inner.borrow();
            let found = inner
                .frames
                .iter()
                .rposition(|f| self.can_pop_to.allows(&f.state, &to))
                .map(|index| (index, inner.frames[index].clone()));
            found
        } else {
            None
        };

        match existing {
            Some((_, frame)) if frame.state == to => {
                self.pop_to(frame.child, to, animated, completion);
            }
            Some((index, _)) => {
                self.surface.replace_at(index, child.clone());
                self.inner.borrow_mut().frames[index] = Frame {
                    state: to.clone(),
                    child: child.clone(),
                };
                self.pop_to(child, to, animated, completion);
            }
            None => self.push(child, to, animated, completion),
        }
    }

    fn pop_to(&self, child: C, to: S, animated: bool, completion: Completion) {
        log::trace!("stack: pop to {to:?}");
        let commit = {
            let inner = self.inner.clone();
            let surface = self.surface.clone();
            move || {
                let depth = surface.depth();
                let mut guard = inner.borrow_mut();
                let inner = &mut *guard;
                inner.in_flight = false;
                inner.frames.truncate(depth);
                if let Some(top) = inner.frames.last_mut() {
                    top.state = to.clone();
                }
                inner.state = to;
            }
        };
        self.inner.borrow_mut().in_flight = true;
        self.surface
            .pop_to(&child, animated, completion.after(commit));
    }

    fn push(&self, child: C, to: S, animated: bool, completion: Completion) {
        log::trace!("stack: push {to:?}");
        let commit = {
            let inner = self.inner.clone();
            let surface = self.surface.clone();
            let diagnostics = self.diagnostics.clone();
            let child = child.clone();
            move || {
                let depth = surface.depth();
                let mut guard = inner.borrow_mut();
                let inner = &mut *guard;
                inner.in_flight = false;
                if depth > inner.frames.len() {
                    inner.frames.push(Frame {
                        state: to.clone(),
                        child,
                    });
                    inner.state = to;
                    return;
                }
                // Popped again before the push settled.
                inner.frames.truncate(depth);
                diagnostics.notice(Notice::ExternalPop { depth });
                if let Some(top) = inner.frames.last() {
                    inner.state = top.state.clone();
                }
            }
        };
        self.inner.borrow_mut().in_flight = true;
        self.surface.push(child, animated, completion.after(commit));
    }
}

fn resync_depth<S: StateValue, C: ChildHandle>(
    inner: &Weak<RefCell<StackState<S, C>>>,
    depth: usize,
    diagnostics: &Diagnostics,
) {
    let Some(inner) = inner.upgrade() else {
        return;
    };
    let inner = &mut *inner.borrow_mut();
    if depth >= inner.frames.len() {
        return;
    }
    inner.frames.truncate(depth);
    if inner.in_flight {
        return;
    }
    diagnostics.notice(Notice::ExternalPop { depth });
    if let Some(top) = inner.frames.last() {
        inner.state = top.state.clone();
    }
}
