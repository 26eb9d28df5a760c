use std::fmt::Debug;

use crate::animation::EffectParams;
use crate::completion::Completion;

/// Application state driving a container.
pub trait StateValue: Clone + PartialEq + Debug + 'static {}
impl<T> StateValue for T where T: Clone + PartialEq + Debug + 'static {}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Lifecycle {
    WillAttach,
    DidAttach,
    WillDetach,
    DidDetach,
}

/// An opaque, cheaply cloneable handle to a displayable unit.
pub trait ChildHandle: Clone + 'static {
    /// Referential identity: both handles name the same child instance.
    fn is_same(&self, other: &Self) -> bool;

    fn lifecycle(&self, _event: Lifecycle) {}
}

/// A region able to host children. Layout and drawing are the implementor's
/// business; the engines only drive these calls.
pub trait Surface<C: ChildHandle> {
    /// Register `child` as contained by this surface.
    fn adopt(&self, child: &C);
    fn release(&self, child: &C);
    fn hosts(&self, child: &C) -> bool;

    /// Insert the child's visual on top of the surface's z-order.
    fn insert_view(&self, child: &C);
    fn remove_view(&self, child: &C);
    fn constrain_to_fill(&self, child: &C);
    fn bring_to_front(&self, child: &C);
    fn send_to_back(&self, child: &C);
    fn set_hidden(&self, child: &C, hidden: bool);
}

/// Runs timed visual effects. `work` is the visual change itself and runs
/// when the effect starts; `done` must eventually be fired exactly once.
pub trait EffectRunner {
    fn run_effect(&self, params: &EffectParams, work: Box<dyn FnOnce()>, done: Completion);
}

/// Applies every effect instantly, in the caller's turn.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImmediateRunner;

impl EffectRunner for ImmediateRunner {
    fn run_effect(&self, _params: &EffectParams, work: Box<dyn FnOnce()>, done: Completion) {
        work();
        done.run();
    }
}
