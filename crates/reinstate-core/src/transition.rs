use crate::animation::EffectParams;

/// How an incoming child and an outgoing child are sequenced when one
/// replaces the other. `Option::<TransitionEffect>::None` is an instant swap.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionEffect {
    /// The new child is added on top, then the old one is torn down.
    AppearOverPrevious { on_appear: Option<EffectParams> },
    /// The new child is slipped in underneath, then the old one is removed.
    AppearUnderPrevious { on_remove: Option<EffectParams> },
    /// Add and remove are issued together; done once both finish.
    AppearAndRemoveSimultaneously {
        on_appear: Option<EffectParams>,
        on_remove: Option<EffectParams>,
    },
    /// The old child is removed before the new one is added.
    RemoveThenAppear {
        on_remove: Option<EffectParams>,
        on_appear: Option<EffectParams>,
    },
}

impl TransitionEffect {
    /// Parameters applied while the incoming child is added.
    pub fn addition(&self) -> Option<EffectParams> {
        match *self {
            TransitionEffect::AppearOverPrevious { on_appear } => on_appear,
            TransitionEffect::AppearUnderPrevious { .. } => None,
            TransitionEffect::AppearAndRemoveSimultaneously { on_appear, .. } => on_appear,
            TransitionEffect::RemoveThenAppear { on_appear, .. } => on_appear,
        }
    }

    /// Parameters applied while the outgoing child is removed.
    pub fn removal(&self) -> Option<EffectParams> {
        match *self {
            TransitionEffect::AppearOverPrevious { .. } => None,
            TransitionEffect::AppearUnderPrevious { on_remove } => on_remove,
            TransitionEffect::AppearAndRemoveSimultaneously { on_remove, .. } => on_remove,
            TransitionEffect::RemoveThenAppear { on_remove, .. } => on_remove,
        }
    }

    pub fn cross_fade() -> Self {
        TransitionEffect::AppearOverPrevious {
            on_appear: Some(EffectParams::fade()),
        }
    }
}

/// Effect used by a single-slot container when no policy is installed.
pub fn default_effect<S>(_old: &S, _new: &S) -> Option<TransitionEffect> {
    Some(TransitionEffect::cross_fade())
}
