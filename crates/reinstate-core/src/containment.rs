//! Single structural changes against a [`Surface`]: add, remove, replace.
//!
//! Every operation fires its completion exactly once, after any timed
//! effect it started has been reported finished by the [`EffectRunner`].

use std::rc::Rc;

use crate::animation::EffectParams;
use crate::completion::{Barrier, Completion};
use crate::error::ContainerError;
use crate::surface::{ChildHandle, EffectRunner, Lifecycle, Surface};
use crate::transition::TransitionEffect;

pub struct Containment<C: ChildHandle> {
    surface: Rc<dyn Surface<C>>,
    runner: Rc<dyn EffectRunner>,
}

impl<C: ChildHandle> Clone for Containment<C> {
    fn clone(&self) -> Self {
        Self {
            surface: self.surface.clone(),
            runner: self.runner.clone(),
        }
    }
}

impl<C: ChildHandle> Containment<C> {
    pub fn new(surface: Rc<dyn Surface<C>>, runner: Rc<dyn EffectRunner>) -> Self {
        Self { surface, runner }
    }

    pub fn surface(&self) -> &Rc<dyn Surface<C>> {
        &self.surface
    }

    pub fn add_child(&self, child: C, params: Option<EffectParams>, completion: Completion) {
        self.attach(child, params, false, completion);
    }

    /// Panics if `child` is not hosted by the surface.
    pub fn remove_child(&self, child: C, params: Option<EffectParams>, completion: Completion) {
        assert!(
            self.surface.hosts(&child),
            "{}",
            ContainerError::ChildNotHosted
        );
        child.lifecycle(Lifecycle::WillDetach);

        let detach = {
            let surface = self.surface.clone();
            let child = child.clone();
            move || surface.remove_view(&child)
        };
        let finish = {
            let surface = self.surface.clone();
            Completion::new(move || {
                surface.release(&child);
                child.lifecycle(Lifecycle::DidDetach);
                completion.run();
            })
        };

        match params {
            None => {
                detach();
                finish.run();
            }
            Some(p) => self.runner.run_effect(&p, Box::new(detach), finish),
        }
    }

    /// Swap `old` for `new`, ordered according to `effect`.
    /// Panics if `old` is not hosted by the surface.
    pub fn replace_child(
        &self,
        old: C,
        new: C,
        effect: Option<TransitionEffect>,
        completion: Completion,
    ) {
        assert!(self.surface.hosts(&old), "{}", ContainerError::ChildNotHosted);

        match effect {
            None => {
                self.remove_child(old, None, Completion::noop());
                self.add_child(new, None, completion);
            }
            Some(TransitionEffect::AppearOverPrevious { on_appear }) => {
                let this = self.clone();
                self.add_child(
                    new,
                    on_appear,
                    Completion::new(move || this.remove_child(old, None, completion)),
                );
            }
            Some(TransitionEffect::AppearUnderPrevious { on_remove }) => {
                let this = self.clone();
                let revealed = new.clone();
                self.attach(
                    new,
                    None,
                    true,
                    Completion::new(move || {
                        this.surface.send_to_back(&revealed);
                        this.surface.set_hidden(&revealed, false);
                        this.remove_child(old, on_remove, completion);
                    }),
                );
            }
            Some(TransitionEffect::AppearAndRemoveSimultaneously {
                on_appear,
                on_remove,
            }) => {
                let barrier = Barrier::new(completion);
                let added = barrier.arm();
                let removed = barrier.arm();
                self.add_child(new, on_appear, added);
                self.remove_child(old, on_remove, removed);
            }
            Some(TransitionEffect::RemoveThenAppear {
                on_remove,
                on_appear,
            }) => {
                let this = self.clone();
                self.remove_child(
                    old,
                    on_remove,
                    Completion::new(move || this.add_child(new, on_appear, completion)),
                );
            }
        }
    }

    fn attach(&self, child: C, params: Option<EffectParams>, hidden: bool, completion: Completion) {
        self.surface.adopt(&child);
        child.lifecycle(Lifecycle::WillAttach);

        let insert = {
            let surface = self.surface.clone();
            let child = child.clone();
            move || {
                if hidden {
                    surface.set_hidden(&child, true);
                }
                surface.insert_view(&child);
                surface.constrain_to_fill(&child);
            }
        };
        let finish = Completion::new(move || {
            child.lifecycle(Lifecycle::DidAttach);
            completion.run();
        });

        match params {
            None => {
                insert();
                finish.run();
            }
            Some(p) => self.runner.run_effect(&p, Box::new(insert), finish),
        }
    }
}
