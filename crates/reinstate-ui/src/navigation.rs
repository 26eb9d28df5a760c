use std::cell::{Cell, RefCell};
use std::rc::Rc;

use reinstate_core::{ChildHandle, Completion, EffectParams, EffectRunner, Lifecycle};
use reinstate_navigation::NavigationSurface;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TransitionDir {
    None,
    Push,
    Pop,
}

#[derive(Clone, Copy, Debug)]
pub struct NavTransition {
    pub slide_px: f32,
    pub fade: bool,
    pub params: EffectParams,
}

impl Default for NavTransition {
    fn default() -> Self {
        Self {
            slide_px: 60.0,
            fade: true,
            params: EffectParams::fast(),
        }
    }
}

impl NavTransition {
    /// Horizontal offset and alpha of the top child `progress` of the way
    /// through a move in direction `dir`.
    pub fn frame_style(&self, dir: TransitionDir, progress: f32) -> (f32, f32) {
        if dir == TransitionDir::None {
            return (0.0, 1.0);
        }
        let slide = 1.0 - progress.clamp(0.0, 1.0);
        let dx = slide
            * self.slide_px
            * if dir == TransitionDir::Push {
                1.0
            } else {
                -1.0
            };
        let alpha = if self.fade {
            0.75 + 0.25 * (1.0 - slide)
        } else {
            1.0
        };
        (dx, alpha)
    }
}

struct HostInner<C> {
    stack: RefCell<Vec<C>>,
    observers: RefCell<Vec<Box<dyn Fn(usize)>>>,
    runner: Rc<dyn EffectRunner>,
    transition: Cell<NavTransition>,
    last_dir: Cell<TransitionDir>,
}

/// A headless navigation stack. Animated pushes and pops run through the
/// effect runner; depth observers hear about every settled change,
/// including back gestures.
pub struct NavigationHost<C: ChildHandle> {
    inner: Rc<HostInner<C>>,
}

impl<C: ChildHandle> Clone for NavigationHost<C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<C: ChildHandle> NavigationHost<C> {
    pub fn new(runner: Rc<dyn EffectRunner>) -> Self {
        Self {
            inner: Rc::new(HostInner {
                stack: RefCell::new(Vec::new()),
                observers: RefCell::new(Vec::new()),
                runner,
                transition: Cell::new(NavTransition::default()),
                last_dir: Cell::new(TransitionDir::None),
            }),
        }
    }

    pub fn set_transition(&self, transition: NavTransition) {
        self.inner.transition.set(transition);
    }

    pub fn transition(&self) -> NavTransition {
        self.inner.transition.get()
    }

    pub fn last_dir(&self) -> TransitionDir {
        self.inner.last_dir.get()
    }

    pub fn top(&self) -> Option<C> {
        self.inner.stack.borrow().last().cloned()
    }

    /// Pop one level the way a system back gesture would. The root entry is
    /// never popped.
    pub fn handle_back(&self, animated: bool) -> bool {
        let target = {
            let stack = self.inner.stack.borrow();
            if stack.len() <= 1 {
                return false;
            }
            stack[stack.len() - 2].clone()
        };
        self.pop_to(&target, animated, Completion::noop());
        true
    }

    fn notify(&self) {
        let depth = self.inner.stack.borrow().len();
        for observer in self.inner.observers.borrow().iter() {
            observer(depth);
        }
    }

    fn run(&self, animated: bool, work: impl FnOnce() + 'static, finish: Completion) {
        if animated {
            let params = self.inner.transition.get().params;
            self.inner.runner.run_effect(&params, Box::new(work), finish);
        } else {
            work();
            finish.run();
        }
    }
}

impl<C: ChildHandle> NavigationSurface<C> for NavigationHost<C> {
    fn set_children(&self, children: Vec<C>) {
        for child in &children {
            child.lifecycle(Lifecycle::WillAttach);
        }
        let old = std::mem::replace(&mut *self.inner.stack.borrow_mut(), children.clone());
        for child in old {
            child.lifecycle(Lifecycle::WillDetach);
            child.lifecycle(Lifecycle::DidDetach);
        }
        for child in &children {
            child.lifecycle(Lifecycle::DidAttach);
        }
        self.inner.last_dir.set(TransitionDir::None);
    }

    fn children(&self) -> Vec<C> {
        self.inner.stack.borrow().clone()
    }

    fn depth(&self) -> usize {
        self.inner.stack.borrow().len()
    }

    fn push(&self, child: C, animated: bool, done: Completion) {
        child.lifecycle(Lifecycle::WillAttach);
        self.inner.last_dir.set(TransitionDir::Push);

        let work = {
            let inner = self.inner.clone();
            let child = child.clone();
            move || inner.stack.borrow_mut().push(child)
        };
        let finish = {
            let this = self.clone();
            Completion::new(move || {
                child.lifecycle(Lifecycle::DidAttach);
                this.notify();
                done.run();
            })
        };
        self.run(animated, work, finish);
    }

    fn pop_to(&self, child: &C, animated: bool, done: Completion) {
        let popped: Vec<C> = {
            let stack = self.inner.stack.borrow();
            let index = stack
                .iter()
                .position(|c| c.is_same(child))
                .unwrap_or_else(|| {
                    panic!("pop_to requires a child that is in the navigation stack")
                });
            stack[index + 1..].to_vec()
        };
        if popped.is_empty() {
            done.run();
            return;
        }
        self.inner.last_dir.set(TransitionDir::Pop);
        for c in popped.iter().rev() {
            c.lifecycle(Lifecycle::WillDetach);
        }

        let keep = self.depth() - popped.len();
        let work = {
            let inner = self.inner.clone();
            move || inner.stack.borrow_mut().truncate(keep)
        };
        let finish = {
            let this = self.clone();
            Completion::new(move || {
                for c in popped.iter().rev() {
                    c.lifecycle(Lifecycle::DidDetach);
                }
                this.notify();
                done.run();
            })
        };
        self.run(animated, work, finish);
    }

    fn replace_at(&self, index: usize, child: C) {
        child.lifecycle(Lifecycle::WillAttach);
        let old = std::mem::replace(&mut self.inner.stack.borrow_mut()[index], child.clone());
        old.lifecycle(Lifecycle::WillDetach);
        old.lifecycle(Lifecycle::DidDetach);
        child.lifecycle(Lifecycle::DidAttach);
    }

    fn observe_depth(&self, observer: Box<dyn Fn(usize)>) {
        self.inner.observers.borrow_mut().push(observer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{ManualClock, TimedRunner};
    use crate::screen::Screen;
    use web_time::Duration;

    fn host() -> (ManualClock, Rc<TimedRunner>, NavigationHost<Screen>) {
        let clock = ManualClock::new();
        let runner = Rc::new(TimedRunner::new(Rc::new(clock.clone())));
        let host = NavigationHost::new(runner.clone());
        (clock, runner, host)
    }

    #[test]
    fn back_never_pops_the_root() {
        let (_clock, _runner, host) = host();
        host.set_children(vec![Screen::new("root")]);
        assert!(!host.handle_back(false));
        assert_eq!(host.depth(), 1);
    }

    #[test]
    fn animated_push_settles_on_tick() {
        let (clock, runner, host) = host();
        let depths = Rc::new(RefCell::new(Vec::new()));
        host.observe_depth(Box::new({
            let depths = depths.clone();
            move |d| depths.borrow_mut().push(d)
        }));
        host.set_children(vec![Screen::new("root")]);
        let next = Screen::new("next");

        host.push(next.clone(), true, Completion::noop());
        assert_eq!(host.depth(), 2);
        assert_eq!(host.last_dir(), TransitionDir::Push);
        assert!(depths.borrow().is_empty());

        clock.advance(Duration::from_millis(150));
        runner.tick();
        assert_eq!(*depths.borrow(), vec![2]);
        assert_eq!(
            next.events(),
            vec![Lifecycle::WillAttach, Lifecycle::DidAttach]
        );
    }

    #[test]
    fn back_pops_one_level_and_reports_depth() {
        let (_clock, _runner, host) = host();
        let depths = Rc::new(RefCell::new(Vec::new()));
        host.observe_depth(Box::new({
            let depths = depths.clone();
            move |d| depths.borrow_mut().push(d)
        }));
        let screens: Vec<_> = ["a", "b", "c"].into_iter().map(Screen::new).collect();
        host.set_children(screens.clone());

        assert!(host.handle_back(false));
        assert_eq!(host.depth(), 2);
        assert_eq!(*depths.borrow(), vec![2]);
        assert!(!screens[2].is_attached());
        assert!(host.top().unwrap().is_same(&screens[1]));
    }

    #[test]
    fn frame_style_slides_in_from_the_right_on_push() {
        let t = NavTransition::default();
        assert_eq!(t.frame_style(TransitionDir::Push, 0.0), (60.0, 0.75));
        assert_eq!(t.frame_style(TransitionDir::Push, 1.0), (0.0, 1.0));
        assert_eq!(t.frame_style(TransitionDir::Pop, 0.0).0, -60.0);
        assert_eq!(t.frame_style(TransitionDir::None, 0.3), (0.0, 1.0));
    }
}
