//! # State-driven containers
//!
//! Reinstate keeps the visible child of a container in step with an
//! application-defined state value. The application supplies a factory
//! that builds a child for a state; the engines decide how the old child
//! leaves and the new one arrives.
//!
//! - [`Containment`] performs one structural change (add, remove, replace)
//!   against a [`Surface`], sequenced by a [`TransitionEffect`].
//! - [`SingleSlotEngine`] shows exactly one child at a time.
//! - [`FixedSetEngine`] switches between pre-built children, tab style.
//!
//! The navigation stack engine lives in `reinstate-navigation`; concrete
//! surfaces and the timed effect runner live in `reinstate-ui`.
//!
//! ## Completions
//!
//! Every operation is callback driven. A [`Completion`] runs at most once;
//! the engines guarantee it runs exactly once, after all timed effects of
//! the operation have finished, and after the new state is committed:
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use reinstate_core::*;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum Flow { SignIn, Home }
//!
//! #[derive(Clone)]
//! struct Page(Rc<String>);
//! impl ChildHandle for Page {
//!     fn is_same(&self, other: &Self) -> bool { Rc::ptr_eq(&self.0, &other.0) }
//! }
//!
//! /// Inserted pages, back to front.
//! #[derive(Default)]
//! struct Shelf(RefCell<Vec<Page>>);
//! impl Surface<Page> for Shelf {
//!     fn hosts(&self, p: &Page) -> bool { self.0.borrow().iter().any(|q| q.is_same(p)) }
//!     fn insert_view(&self, p: &Page) { self.0.borrow_mut().push(p.clone()) }
//!     fn remove_view(&self, p: &Page) { self.0.borrow_mut().retain(|q| !q.is_same(p)) }
//! #   fn adopt(&self, _: &Page) {}
//! #   fn release(&self, _: &Page) {}
//! #   fn constrain_to_fill(&self, _: &Page) {}
//! #   fn bring_to_front(&self, _: &Page) {}
//! #   fn send_to_back(&self, _: &Page) {}
//! #   fn set_hidden(&self, _: &Page, _: bool) {}
//! }
//!
//! let shelf = Rc::new(Shelf::default());
//! let containment: Containment<Page> = Containment::new(shelf.clone(), Rc::new(ImmediateRunner));
//! let engine = SingleSlotEngine::new(Flow::SignIn, containment, |s: &Flow| {
//!     Page(Rc::new(format!("{s:?}")))
//! });
//!
//! engine.configure_initial_state();
//! engine.transition(Flow::Home, true, Completion::noop());
//! assert_eq!(engine.state(), Flow::Home);
//! let shown: Vec<String> = shelf.0.borrow().iter().map(|p| p.0.to_string()).collect();
//! assert_eq!(shown, ["Home"]);
//! ```
//!
//! ## Diagnostics
//!
//! Recoverable conditions (a transition before configuration, a redundant
//! configuration, an ignored same-state transition) are reported through
//! the [`Diagnostics`] value handed to each engine and logged with the
//! `log` crate under the `reinstate` target. Contract violations panic.

pub mod animation;
pub mod completion;
pub mod containment;
pub mod diagnostics;
pub mod error;
pub mod fixed;
pub mod single;
pub mod surface;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod transition;

pub use animation::*;
pub use completion::*;
pub use containment::*;
pub use diagnostics::*;
pub use error::ContainerError;
pub use fixed::*;
pub use single::*;
pub use surface::*;
pub use transition::*;
