//! Headless surfaces, a frame-driven effect runner and the public
//! containers built on them.
//!
//! ```rust
//! use std::rc::Rc;
//! use reinstate_core::Completion;
//! use reinstate_ui::{ManualClock, Screen, Size, StatefulView, TimedRunner};
//! use web_time::Duration;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum Flow { Splash, Home }
//!
//! let clock = ManualClock::new();
//! let runner = Rc::new(TimedRunner::new(Rc::new(clock.clone())));
//! let view = StatefulView::new(Flow::Splash, Size::new(320.0, 480.0), runner.clone(), |s: &Flow| {
//!     Screen::new(format!("{s:?}"))
//! });
//!
//! view.load();
//! view.transition(Flow::Home, true, Completion::noop());
//! assert_eq!(view.state(), Flow::Splash);
//!
//! clock.advance(Duration::from_millis(200));
//! runner.tick();
//! assert_eq!(view.state(), Flow::Home);
//! ```

pub mod containers;
pub mod geometry;
pub mod navigation;
pub mod region;
pub mod runner;
pub mod screen;
pub mod tabs;

pub use containers::*;
pub use geometry::{Rect, Size};
pub use navigation::*;
pub use region::*;
pub use runner::*;
pub use screen::*;
pub use tabs::*;
