use std::fmt;
use std::rc::Rc;

pub const LOG_TARGET: &str = "reinstate";

/// A benign condition an engine recovered from on its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    RedundantConfiguration { container: &'static str },
    TransitionBeforeConfiguration { container: &'static str },
    SameStateIgnored { container: &'static str, state: String },
    ChildAlreadyInStack { state: String },
    ExternalPop { depth: usize },
    ExternalSelection { index: usize },
}

impl Notice {
    pub fn level(&self) -> log::Level {
        match self {
            Notice::SameStateIgnored { .. }
            | Notice::RedundantConfiguration { .. }
            | Notice::ExternalPop { .. }
            | Notice::ExternalSelection { .. } => log::Level::Debug,
            Notice::TransitionBeforeConfiguration { .. } | Notice::ChildAlreadyInStack { .. } => {
                log::Level::Warn
            }
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::RedundantConfiguration { container } => write!(
                f,
                "tried to configure the initial state of {container} multiple times - ignoring"
            ),
            Notice::TransitionBeforeConfiguration { container } => write!(
                f,
                "{container} got a transition before its initial state was configured; treating it as the initial state"
            ),
            Notice::SameStateIgnored { container, state } => {
                write!(f, "{container} ignored a same-state transition: {state}")
            }
            Notice::ChildAlreadyInStack { state } => write!(
                f,
                "child for {state} is already in the navigation stack; popping back to it"
            ),
            Notice::ExternalPop { depth } => {
                write!(f, "navigation stack shrank externally to depth {depth}")
            }
            Notice::ExternalSelection { index } => {
                write!(f, "tab selection changed externally to index {index}")
            }
        }
    }
}

/// Where an engine reports its notices. Passed in explicitly; there is no
/// global switch.
#[derive(Clone)]
pub struct Diagnostics {
    enabled: bool,
    sink: Option<Rc<dyn Fn(&Notice)>>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self {
            enabled: true,
            sink: None,
        }
    }
}

impl Diagnostics {
    pub fn silent() -> Self {
        Self {
            enabled: false,
            sink: None,
        }
    }

    /// Log as usual and also hand every notice to `sink`.
    pub fn with_sink(sink: impl Fn(&Notice) + 'static) -> Self {
        Self {
            enabled: true,
            sink: Some(Rc::new(sink)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn notice(&self, notice: Notice) {
        if !self.enabled {
            return;
        }
        log::log!(target: LOG_TARGET, notice.level(), "{notice}");
        if let Some(sink) = &self.sink {
            sink(&notice);
        }
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("enabled", &self.enabled)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn silent_swallows_everything() {
        let d = Diagnostics::silent();
        assert!(!d.is_enabled());
        d.notice(Notice::ExternalPop { depth: 1 });
    }

    #[test]
    fn sink_sees_notices() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let d = {
            let seen = seen.clone();
            Diagnostics::with_sink(move |n| seen.borrow_mut().push(n.clone()))
        };
        d.notice(Notice::RedundantConfiguration {
            container: "SingleSlotEngine",
        });
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(
            seen.borrow()[0].to_string(),
            "tried to configure the initial state of SingleSlotEngine multiple times - ignoring"
        );
    }
}
