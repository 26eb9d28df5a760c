use thiserror::Error;

/// Contract violations. The engines treat these as fatal; the `try_*`
/// entry points hand them back instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContainerError {
    #[error("remove_child requires that the child is hosted by the surface")]
    ChildNotHosted,
    #[error("fixed-set container found an unexpected state: {0}")]
    UnregisteredState(String),
    #[error("fixed-set container needs at least one item")]
    EmptyTabSet,
    #[error("initial state {0} is not one of the registered items")]
    InitialStateNotRegistered(String),
}

pub type Result<T> = std::result::Result<T, ContainerError>;
