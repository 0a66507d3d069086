use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::component::container::ComponentContainer;

pub type DynService = Arc<dyn Any + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComponentType {
    /// Service exposed to callers, such as the analytics gateway.
    Public,
    /// Internal service, such as the app itself.
    Private,
    /// Platform adapter standing in for a native module.
    Native,
}

pub type InstanceFactory =
    Arc<dyn Fn(&ComponentContainer) -> Result<DynService, ComponentError> + Send + Sync>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ComponentError {
    MismatchingComponent { expected: String, found: String },
    ComponentAlreadyProvided { name: String },
    InitializationFailed { name: String, reason: String },
    InstanceUnavailable { name: String },
}

impl fmt::Display for ComponentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentError::MismatchingComponent { expected, found } => {
                write!(f, "Component {found} cannot satisfy provider for {expected}")
            }
            ComponentError::ComponentAlreadyProvided { name } => {
                write!(f, "Component {name} has already been registered")
            }
            ComponentError::InitializationFailed { name, reason } => {
                write!(f, "Component {name} failed to initialize: {reason}")
            }
            ComponentError::InstanceUnavailable { name } => {
                write!(f, "Service {name} is not available")
            }
        }
    }
}

impl std::error::Error for ComponentError {}
