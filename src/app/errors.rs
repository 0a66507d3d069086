use std::fmt;

use crate::component::ComponentError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    NoApp { app_name: String },
    BadAppName { app_name: String },
    DuplicateApp { app_name: String },
    AppDeleted { app_name: String },
    NoOptions,
    InvalidDefaultConfig { reason: String },
    MultiAppNotSupported { namespace: String, app_name: String },
    ComponentFailure { component: String, message: String },
}

impl AppError {
    pub fn code_str(&self) -> &'static str {
        match self {
            AppError::NoApp { .. } => "app/no-app",
            AppError::BadAppName { .. } => "app/bad-app-name",
            AppError::DuplicateApp { .. } => "app/duplicate-app",
            AppError::AppDeleted { .. } => "app/app-deleted",
            AppError::NoOptions => "app/no-options",
            AppError::InvalidDefaultConfig { .. } => "app/invalid-default-config",
            AppError::MultiAppNotSupported { .. } => "app/multi-app-not-supported",
            AppError::ComponentFailure { .. } => "app/component-failure",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NoApp { app_name } => write!(
                f,
                "No Firebase App '{app_name}' has been created - call initialize_app() first"
            ),
            AppError::BadAppName { app_name } => write!(f, "Illegal App name: '{app_name}'"),
            AppError::DuplicateApp { app_name } => write!(
                f,
                "Firebase App named '{app_name}' already exists with different options or config"
            ),
            AppError::AppDeleted { app_name } => {
                write!(f, "Firebase App named '{app_name}' already deleted")
            }
            AppError::NoOptions => write!(
                f,
                "Need to provide options when not being deployed to hosting via source."
            ),
            AppError::InvalidDefaultConfig { reason } => {
                write!(f, "FIREBASE_CONFIG could not be parsed: {reason}")
            }
            AppError::MultiAppNotSupported { namespace, app_name } => write!(
                f,
                "You attempted to call \"firebase.app('{app_name}').{namespace}\" but; {namespace} does not support multiple Firebase Apps. Ensure you access {namespace} from the default application only."
            ),
            AppError::ComponentFailure { component, message } => {
                write!(f, "Component {component} error: {message}")
            }
        }
    }
}

impl std::error::Error for AppError {}

impl From<ComponentError> for AppError {
    fn from(err: ComponentError) -> Self {
        let (component, message) = match err {
            ComponentError::MismatchingComponent { expected, found } => {
                (found, format!("does not satisfy provider for {expected}"))
            }
            ComponentError::ComponentAlreadyProvided { name } => {
                (name, "component already provided".to_string())
            }
            ComponentError::InitializationFailed { name, reason } => (name, reason),
            ComponentError::InstanceUnavailable { name } => {
                (name, "instance unavailable".to_string())
            }
        };
        AppError::ComponentFailure { component, message }
    }
}
