use std::fmt::{Display, Formatter};

use crate::app::AppError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnalyticsErrorCode {
    InvalidArgument,
    AppNotSupported,
    NativeModuleNotFound,
    Internal,
}

impl AnalyticsErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyticsErrorCode::InvalidArgument => "analytics/invalid-argument",
            AnalyticsErrorCode::AppNotSupported => "analytics/app-not-supported",
            AnalyticsErrorCode::NativeModuleNotFound => "analytics/native-module-not-found",
            AnalyticsErrorCode::Internal => "analytics/internal",
        }
    }
}

/// Error raised by the gateway itself, before anything reaches the native module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalyticsError {
    pub code: AnalyticsErrorCode,
    message: String,
}

impl AnalyticsError {
    pub fn new(code: AnalyticsErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for AnalyticsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code_str())
    }
}

impl std::error::Error for AnalyticsError {}

impl From<AppError> for AnalyticsError {
    fn from(err: AppError) -> Self {
        let code = match err {
            AppError::MultiAppNotSupported { .. } => AnalyticsErrorCode::AppNotSupported,
            _ => AnalyticsErrorCode::Internal,
        };
        AnalyticsError::new(code, err.to_string())
    }
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

pub fn invalid_argument(message: impl Into<String>) -> AnalyticsError {
    AnalyticsError::new(AnalyticsErrorCode::InvalidArgument, message)
}

pub fn native_module_not_found(namespace: &str) -> AnalyticsError {
    AnalyticsError::new(
        AnalyticsErrorCode::NativeModuleNotFound,
        format!(
            "You attempted to use a firebase module that's not installed natively on your project by calling firebase.{namespace}()."
        ),
    )
}

pub fn internal_error(message: impl Into<String>) -> AnalyticsError {
    AnalyticsError::new(AnalyticsErrorCode::Internal, message)
}
