//! Analytics gateway forwarding validated calls to the `RNFBAnalytics` native module.
mod api;
mod constants;
pub mod error;
mod native;

use std::sync::LazyLock;

use crate::logger::Logger;

pub use api::{get_analytics, namespace, register_analytics_component, Analytics};
pub use constants::{
    ANALYTICS_NAMESPACE, DEFAULT_MINIMUM_SESSION_DURATION_MS, DEFAULT_SESSION_TIMEOUT_DURATION_MS,
    MAX_EVENT_NAME_LENGTH, MAX_EVENT_PARAMS, NATIVE_MODULE_NAME, RESERVED_EVENT_NAMES,
};
pub use error::{AnalyticsError, AnalyticsErrorCode, AnalyticsResult};
pub use native::{
    register_native_module, AnalyticsNativeModule, EventParams, NativeError, NativeResult,
    PendingResult, UserProperties,
};

pub static LOGGER: LazyLock<Logger> =
    LazyLock::new(|| Logger::new("@react-native-firebase/analytics"));
