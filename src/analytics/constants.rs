/// Namespace under which the gateway is exposed (`firebase.analytics()`).
pub const ANALYTICS_NAMESPACE: &str = "analytics";

/// Name of the native module the gateway forwards to.
pub const NATIVE_MODULE_NAME: &str = "RNFBAnalytics";

pub(crate) const ANALYTICS_COMPONENT_NAME: &str = "analytics";

/// Event names reserved by the native analytics platform.
pub const RESERVED_EVENT_NAMES: &[&str] = &[
    "app_clear_data",
    "app_uninstall",
    "app_update",
    "error",
    "first_open",
    "in_app_purchase",
    "notification_dismiss",
    "notification_foreground",
    "notification_open",
    "notification_receive",
    "os_update",
    "session_start",
    "user_engagement",
];

pub const MAX_EVENT_NAME_LENGTH: usize = 32;
pub const MAX_EVENT_PARAMS: usize = 25;

pub const DEFAULT_MINIMUM_SESSION_DURATION_MS: u64 = 10_000;
pub const DEFAULT_SESSION_TIMEOUT_DURATION_MS: u64 = 1_800_000;
