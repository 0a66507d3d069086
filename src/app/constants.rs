pub const DEFAULT_APP_NAME: &str = "[DEFAULT]";

/// Environment variable holding JSON-encoded default `FirebaseOptions`.
pub const DEFAULT_CONFIG_ENV: &str = "FIREBASE_CONFIG";

/// Provider name under which every app registers itself.
pub(crate) const APP_COMPONENT_NAME: &str = "app";
