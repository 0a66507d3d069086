use std::fmt;
use std::sync::{Arc, LazyLock};

use serde_json::{Map, Value};

use crate::analytics::constants::{
    ANALYTICS_COMPONENT_NAME, ANALYTICS_NAMESPACE, DEFAULT_MINIMUM_SESSION_DURATION_MS,
    DEFAULT_SESSION_TIMEOUT_DURATION_MS, MAX_EVENT_NAME_LENGTH, MAX_EVENT_PARAMS,
    NATIVE_MODULE_NAME, RESERVED_EVENT_NAMES,
};
use crate::analytics::error::{
    internal_error, invalid_argument, native_module_not_found, AnalyticsError, AnalyticsResult,
};
use crate::analytics::native::{
    AnalyticsNativeModule, EventParams, NativeModuleHandle, PendingResult, UserProperties,
};
use crate::analytics::LOGGER;
use crate::app::{self, FirebaseApp, ModuleNamespace, ModuleNamespaceConfig};
use crate::component::{Component, ComponentError, ComponentType, DynService};
use crate::util::validate::{is_alpha_numeric_underscore, is_one_of, type_name};

/// Analytics gateway bound to one app.
///
/// Every operation checks its arguments synchronously and then hands the call to the
/// `RNFBAnalytics` native module, returning the module's [`PendingResult`] as is. Argument
/// errors come back as `Err` before the native module is touched; native rejections surface
/// when the pending result is awaited.
#[derive(Clone)]
pub struct Analytics {
    inner: Arc<AnalyticsInner>,
}

struct AnalyticsInner {
    app: FirebaseApp,
    native: Arc<dyn AnalyticsNativeModule>,
}

impl fmt::Debug for Analytics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Analytics")
            .field("app", &self.inner.app.name())
            .field("native_module", &NATIVE_MODULE_NAME)
            .finish()
    }
}

impl Analytics {
    pub(crate) fn new(app: FirebaseApp, native: Arc<dyn AnalyticsNativeModule>) -> Self {
        Self {
            inner: Arc::new(AnalyticsInner { app, native }),
        }
    }

    pub fn app(&self) -> &FirebaseApp {
        &self.inner.app
    }

    pub fn native_module_name(&self) -> &'static str {
        NATIVE_MODULE_NAME
    }

    /// Logs an app event.
    ///
    /// `name` must be a string of 1 to 32 letters, digits or underscores that is not one of
    /// [`RESERVED_EVENT_NAMES`]. `params`, when given, must be an object with at most 25 keys;
    /// `None` forwards an empty map.
    pub fn log_event(
        &self,
        name: impl Into<Value>,
        params: Option<Value>,
    ) -> AnalyticsResult<PendingResult> {
        let (name, params) = validate_log_event(name.into(), params)?;
        self.trace("logEvent");
        Ok(self.inner.native.log_event(name, params))
    }

    /// Sets whether analytics collection is enabled for this app on this device.
    pub fn set_analytics_collection_enabled(&self, enabled: bool) -> PendingResult {
        self.trace("setAnalyticsCollectionEnabled");
        self.inner.native.set_analytics_collection_enabled(enabled)
    }

    /// Sets the current screen name, which specifies the current visual context in the app.
    pub fn set_current_screen(
        &self,
        screen_name: impl Into<String>,
        screen_class_override: Option<&str>,
    ) -> PendingResult {
        self.trace("setCurrentScreen");
        self.inner.native.set_current_screen(
            screen_name.into(),
            screen_class_override.map(str::to_owned),
        )
    }

    /// Sets the minimum engagement time required before starting a session.
    /// `None` uses the platform default of 10000 ms.
    pub fn set_minimum_session_duration(&self, milliseconds: Option<u64>) -> PendingResult {
        self.trace("setMinimumSessionDuration");
        self.inner
            .native
            .set_minimum_session_duration(milliseconds.unwrap_or(DEFAULT_MINIMUM_SESSION_DURATION_MS))
    }

    /// Sets the duration of inactivity that terminates the current session.
    /// `None` uses the platform default of 1800000 ms (30 minutes).
    pub fn set_session_timeout_duration(&self, milliseconds: Option<u64>) -> PendingResult {
        self.trace("setSessionTimeoutDuration");
        self.inner
            .native
            .set_session_timeout_duration(milliseconds.unwrap_or(DEFAULT_SESSION_TIMEOUT_DURATION_MS))
    }

    /// Sets the user ID property. `id` must be a string or `null`.
    pub fn set_user_id(&self, id: impl Into<Value>) -> AnalyticsResult<PendingResult> {
        let id = nullable_string(id.into()).ok_or_else(|| {
            invalid_argument(
                "analytics.setUserId(): The supplied userId must be a string value or null.",
            )
        })?;
        self.trace("setUserId");
        Ok(self.inner.native.set_user_id(id))
    }

    /// Sets a user property to a given value. `value` must be a string or `null`.
    // TODO: check `name` against the native rules (alphanumeric, at most 24 characters, no
    // `firebase_` prefix) once the intended behaviour for existing callers is settled.
    pub fn set_user_property(
        &self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> AnalyticsResult<PendingResult> {
        let value = nullable_string(value.into()).ok_or_else(|| {
            invalid_argument(
                "analytics.setUserProperty(): The supplied property must be a string value or null.",
            )
        })?;
        self.trace("setUserProperty");
        Ok(self.inner.native.set_user_property(name.into(), value))
    }

    /// Sets multiple user properties in a single native call.
    pub fn set_user_properties(&self, properties: UserProperties) -> PendingResult {
        self.trace("setUserProperties");
        self.inner.native.set_user_properties(properties)
    }

    fn trace(&self, method: &str) {
        LOGGER.debug(format!(
            "{NATIVE_MODULE_NAME}.{method}() for app '{}'",
            self.inner.app.name()
        ));
    }
}

fn validate_log_event(name: Value, params: Option<Value>) -> AnalyticsResult<(String, EventParams)> {
    let name = match name {
        Value::String(name) => name,
        other => {
            LOGGER.debug(format!(
                "logEvent rejected a {} event name",
                type_name(&other)
            ));
            return Err(invalid_argument(
                "analytics.logEvent(): First argument 'name' is required and must be a string value.",
            ));
        }
    };

    let params = match params {
        None => Map::new(),
        Some(Value::Object(params)) => params,
        Some(_) => {
            return Err(invalid_argument(
                "analytics.logEvent(): Second optional argument 'params' must be an object if provided.",
            ))
        }
    };

    if is_one_of(&name, RESERVED_EVENT_NAMES) {
        return Err(invalid_argument(format!(
            "analytics.logEvent(): event name '{name}' is a reserved event name and can not be used."
        )));
    }

    if !is_alpha_numeric_underscore(&name, MAX_EVENT_NAME_LENGTH) {
        return Err(invalid_argument(format!(
            "analytics.logEvent(): Event name '{name}' is invalid. Names should contain 1 to 32 alphanumeric characters or underscores."
        )));
    }

    if params.len() > MAX_EVENT_PARAMS {
        return Err(invalid_argument(format!(
            "analytics.logEvent(): Maximum number of parameters exceeded ({MAX_EVENT_PARAMS})."
        )));
    }

    Ok((name, params))
}

/// `Some(None)` for null, `Some(Some(_))` for a string, `None` for anything else.
fn nullable_string(value: Value) -> Option<Option<String>> {
    match value {
        Value::Null => Some(None),
        Value::String(text) => Some(Some(text)),
        _ => None,
    }
}

static ANALYTICS_COMPONENT: LazyLock<Component> = LazyLock::new(|| {
    Component::new(
        ANALYTICS_COMPONENT_NAME,
        Arc::new(analytics_factory),
        ComponentType::Public,
    )
});

static NAMESPACE: LazyLock<ModuleNamespace<Arc<Analytics>, AnalyticsError>> =
    LazyLock::new(|| ModuleNamespace::new(namespace_config(), analytics_for_app));

fn namespace_config() -> ModuleNamespaceConfig {
    ModuleNamespaceConfig {
        namespace: ANALYTICS_NAMESPACE,
        native_module_name: NATIVE_MODULE_NAME,
        has_multi_app_support: false,
        has_custom_url_support: false,
        statics: Map::new(),
    }
}

fn analytics_factory(
    container: &crate::component::ComponentContainer,
) -> Result<DynService, ComponentError> {
    let app = container.root_service::<FirebaseApp>().ok_or_else(|| {
        ComponentError::InitializationFailed {
            name: ANALYTICS_COMPONENT_NAME.to_string(),
            reason: "Firebase app not attached to component container".to_string(),
        }
    })?;
    let native = container
        .get_provider(NATIVE_MODULE_NAME)
        .get::<NativeModuleHandle>()
        .map_err(|err| ComponentError::InitializationFailed {
            name: ANALYTICS_COMPONENT_NAME.to_string(),
            reason: err.to_string(),
        })?;
    let analytics = Analytics::new((*app).clone(), Arc::clone(&native.0));
    Ok(Arc::new(analytics) as DynService)
}

fn analytics_for_app(app: &FirebaseApp) -> AnalyticsResult<Arc<Analytics>> {
    if !app::get_provider(app, NATIVE_MODULE_NAME).is_component_set() {
        return Err(native_module_not_found(ANALYTICS_NAMESPACE));
    }
    app::get_provider(app, ANALYTICS_COMPONENT_NAME)
        .get::<Analytics>()
        .map_err(|err| internal_error(err.to_string()))
}

fn ensure_registered() {
    let component = LazyLock::force(&ANALYTICS_COMPONENT).clone();
    let _ = app::register_component(component);
}

pub fn register_analytics_component() {
    ensure_registered();
}

/// Registration record of the analytics namespace.
pub fn namespace() -> &'static ModuleNamespace<Arc<Analytics>, AnalyticsError> {
    &NAMESPACE
}

/// Returns the analytics gateway of `app`, or of the default app when `None`.
///
/// One gateway is created per app and reused afterwards. Analytics supports the default app
/// only, and the app needs a native module installed with
/// [`register_native_module`](crate::analytics::register_native_module).
pub fn get_analytics(app: Option<&FirebaseApp>) -> AnalyticsResult<Arc<Analytics>> {
    ensure_registered();
    NAMESPACE.get_instance(app)
}

#[cfg(test)]
#[allow(clippy::await_holding_lock)]
mod tests {
    use super::*;
    use crate::analytics::error::AnalyticsErrorCode;
    use crate::analytics::register_native_module;
    use crate::analytics::NativeError;
    use crate::app::{initialize_app, FirebaseAppSettings, FirebaseOptions};
    use crate::test_support::{next_name, registry_guard, NativeCall, RecordingNativeModule};
    use serde_json::json;

    fn options() -> FirebaseOptions {
        FirebaseOptions {
            project_id: Some("analytics-test".into()),
            app_id: Some("1:123:android:abc".into()),
            ..Default::default()
        }
    }

    fn gateway() -> (Analytics, RecordingNativeModule) {
        let app = initialize_app(
            options(),
            Some(FirebaseAppSettings {
                name: Some(next_name("gateway")),
                ..Default::default()
            }),
        )
        .unwrap();
        let native = RecordingNativeModule::default();
        (Analytics::new(app, Arc::new(native.clone())), native)
    }

    fn params_with(count: usize) -> Value {
        let map: Map<String, Value> = (0..count)
            .map(|i| (format!("param_{i}"), json!(i)))
            .collect();
        Value::Object(map)
    }

    fn assert_invalid(result: AnalyticsResult<PendingResult>, fragment: &str) {
        match result {
            Ok(_) => panic!("expected a validation error containing {fragment:?}"),
            Err(err) => {
                assert_eq!(err.code, AnalyticsErrorCode::InvalidArgument);
                assert!(
                    err.message().contains(fragment),
                    "{:?} does not contain {fragment:?}",
                    err.message()
                );
            }
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn log_event_forwards_name_and_params() {
        let _guard = registry_guard();
        let (analytics, native) = gateway();
        let pending = analytics
            .log_event("level_up", Some(json!({"level": 3, "character": "ada"})))
            .unwrap();
        assert_eq!(pending.await.unwrap(), Value::Null);

        assert_eq!(
            native.calls(),
            vec![NativeCall::LogEvent {
                name: "level_up".into(),
                params: json!({"level": 3, "character": "ada"})
                    .as_object()
                    .unwrap()
                    .clone(),
            }]
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn log_event_without_params_forwards_empty_map() {
        let _guard = registry_guard();
        let (analytics, native) = gateway();
        analytics.log_event("tutorial_begin", None).unwrap().await.unwrap();
        assert_eq!(
            native.calls(),
            vec![NativeCall::LogEvent {
                name: "tutorial_begin".into(),
                params: Map::new(),
            }]
        );
    }

    #[test]
    fn non_string_names_never_reach_native() {
        let _guard = registry_guard();
        let (analytics, native) = gateway();
        for name in [json!(42), Value::Null, json!(true), json!(["a"]), json!({"a": 1})] {
            assert_invalid(
                analytics.log_event(name, None),
                "First argument 'name' is required and must be a string value",
            );
        }
        assert!(native.calls().is_empty());
    }

    #[test]
    fn non_object_params_are_rejected() {
        let _guard = registry_guard();
        let (analytics, native) = gateway();
        for params in [Value::Null, json!([1, 2]), json!("x"), json!(7)] {
            assert_invalid(
                analytics.log_event("ok", Some(params)),
                "'params' must be an object if provided",
            );
        }
        assert!(native.calls().is_empty());
    }

    #[test]
    fn params_check_runs_before_reserved_name_check() {
        let _guard = registry_guard();
        let (analytics, _native) = gateway();
        assert_invalid(
            analytics.log_event("session_start", Some(json!([]))),
            "must be an object",
        );
    }

    #[test]
    fn name_type_check_runs_before_params_check() {
        let _guard = registry_guard();
        let (analytics, native) = gateway();
        assert_invalid(
            analytics.log_event(1, Some(json!([]))),
            "First argument 'name' is required and must be a string value",
        );
        assert!(native.calls().is_empty());
    }

    #[test]
    fn name_format_check_runs_before_param_count_check() {
        let _guard = registry_guard();
        let (analytics, native) = gateway();
        assert_invalid(
            analytics.log_event("bad-name", Some(params_with(26))),
            "Event name 'bad-name' is invalid",
        );
        assert!(native.calls().is_empty());
    }

    #[test]
    fn every_reserved_name_is_rejected() {
        let _guard = registry_guard();
        let (analytics, native) = gateway();
        assert_eq!(RESERVED_EVENT_NAMES.len(), 13);
        for name in RESERVED_EVENT_NAMES {
            assert_invalid(
                analytics.log_event(*name, Some(json!({}))),
                "is a reserved event name and can not be used",
            );
        }
        assert!(native.calls().is_empty());
    }

    #[test]
    fn reserved_names_are_case_sensitive() {
        let _guard = registry_guard();
        let (analytics, native) = gateway();
        assert!(analytics.log_event("First_Open", None).is_ok());
        assert_eq!(native.calls().len(), 1);
    }

    #[test]
    fn name_length_limit_is_thirty_two() {
        let _guard = registry_guard();
        let (analytics, native) = gateway();
        let longest = "a".repeat(32);
        assert!(analytics.log_event(longest.as_str(), Some(json!({}))).is_ok());
        assert_invalid(
            analytics.log_event("a".repeat(33), Some(json!({}))),
            "Names should contain 1 to 32 alphanumeric characters or underscores",
        );
        assert_eq!(native.calls().len(), 1);
    }

    #[test]
    fn malformed_names_are_rejected() {
        let _guard = registry_guard();
        let (analytics, native) = gateway();
        for name in ["", "with space", "dash-name", "emoji_\u{1f600}"] {
            assert_invalid(analytics.log_event(name, None), "is invalid");
        }
        assert!(native.calls().is_empty());
    }

    #[test]
    fn at_most_twenty_five_params() {
        let _guard = registry_guard();
        let (analytics, native) = gateway();
        assert!(analytics.log_event("ok", Some(params_with(25))).is_ok());
        assert_invalid(
            analytics.log_event("ok", Some(params_with(26))),
            "Maximum number of parameters exceeded (25)",
        );
        assert_eq!(native.calls().len(), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn native_rejection_is_passed_through() {
        let _guard = registry_guard();
        let (analytics, native) = gateway();
        let rejection = NativeError::new("analytics/unknown", "sdk not ready");
        native.reject_next(rejection.clone());

        let pending = analytics.log_event("ok", None).unwrap();
        assert_eq!(pending.await.unwrap_err(), rejection);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn session_durations_use_defaults() {
        let _guard = registry_guard();
        let (analytics, native) = gateway();
        analytics.set_minimum_session_duration(None).await.unwrap();
        analytics.set_session_timeout_duration(None).await.unwrap();
        analytics.set_minimum_session_duration(Some(500)).await.unwrap();
        analytics.set_session_timeout_duration(Some(60_000)).await.unwrap();

        assert_eq!(
            native.calls(),
            vec![
                NativeCall::SetMinimumSessionDuration(10_000),
                NativeCall::SetSessionTimeoutDuration(1_800_000),
                NativeCall::SetMinimumSessionDuration(500),
                NativeCall::SetSessionTimeoutDuration(60_000),
            ]
        );
    }

    #[test]
    fn user_id_accepts_string_or_null() {
        let _guard = registry_guard();
        let (analytics, native) = gateway();
        assert!(analytics.set_user_id(Value::Null).is_ok());
        assert!(analytics.set_user_id("abc").is_ok());
        assert_invalid(
            analytics.set_user_id(42),
            "The supplied userId must be a string value or null",
        );
        assert_eq!(
            native.calls(),
            vec![
                NativeCall::SetUserId(None),
                NativeCall::SetUserId(Some("abc".into())),
            ]
        );
    }

    #[test]
    fn user_property_value_must_be_string_or_null() {
        let _guard = registry_guard();
        let (analytics, native) = gateway();
        assert!(analytics.set_user_property("k", Value::Null).is_ok());
        assert!(analytics.set_user_property("k", "v").is_ok());
        assert_invalid(
            analytics.set_user_property("k", 42),
            "The supplied property must be a string value or null",
        );
        assert_eq!(
            native.calls(),
            vec![
                NativeCall::SetUserProperty {
                    name: "k".into(),
                    value: None
                },
                NativeCall::SetUserProperty {
                    name: "k".into(),
                    value: Some("v".into())
                },
            ]
        );
    }

    #[test]
    fn user_property_name_is_forwarded_unchecked() {
        let _guard = registry_guard();
        let (analytics, native) = gateway();
        assert!(analytics
            .set_user_property("firebase_not checked", "v")
            .is_ok());
        assert_eq!(native.calls().len(), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn unvalidated_operations_forward_arguments() {
        let _guard = registry_guard();
        let (analytics, native) = gateway();
        analytics.set_analytics_collection_enabled(false).await.unwrap();
        analytics
            .set_current_screen("checkout", Some("CheckoutActivity"))
            .await
            .unwrap();
        analytics.set_current_screen("home", None).await.unwrap();
        let properties = json!({"plan": "pro", "referrer": null})
            .as_object()
            .unwrap()
            .clone();
        analytics
            .set_user_properties(properties.clone())
            .await
            .unwrap();

        assert_eq!(
            native.calls(),
            vec![
                NativeCall::SetAnalyticsCollectionEnabled(false),
                NativeCall::SetCurrentScreen {
                    screen_name: "checkout".into(),
                    screen_class_override: Some("CheckoutActivity".into()),
                },
                NativeCall::SetCurrentScreen {
                    screen_name: "home".into(),
                    screen_class_override: None,
                },
                NativeCall::SetUserProperties(properties),
            ]
        );
    }

    #[test]
    fn get_analytics_returns_one_gateway_per_app() {
        let _guard = registry_guard();
        let app = initialize_app(options(), None).unwrap();
        register_native_module(&app, Arc::new(RecordingNativeModule::default())).unwrap();

        let first = get_analytics(None).unwrap();
        let second = get_analytics(Some(&app)).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.app().name(), app::DEFAULT_APP_NAME);
        assert_eq!(first.native_module_name(), "RNFBAnalytics");
    }

    #[test]
    fn get_analytics_requires_native_module() {
        let _guard = registry_guard();
        initialize_app(options(), None).unwrap();
        let err = get_analytics(None).unwrap_err();
        assert_eq!(err.code_str(), "analytics/native-module-not-found");
    }

    #[test]
    fn get_analytics_rejects_secondary_apps() {
        let _guard = registry_guard();
        let app = initialize_app(
            options(),
            Some(FirebaseAppSettings {
                name: Some(next_name("secondary")),
                ..Default::default()
            }),
        )
        .unwrap();
        register_native_module(&app, Arc::new(RecordingNativeModule::default())).unwrap();

        let err = get_analytics(Some(&app)).unwrap_err();
        assert_eq!(err.code, AnalyticsErrorCode::AppNotSupported);
        assert!(err.message().contains("does not support multiple Firebase Apps"));
    }

    #[test]
    fn get_analytics_without_default_app_fails() {
        let _guard = registry_guard();
        let err = get_analytics(None).unwrap_err();
        assert_eq!(err.code, AnalyticsErrorCode::Internal);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn reinstalling_native_module_rebinds_gateway() {
        let _guard = registry_guard();
        let app = initialize_app(options(), None).unwrap();
        let first_native = RecordingNativeModule::default();
        register_native_module(&app, Arc::new(first_native.clone())).unwrap();
        get_analytics(None).unwrap().log_event("one", None).unwrap().await.unwrap();

        let second_native = RecordingNativeModule::default();
        register_native_module(&app, Arc::new(second_native.clone())).unwrap();
        get_analytics(None).unwrap().log_event("two", None).unwrap().await.unwrap();

        assert_eq!(first_native.calls().len(), 1);
        assert_eq!(second_native.calls().len(), 1);
    }

    #[test]
    fn namespace_is_registered_without_multi_app_support() {
        let config = namespace().config();
        assert_eq!(config.namespace, "analytics");
        assert_eq!(config.native_module_name, "RNFBAnalytics");
        assert!(!config.has_multi_app_support);
        assert!(!config.has_custom_url_support);
        assert!(namespace().statics().is_empty());
    }
}
