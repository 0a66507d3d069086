use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::{Map, Value};

use crate::analytics::constants::{ANALYTICS_COMPONENT_NAME, NATIVE_MODULE_NAME};
use crate::analytics::error::AnalyticsResult;
use crate::app::{self, FirebaseApp};
use crate::component::{Component, ComponentType, DynService, InstanceFactory};

/// Event parameters keyed by parameter name.
pub type EventParams = Map<String, Value>;

/// User properties keyed by property name. `null` clears a property.
pub type UserProperties = Map<String, Value>;

pub type NativeResult = Result<Value, NativeError>;

/// Handle to a call the native module has accepted but not yet settled.
pub type PendingResult = BoxFuture<'static, NativeResult>;

/// Rejection reported by the native module. The gateway passes it through untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct NativeError {
    pub code: String,
    pub message: String,
    pub details: Option<Value>,
}

impl NativeError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl fmt::Display for NativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for NativeError {}

/// Entry points of the `RNFBAnalytics` native module.
///
/// A platform adapter implements this trait; every method hands the call to the native SDK and
/// returns its pending result. Arguments arrive already validated.
pub trait AnalyticsNativeModule: Send + Sync {
    fn log_event(&self, name: String, params: EventParams) -> PendingResult;

    fn set_analytics_collection_enabled(&self, enabled: bool) -> PendingResult;

    fn set_current_screen(
        &self,
        screen_name: String,
        screen_class_override: Option<String>,
    ) -> PendingResult;

    fn set_minimum_session_duration(&self, milliseconds: u64) -> PendingResult;

    fn set_session_timeout_duration(&self, milliseconds: u64) -> PendingResult;

    fn set_user_id(&self, id: Option<String>) -> PendingResult;

    fn set_user_property(&self, name: String, value: Option<String>) -> PendingResult;

    fn set_user_properties(&self, properties: UserProperties) -> PendingResult;
}

/// Sized wrapper so the trait object can live in a component container.
#[derive(Clone)]
pub(crate) struct NativeModuleHandle(pub(crate) Arc<dyn AnalyticsNativeModule>);

/// Installs the native adapter backing `firebase.analytics()` for `app`.
///
/// Replaces a previously installed adapter; a gateway already created for the app is dropped so
/// the next lookup binds to the new adapter.
pub fn register_native_module(
    app: &FirebaseApp,
    module: Arc<dyn AnalyticsNativeModule>,
) -> AnalyticsResult<()> {
    let handle = NativeModuleHandle(module);
    let factory: InstanceFactory = Arc::new(move |_| Ok(Arc::new(handle.clone()) as DynService));
    app.add_or_overwrite_component(Component::new(
        NATIVE_MODULE_NAME,
        factory,
        ComponentType::Native,
    ))?;
    app::remove_service_instance(app, ANALYTICS_COMPONENT_NAME);
    Ok(())
}
