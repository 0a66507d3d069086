//! Test utilities shared across crate-level unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};

use futures::future::{self, FutureExt};
use serde_json::Value;

use crate::analytics::{
    AnalyticsNativeModule, EventParams, NativeError, PendingResult, UserProperties,
};
use crate::app;

static REGISTRY_GUARD: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));
static NAME_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Serialises tests that touch the process-wide app registry and starts them without apps.
pub fn registry_guard() -> MutexGuard<'static, ()> {
    let guard = REGISTRY_GUARD
        .lock()
        .unwrap_or_else(|poison| poison.into_inner());
    for existing in app::get_apps() {
        let _ = app::delete_app(&existing);
    }
    guard
}

pub fn next_name(prefix: &str) -> String {
    format!("{prefix}-{}", NAME_COUNTER.fetch_add(1, Ordering::SeqCst))
}

/// One invocation received by [`RecordingNativeModule`].
#[derive(Clone, Debug, PartialEq)]
pub enum NativeCall {
    LogEvent { name: String, params: EventParams },
    SetAnalyticsCollectionEnabled(bool),
    SetCurrentScreen {
        screen_name: String,
        screen_class_override: Option<String>,
    },
    SetMinimumSessionDuration(u64),
    SetSessionTimeoutDuration(u64),
    SetUserId(Option<String>),
    SetUserProperty { name: String, value: Option<String> },
    SetUserProperties(UserProperties),
}

/// Native module spy: records every call and resolves with `null` unless a rejection is queued.
#[derive(Clone, Default)]
pub struct RecordingNativeModule {
    calls: Arc<Mutex<Vec<NativeCall>>>,
    next_rejection: Arc<Mutex<Option<NativeError>>>,
}

impl RecordingNativeModule {
    pub fn calls(&self) -> Vec<NativeCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn reject_next(&self, error: NativeError) {
        *self.next_rejection.lock().unwrap() = Some(error);
    }

    fn record(&self, call: NativeCall) -> PendingResult {
        self.calls.lock().unwrap().push(call);
        let outcome = match self.next_rejection.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(Value::Null),
        };
        future::ready(outcome).boxed()
    }
}

impl AnalyticsNativeModule for RecordingNativeModule {
    fn log_event(&self, name: String, params: EventParams) -> PendingResult {
        self.record(NativeCall::LogEvent { name, params })
    }

    fn set_analytics_collection_enabled(&self, enabled: bool) -> PendingResult {
        self.record(NativeCall::SetAnalyticsCollectionEnabled(enabled))
    }

    fn set_current_screen(
        &self,
        screen_name: String,
        screen_class_override: Option<String>,
    ) -> PendingResult {
        self.record(NativeCall::SetCurrentScreen {
            screen_name,
            screen_class_override,
        })
    }

    fn set_minimum_session_duration(&self, milliseconds: u64) -> PendingResult {
        self.record(NativeCall::SetMinimumSessionDuration(milliseconds))
    }

    fn set_session_timeout_duration(&self, milliseconds: u64) -> PendingResult {
        self.record(NativeCall::SetSessionTimeoutDuration(milliseconds))
    }

    fn set_user_id(&self, id: Option<String>) -> PendingResult {
        self.record(NativeCall::SetUserId(id))
    }

    fn set_user_property(&self, name: String, value: Option<String>) -> PendingResult {
        self.record(NativeCall::SetUserProperty { name, value })
    }

    fn set_user_properties(&self, properties: UserProperties) -> PendingResult {
        self.record(NativeCall::SetUserProperties(properties))
    }
}
