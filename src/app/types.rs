use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::app::constants::{DEFAULT_APP_NAME, DEFAULT_CONFIG_ENV};
use crate::app::errors::{AppError, AppResult};
use crate::component::{Component, ComponentContainer, DynService};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FirebaseOptions {
    pub api_key: Option<String>,
    pub auth_domain: Option<String>,
    #[serde(rename = "databaseURL", alias = "databaseUrl")]
    pub database_url: Option<String>,
    pub project_id: Option<String>,
    pub storage_bucket: Option<String>,
    pub messaging_sender_id: Option<String>,
    pub app_id: Option<String>,
    pub measurement_id: Option<String>,
}

impl FirebaseOptions {
    pub(crate) fn is_defined(&self) -> bool {
        self.api_key.is_some()
            || self.auth_domain.is_some()
            || self.database_url.is_some()
            || self.project_id.is_some()
            || self.storage_bucket.is_some()
            || self.messaging_sender_id.is_some()
            || self.app_id.is_some()
            || self.measurement_id.is_some()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FirebaseAppSettings {
    pub name: Option<String>,
    pub automatic_data_collection_enabled: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FirebaseAppConfig {
    pub name: Arc<str>,
    pub automatic_data_collection_enabled: bool,
}

impl FirebaseAppConfig {
    pub fn new(name: impl Into<String>, automatic: bool) -> Self {
        Self {
            name: Arc::from(name.into()),
            automatic_data_collection_enabled: automatic,
        }
    }
}

#[derive(Clone)]
pub struct FirebaseApp {
    inner: Arc<FirebaseAppInner>,
}

struct FirebaseAppInner {
    options: FirebaseOptions,
    config: FirebaseAppConfig,
    automatic_data_collection_enabled: AtomicBool,
    is_deleted: AtomicBool,
    container: ComponentContainer,
}

impl FirebaseApp {
    pub fn new(
        options: FirebaseOptions,
        config: FirebaseAppConfig,
        container: ComponentContainer,
    ) -> Self {
        let automatic = config.automatic_data_collection_enabled;
        let app = Self {
            inner: Arc::new(FirebaseAppInner {
                options,
                config,
                automatic_data_collection_enabled: AtomicBool::new(automatic),
                is_deleted: AtomicBool::new(false),
                container,
            }),
        };
        let root: DynService = Arc::new(app.clone());
        app.inner.container.attach_root_service(root);
        app
    }

    pub fn name(&self) -> &str {
        &self.inner.config.name
    }

    pub fn is_default(&self) -> bool {
        self.name() == DEFAULT_APP_NAME
    }

    pub fn options(&self) -> FirebaseOptions {
        self.inner.options.clone()
    }

    pub fn config(&self) -> FirebaseAppConfig {
        self.inner.config.clone()
    }

    pub fn automatic_data_collection_enabled(&self) -> bool {
        self.inner
            .automatic_data_collection_enabled
            .load(Ordering::SeqCst)
    }

    pub fn set_automatic_data_collection_enabled(&self, value: bool) {
        self.inner
            .automatic_data_collection_enabled
            .store(value, Ordering::SeqCst);
    }

    pub fn container(&self) -> ComponentContainer {
        self.inner.container.clone()
    }

    pub fn add_component(&self, component: Component) -> AppResult<()> {
        self.check_destroyed()?;
        self.inner
            .container
            .add_component(component)
            .map_err(AppError::from)
    }

    pub fn add_or_overwrite_component(&self, component: Component) -> AppResult<()> {
        self.check_destroyed()?;
        self.inner.container.add_or_overwrite_component(component);
        Ok(())
    }

    pub fn is_deleted(&self) -> bool {
        self.inner.is_deleted.load(Ordering::SeqCst)
    }

    pub(crate) fn set_is_deleted(&self, value: bool) {
        self.inner.is_deleted.store(value, Ordering::SeqCst);
    }

    pub fn check_destroyed(&self) -> AppResult<()> {
        if self.is_deleted() {
            return Err(AppError::AppDeleted {
                app_name: self.name().to_owned(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for FirebaseApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseApp")
            .field("name", &self.name())
            .field(
                "automatic_data_collection_enabled",
                &self.automatic_data_collection_enabled(),
            )
            .finish()
    }
}

/// Reads default options from the `FIREBASE_CONFIG` environment variable, if set.
pub fn get_default_app_config() -> AppResult<Option<FirebaseOptions>> {
    match std::env::var(DEFAULT_CONFIG_ENV) {
        Ok(raw) if !raw.trim().is_empty() => parse_default_config(&raw).map(Some),
        _ => Ok(None),
    }
}

pub(crate) fn parse_default_config(raw: &str) -> AppResult<FirebaseOptions> {
    serde_json::from_str(raw).map_err(|err| AppError::InvalidDefaultConfig {
        reason: err.to_string(),
    })
}
