use std::sync::Arc;

use crate::component::types::{ComponentType, InstanceFactory};

/// Named recipe for building one service per container, on first lookup.
#[derive(Clone)]
pub struct Component {
    name: Arc<str>,
    pub(crate) instance_factory: InstanceFactory,
    pub(crate) ty: ComponentType,
}

impl Component {
    pub fn new(name: impl Into<String>, instance_factory: InstanceFactory, ty: ComponentType) -> Self {
        Self {
            name: Arc::from(name.into()),
            instance_factory,
            ty,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn component_type(&self) -> ComponentType {
        self.ty
    }
}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name())
            .field("type", &self.ty)
            .finish()
    }
}
