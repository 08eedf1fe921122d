use super::Db;
use crate::{model, Model, Result};

use relorm_core::{
    driver::Backend,
    schema::{ModelDef, Registry},
};

use std::sync::Arc;

#[derive(Debug, Default)]
pub struct Builder {
    /// Model definitions, in registration order
    models: Vec<ModelDef>,

    table_name_prefix: Option<String>,
}

impl Builder {
    pub fn register<M: Model>(&mut self) -> &mut Self {
        self.models.push(model::model_def::<M>());
        self
    }

    pub fn register_model(&mut self, def: ModelDef) -> &mut Self {
        self.models.push(def);
        self
    }

    /// Set the collection name prefix for all models
    pub fn table_name_prefix(&mut self, prefix: &str) -> &mut Self {
        self.table_name_prefix = Some(prefix.to_string());
        self
    }

    /// Registers every model and resolves their relations.
    pub fn build_registry(&self) -> Result<Registry> {
        let mut registry = match &self.table_name_prefix {
            Some(prefix) => Registry::with_table_prefix(prefix),
            None => Registry::new(),
        };

        for def in &self.models {
            registry.register(def.clone())?;
        }

        registry.build()?;
        Ok(registry)
    }

    pub async fn build(&mut self, backend: impl Backend) -> Result<Db> {
        let registry = self.build_registry()?;
        Ok(Db::new(registry, Arc::new(backend)))
    }
}
