use crate::{Error, Record, Result};

use indexmap::IndexMap;
use std::{fmt, sync::Arc};

/// Lifecycle hook, invoked with the record being operated on.
pub type Hook = Arc<dyn Fn(&mut Record) -> Result<()> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookStage {
    BeforeCreate,
    Validate,
    AfterCreate,
    BeforeUpdate,
    AfterUpdate,
    BeforeDelete,
    AfterDelete,
    AfterQuery,
}

impl HookStage {
    /// Errors from `after_*` hooks are logged and dropped.
    pub fn is_observational(self) -> bool {
        matches!(
            self,
            Self::AfterCreate | Self::AfterUpdate | Self::AfterDelete | Self::AfterQuery
        )
    }
}

impl fmt::Display for HookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BeforeCreate => "before_create",
            Self::Validate => "validate",
            Self::AfterCreate => "after_create",
            Self::BeforeUpdate => "before_update",
            Self::AfterUpdate => "after_update",
            Self::BeforeDelete => "before_delete",
            Self::AfterDelete => "after_delete",
            Self::AfterQuery => "after_query",
        })
    }
}

/// Hooks attached to a model, at most one per stage.
#[derive(Clone, Default)]
pub struct Hooks {
    hooks: IndexMap<HookStage, Hook>,
}

impl Hooks {
    pub fn set(&mut self, stage: HookStage, hook: Hook) {
        self.hooks.insert(stage, hook);
    }

    pub fn get(&self, stage: HookStage) -> Option<&Hook> {
        self.hooks.get(&stage)
    }

    pub fn is_set(&self, stage: HookStage) -> bool {
        self.hooks.contains_key(&stage)
    }

    /// Runs the hook for `stage`, if any, wrapping its error in a hook error.
    pub fn run(&self, stage: HookStage, record: &mut Record) -> Result<()> {
        match self.hooks.get(&stage) {
            Some(hook) => hook(record).map_err(|err| Error::hook(stage, err)),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.hooks.keys()).finish()
    }
}
