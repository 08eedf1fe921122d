use crate::{HookStage, ModelDef, Record, Result};

/// A typed view of a registered model.
///
/// Implementations map a struct onto a [`Record`] explicitly, in both
/// directions. Hook methods default to doing nothing; a model lists the
/// stages it implements in `HOOKS` and registration wraps exactly those into
/// the definition's hook closures.
pub trait Model: Sized + Send + 'static {
    /// Logical collection name, as passed to [`ModelDef::new`].
    const NAME: &'static str;

    /// Hook stages this model implements.
    const HOOKS: &'static [HookStage] = &[];

    /// Field, relation and constraint definitions.
    fn schema() -> ModelDef;

    /// Builds an instance from a record read from a backend.
    fn load(record: Record) -> Result<Self>;

    /// The record to persist for this instance.
    fn to_record(&self) -> Record;

    fn before_create(&mut self) -> Result<()> {
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn after_create(&self) -> Result<()> {
        Ok(())
    }

    fn before_update(&mut self) -> Result<()> {
        Ok(())
    }

    fn after_update(&self) -> Result<()> {
        Ok(())
    }

    fn before_delete(&self) -> Result<()> {
        Ok(())
    }

    fn after_delete(&self) -> Result<()> {
        Ok(())
    }

    fn after_query(&mut self) -> Result<()> {
        Ok(())
    }
}

/// The model's definition with its hook methods attached.
pub(crate) fn model_def<M: Model>() -> ModelDef {
    M::HOOKS
        .iter()
        .fold(M::schema(), |def, &stage| def.hook(stage, run_hook::<M>(stage)))
}

fn run_hook<M: Model>(stage: HookStage) -> impl Fn(&mut Record) -> Result<()> + Send + Sync {
    move |record| {
        let mut model = M::load(record.clone())?;

        match stage {
            HookStage::BeforeCreate => model.before_create()?,
            HookStage::Validate => model.validate()?,
            HookStage::AfterCreate => model.after_create()?,
            HookStage::BeforeUpdate => model.before_update()?,
            HookStage::AfterUpdate => model.after_update()?,
            HookStage::BeforeDelete => model.before_delete()?,
            HookStage::AfterDelete => model.after_delete()?,
            HookStage::AfterQuery => model.after_query()?,
        }

        // Write back whatever the hook changed. Values adjusted while
        // loading are not changes to persist.
        for (field, value) in model.to_record().values() {
            if record.get(field) == value {
                continue;
            }
            if stage == HookStage::AfterQuery {
                record.set_loaded(field, value.clone());
            } else {
                record.set(field, value.clone());
            }
        }

        Ok(())
    }
}
