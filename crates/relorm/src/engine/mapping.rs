use crate::{Record, Result};

use relorm_core::{
    driver::Row,
    schema::ModelDescriptor,
    stmt::Value,
};

use indexmap::IndexSet;

/// Builds a record from a result row. Fields whose columns are missing from
/// the row (projections) are left unset.
pub(crate) fn load(model: &ModelDescriptor, row: &Row) -> Result<Record> {
    let mut record = Record::new(&model.name);

    for field in model.fields.values() {
        let present = field
            .storage_columns()
            .iter()
            .any(|(column, _)| row.get(column).is_some());

        if !present {
            continue;
        }

        let value = field.from_storage(|column| row.get(column).cloned())?;
        record.set_loaded(&field.name, value);
    }

    Ok(record)
}

/// Primary key value of `record`.
pub(crate) fn key(model: &ModelDescriptor, record: &Record) -> Value {
    record.get(&model.primary_key).clone()
}

/// A record is persisted once its primary key is set.
pub(crate) fn is_persisted(model: &ModelDescriptor, record: &Record) -> bool {
    !record.get(&model.primary_key).is_zero()
}

/// Non-zero values, deduplicated, in first-seen order.
pub(crate) fn distinct<'a>(values: impl IntoIterator<Item = &'a Value>) -> Vec<Value> {
    values
        .into_iter()
        .filter(|value| !value.is_zero())
        .cloned()
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use relorm_core::schema::{Field, ModelDef, Registry};
    use std_util::prelude::*;

    fn task() -> std::sync::Arc<ModelDescriptor> {
        let mut registry = Registry::new();
        assert_ok!(registry.register(
            ModelDef::new("Task")
                .field(Field::i64("Id").primary_key().auto_increment())
                .field(Field::string("Name"))
                .field(Field::bool("Done")),
        ));
        assert_ok!(registry.build());
        assert_ok!(registry.model("Task"))
    }

    #[test]
    fn load_coerces_and_skips_missing_columns() {
        let model = task();
        let row = Row::new().with("id", 7).with("done", 1);

        let record = assert_ok!(load(&model, &row));
        assert_eq!(record.get("Id"), &Value::from(7));
        assert_eq!(record.get("Done"), &Value::Bool(true));
        assert!(!record.contains("Name"));
        assert_none!(record.changed().next());
    }

    #[test]
    fn distinct_drops_zero_keys() {
        let values = [Value::from(2), Value::Null, Value::from(2), Value::from(0), Value::from(1)];
        assert_eq!(distinct(&values), vec![Value::from(2), Value::from(1)]);
    }

    #[test]
    fn persisted_means_non_zero_key() {
        let model = task();
        assert!(!is_persisted(&model, &Record::new("Task")));
        assert!(!is_persisted(&model, &Record::new("Task").with("Id", 0)));
        assert!(is_persisted(&model, &Record::new("Task").with("Id", 4)));
    }
}
