use crate::{Record, Result};

use relorm_core::{
    schema::{FieldDescriptor, ModelDescriptor},
    stmt::Value,
    Error,
};

/// Fills absent or null fields that declare a default.
pub(super) fn apply_defaults(model: &ModelDescriptor, record: &mut Record) {
    for field in model.fields.values() {
        let Some(default) = &field.constraints.default else {
            continue;
        };

        if record.get(&field.name).is_null() {
            record.set(&field.name, default.clone());
        }
    }
}

/// Checks field constraints. On create every field is checked; on update
/// only fields present on the record. Fields in `pending` get their value
/// later in the operation and skip the required check.
pub(super) fn check(
    model: &ModelDescriptor,
    record: &Record,
    creating: bool,
    pending: &[&str],
) -> Result<()> {
    for field in model.fields.values() {
        if !creating && !record.contains(&field.name) {
            continue;
        }

        let value = record.get(&field.name);

        if field.constraints.required
            && !field.constraints.auto_increment
            && !pending.contains(&field.name.as_str())
            && is_blank(value)
        {
            return Err(Error::validation_required(&field.name));
        }

        check_length(field, value)?;
        check_range(field, value)?;
    }

    Ok(())
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Bytes(b) => b.is_empty(),
        _ => false,
    }
}

fn check_length(field: &FieldDescriptor, value: &Value) -> Result<()> {
    let (min, max) = (field.constraints.min_len, field.constraints.max_len);
    if min.is_none() && max.is_none() {
        return Ok(());
    }

    let Some(text) = value.as_str() else {
        return Ok(());
    };

    let len = text.chars().count();
    if min.is_some_and(|min| len < min) || max.is_some_and(|max| len > max) {
        return Err(Error::validation_length(&field.name, len, min, max));
    }

    Ok(())
}

fn check_range(field: &FieldDescriptor, value: &Value) -> Result<()> {
    let (min, max) = (field.constraints.min, field.constraints.max);
    if min.is_none() && max.is_none() {
        return Ok(());
    }

    let Some(n) = value.as_f64() else {
        return Ok(());
    };

    if min.is_some_and(|min| n < min) || max.is_some_and(|max| n > max) {
        return Err(Error::validation_range(&field.name, n, min, max));
    }

    Ok(())
}
