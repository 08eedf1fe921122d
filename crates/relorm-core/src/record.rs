use crate::{stmt::Value, Result};

use indexmap::{IndexMap, IndexSet};

static NULL: Value = Value::Null;

/// A dynamically shaped record: field values keyed by logical name plus
/// the related records attached to its relations.
#[derive(Debug, Clone, Default)]
pub struct Record {
    collection: String,
    values: IndexMap<String, Value>,
    related: IndexMap<String, Related>,

    /// Fields set since the record was last loaded or persisted.
    changed: IndexSet<String>,
}

/// Records attached to one relation slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Related {
    One(Option<Box<Record>>),
    Many(Vec<Record>),
}

impl Record {
    pub fn new(collection: impl Into<String>) -> Record {
        Record {
            collection: collection.into(),
            ..Record::default()
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Record {
        self.set(field, value);
        self
    }

    pub fn with_one(mut self, relation: impl Into<String>, record: Record) -> Record {
        self.set_one(relation, Some(record));
        self
    }

    pub fn with_many(mut self, relation: impl Into<String>, records: Vec<Record>) -> Record {
        self.set_many(relation, records);
        self
    }

    /// Value of `field`, null when absent.
    pub fn get(&self, field: &str) -> &Value {
        self.values.get(field).unwrap_or(&NULL)
    }

    pub fn get_as<T>(&self, field: &str) -> Result<T>
    where
        T: TryFrom<Value, Error = crate::Error>,
    {
        T::try_from(self.get(field).clone())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// Sets a field and records it as changed.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        let field = field.into();
        self.changed.insert(field.clone());
        self.values.insert(field, value.into());
    }

    /// Sets a field without recording a change, as done when loading.
    pub fn set_loaded(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.changed.shift_remove(field);
        self.values.shift_remove(field)
    }

    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.related.is_empty()
    }

    pub fn related(&self, relation: &str) -> Option<&Related> {
        self.related.get(relation)
    }

    pub fn related_names(&self) -> impl Iterator<Item = &str> {
        self.related.keys().map(String::as_str)
    }

    pub fn one(&self, relation: &str) -> Option<&Record> {
        match self.related.get(relation)? {
            Related::One(record) => record.as_deref(),
            Related::Many(_) => None,
        }
    }

    pub fn one_mut(&mut self, relation: &str) -> Option<&mut Record> {
        match self.related.get_mut(relation)? {
            Related::One(record) => record.as_deref_mut(),
            Related::Many(_) => None,
        }
    }

    pub fn many(&self, relation: &str) -> &[Record] {
        match self.related.get(relation) {
            Some(Related::Many(records)) => records,
            _ => &[],
        }
    }

    pub fn many_mut(&mut self, relation: &str) -> Option<&mut Vec<Record>> {
        match self.related.get_mut(relation)? {
            Related::Many(records) => Some(records),
            Related::One(_) => None,
        }
    }

    pub fn set_one(&mut self, relation: impl Into<String>, record: Option<Record>) {
        self.related
            .insert(relation.into(), Related::One(record.map(Box::new)));
    }

    pub fn set_many(&mut self, relation: impl Into<String>, records: Vec<Record>) {
        self.related.insert(relation.into(), Related::Many(records));
    }

    pub fn take_related(&mut self, relation: &str) -> Option<Related> {
        self.related.shift_remove(relation)
    }

    pub fn is_changed(&self, field: &str) -> bool {
        self.changed.contains(field)
    }

    pub fn changed(&self) -> impl Iterator<Item = &str> {
        self.changed.iter().map(String::as_str)
    }

    pub fn clear_changes(&mut self) {
        self.changed.clear();
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Record) -> bool {
        self.collection == other.collection
            && self.values == other.values
            && self.related == other.related
    }
}
