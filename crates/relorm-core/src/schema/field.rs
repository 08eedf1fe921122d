use crate::{
    stmt::{Type, Value},
    Result,
};

use heck::ToSnakeCase;

/// Metadata for one stored field of a model.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Logical name, as used on records
    pub name: String,

    /// Backend column name
    pub column: String,

    pub ty: Type,
    pub constraints: Constraints,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constraints {
    pub primary_key: bool,
    pub auto_increment: bool,
    pub required: bool,
    pub unique: bool,

    /// Name of a group of fields that must be unique together
    pub unique_group: Option<String>,

    pub min_len: Option<usize>,
    pub max_len: Option<usize>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub default: Option<Value>,

    /// Omit the field from inserts while it holds a zero value
    pub ignore_if_zero: bool,

    /// Store a structured value as one opaque JSON column
    pub marshal: bool,

    /// Flatten a structured value into one column per sub-field
    pub embed: Vec<EmbedField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbedField {
    pub name: String,
    pub ty: Type,
}

impl FieldDescriptor {
    pub fn is_primary_key(&self) -> bool {
        self.constraints.primary_key
    }

    pub fn is_embedded(&self) -> bool {
        !self.constraints.embed.is_empty()
    }

    /// Backend columns the field is stored in, with their types.
    pub fn storage_columns(&self) -> Vec<(String, Type)> {
        if self.is_embedded() {
            self.constraints
                .embed
                .iter()
                .map(|sub| (self.embed_column(sub), sub.ty))
                .collect()
        } else {
            vec![(self.column.clone(), self.ty)]
        }
    }

    fn embed_column(&self, sub: &EmbedField) -> String {
        format!("{}_{}", self.column, sub.name.to_snake_case())
    }

    /// Converts a record value into the column values it is stored as.
    pub fn to_storage(&self, value: &Value) -> Result<Vec<(String, Value)>> {
        if self.is_embedded() {
            let object = match value {
                Value::Json(serde_json::Value::Object(object)) => Some(object),
                _ => None,
            };

            return self
                .constraints
                .embed
                .iter()
                .map(|sub| {
                    let value = match object.and_then(|object| object.get(&sub.name)) {
                        Some(json) => Value::from_json(json).cast(sub.ty)?,
                        None => Value::Null,
                    };
                    Ok((self.embed_column(sub), value))
                })
                .collect();
        }

        let stored = if self.constraints.marshal {
            match value {
                Value::Null => Value::Null,
                value => Value::String(value.to_json().to_string()),
            }
        } else if self.ty == Type::Json {
            value.clone()
        } else {
            value.clone().cast(self.ty)?
        };

        Ok(vec![(self.column.clone(), stored)])
    }

    /// Rebuilds a record value from stored columns, coercing to the field type.
    pub fn from_storage(&self, mut column: impl FnMut(&str) -> Option<Value>) -> Result<Value> {
        if self.is_embedded() {
            let mut object = serde_json::Map::new();
            let mut any = false;

            for sub in &self.constraints.embed {
                let value = column(&self.embed_column(sub))
                    .unwrap_or_default()
                    .cast(sub.ty)?;
                any |= !value.is_null();
                object.insert(sub.name.clone(), value.to_json());
            }

            return Ok(if any {
                Value::Json(object.into())
            } else {
                Value::Null
            });
        }

        column(&self.column).unwrap_or_default().cast(self.ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std_util::assert_ok;

    fn field(ty: Type, constraints: Constraints) -> FieldDescriptor {
        FieldDescriptor {
            name: "Settings".into(),
            column: "settings".into(),
            ty,
            constraints,
        }
    }

    #[test]
    fn marshal_stores_json_text() {
        let field = field(
            Type::Json,
            Constraints {
                marshal: true,
                ..Constraints::default()
            },
        );
        let stored = assert_ok!(field.to_storage(&Value::Json(json!({"theme": "dark"}))));
        assert_eq!(
            stored,
            vec![("settings".to_string(), Value::from(r#"{"theme":"dark"}"#))]
        );

        let loaded = assert_ok!(field.from_storage(|_| Some(stored[0].1.clone())));
        assert_eq!(loaded, Value::Json(json!({"theme": "dark"})));
    }

    #[test]
    fn embed_flattens_sub_fields() {
        let field = FieldDescriptor {
            name: "Address".into(),
            column: "address".into(),
            ty: Type::Json,
            constraints: Constraints {
                embed: vec![
                    EmbedField {
                        name: "City".into(),
                        ty: Type::String,
                    },
                    EmbedField {
                        name: "Zip".into(),
                        ty: Type::I64,
                    },
                ],
                ..Constraints::default()
            },
        };

        let stored = assert_ok!(field.to_storage(&Value::Json(json!({"City": "Lyon", "Zip": 69001}))));
        assert_eq!(
            stored,
            vec![
                ("address_city".to_string(), Value::from("Lyon")),
                ("address_zip".to_string(), Value::from(69001)),
            ]
        );

        let loaded = assert_ok!(field.from_storage(|column| {
            stored
                .iter()
                .find(|(name, _)| name == column)
                .map(|(_, value)| value.clone())
        }));
        assert_eq!(loaded, Value::Json(json!({"City": "Lyon", "Zip": 69001})));
    }

    #[test]
    fn plain_fields_are_coerced() {
        let field = field(Type::Bool, Constraints::default());
        let loaded = assert_ok!(field.from_storage(|_| Some(Value::from(1))));
        assert_eq!(loaded, Value::Bool(true));
    }
}
