use super::*;
use crate::{Error, Result};

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

impl Value {
    /// Coerces a value read from a storage collaborator into `ty`.
    ///
    /// Null passes through unchanged. Lists are cast element-wise.
    pub fn cast(self, ty: Type) -> Result<Value> {
        use Value::*;

        let ret = match (self, ty) {
            (Null, _) => Null,
            (List(items), ty) => List(
                items
                    .into_iter()
                    .map(|item| item.cast(ty))
                    .collect::<Result<_>>()?,
            ),
            (v @ Bool(_), Type::Bool)
            | (v @ I64(_), Type::I64)
            | (v @ F64(_), Type::F64)
            | (v @ String(_), Type::String)
            | (v @ Bytes(_), Type::Bytes)
            | (v @ Time(_), Type::Time)
            | (v @ Json(_), Type::Json) => v,

            (I64(v), Type::Bool) if v == 0 || v == 1 => Bool(v == 1),
            (String(v), Type::Bool) => match v.as_str() {
                "true" | "t" | "1" => Bool(true),
                "false" | "f" | "0" => Bool(false),
                _ => return Err(Error::type_conversion(String(v), ty)),
            },
            (Bool(v), Type::I64) => I64(v as i64),
            (F64(v), Type::I64) if v.fract() == 0.0 => I64(v as i64),
            (String(v), Type::I64) => match v.parse() {
                Ok(n) => I64(n),
                Err(_) => return Err(Error::type_conversion(String(v), ty)),
            },
            (I64(v), Type::F64) => F64(v as f64),
            (String(v), Type::F64) => match v.parse() {
                Ok(n) => F64(n),
                Err(_) => return Err(Error::type_conversion(String(v), ty)),
            },
            (Bytes(v), Type::String) => match std::string::String::from_utf8(v) {
                Ok(s) => String(s),
                Err(e) => return Err(Error::type_conversion(Bytes(e.into_bytes()), ty)),
            },
            (Json(serde_json::Value::String(v)), Type::String) => String(v),
            (String(v), Type::Bytes) => Bytes(v.into_bytes()),
            (String(v), Type::Time) => match parse_time(&v) {
                Some(t) => Time(t),
                None => return Err(Error::type_conversion(String(v), ty)),
            },
            (I64(v), Type::Time) => match Utc.timestamp_opt(v, 0).single() {
                Some(t) => Time(t),
                None => return Err(Error::type_conversion(I64(v), ty)),
            },
            (String(v), Type::Json) => match serde_json::from_str(&v) {
                Ok(json) => Json(json),
                Err(_) => return Err(Error::type_conversion(String(v), ty)),
            },
            (Bytes(v), Type::Json) => match serde_json::from_slice(&v) {
                Ok(json) => Json(json),
                Err(_) => return Err(Error::type_conversion(Bytes(v), ty)),
            },
            (Bool(v), Type::Json) => Json(v.into()),
            (I64(v), Type::Json) => Json(v.into()),
            (F64(v), Type::Json) => Json(v.into()),
            (v, ty) => return Err(Error::type_conversion(v, ty)),
        };

        Ok(ret)
    }
}

fn parse_time(src: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(src) {
        return Some(t.with_timezone(&Utc));
    }

    // SQL engines commonly return `YYYY-MM-DD HH:MM:SS[.fff]` without an offset.
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(src, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std_util::{assert_err, assert_ok};

    #[test]
    fn integer_to_bool() {
        assert_eq!(assert_ok!(Value::from(1).cast(Type::Bool)), Value::Bool(true));
        assert_eq!(assert_ok!(Value::from(0).cast(Type::Bool)), Value::Bool(false));
        let err = assert_err!(Value::from(7).cast(Type::Bool));
        assert!(err.is_type_conversion());
        assert_eq!(err.to_string(), "cannot convert i64 to bool");
    }

    #[test]
    fn text_to_time() {
        let value = assert_ok!(Value::from("2024-03-01T10:00:00Z").cast(Type::Time));
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        assert_eq!(value, Value::Time(expected));

        let value = assert_ok!(Value::from("2024-03-01 10:00:00").cast(Type::Time));
        assert_eq!(value, Value::Time(expected));
    }

    #[test]
    fn text_to_json() {
        let value = assert_ok!(Value::from(r#"{"theme":"dark"}"#).cast(Type::Json));
        assert_eq!(value, Value::Json(serde_json::json!({"theme": "dark"})));
    }

    #[test]
    fn null_passes_through() {
        assert_eq!(assert_ok!(Value::Null.cast(Type::Time)), Value::Null);
    }
}
