//! Typed values bound as parameters and decoded from rows.

use bytes::BytesMut;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use std::hash::{Hash, Hasher};
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};

/// A single SQL value.
///
/// Every value that reaches the server travels as a bound parameter; `Value`
/// is never formatted into SQL text.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Exact numeric (`NUMERIC` / `DECIMAL`).
    Decimal(Decimal),
    Text(String),
    Bytes(Vec<u8>),
    Json(serde_json::Value),
    Uuid(uuid::Uuid),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    TimestampTz(DateTime<Utc>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Short type label, used in logs and error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Json(_) => "json",
            Value::Uuid(_) => "uuid",
            Value::Date(_) => "date",
            Value::Timestamp(_) => "timestamp",
            Value::TimestampTz(_) => "timestamptz",
        }
    }
}

// Floats compare by bit pattern so `Value` can live in hash sets.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Json(a), Value::Json(b)) => a == b,
            (Value::Uuid(a), Value::Uuid(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::TimestampTz(a), Value::TimestampTz(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(v) => v.hash(state),
            Value::Int(v) => v.hash(state),
            Value::Float(v) => v.to_bits().hash(state),
            Value::Decimal(v) => v.hash(state),
            Value::Text(v) => v.hash(state),
            Value::Bytes(v) => v.hash(state),
            Value::Json(v) => v.to_string().hash(state),
            Value::Uuid(v) => v.hash(state),
            Value::Date(v) => v.hash(state),
            Value::Timestamp(v) => v.hash(state),
            Value::TimestampTz(v) => v.hash(state),
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v.into())
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => Int,
    u16 => Int,
    u32 => Int,
    f32 => Float,
    f64 => Float,
    Decimal => Decimal,
    String => Text,
    &str => Text,
    Vec<u8> => Bytes,
    &[u8] => Bytes,
    serde_json::Value => Json,
    uuid::Uuid => Uuid,
    NaiveDate => Date,
    NaiveDateTime => Timestamp,
    DateTime<Utc> => TimestampTz,
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn std::error::Error + Sync + Send>> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(v) => v.to_sql_checked(ty, out),
            Value::Int(v) => {
                // The server infers the column width at prepare time.
                if *ty == Type::INT2 {
                    i16::try_from(*v)?.to_sql_checked(ty, out)
                } else if *ty == Type::INT4 {
                    i32::try_from(*v)?.to_sql_checked(ty, out)
                } else if *ty == Type::FLOAT4 {
                    (*v as f32).to_sql_checked(ty, out)
                } else if *ty == Type::FLOAT8 {
                    (*v as f64).to_sql_checked(ty, out)
                } else if *ty == Type::NUMERIC {
                    Decimal::from(*v).to_sql_checked(ty, out)
                } else if *ty == Type::TEXT || *ty == Type::VARCHAR {
                    v.to_string().to_sql_checked(ty, out)
                } else {
                    v.to_sql_checked(ty, out)
                }
            }
            Value::Float(v) => {
                if *ty == Type::FLOAT4 {
                    (*v as f32).to_sql_checked(ty, out)
                } else {
                    v.to_sql_checked(ty, out)
                }
            }
            Value::Decimal(v) => v.to_sql_checked(ty, out),
            Value::Text(v) => v.to_sql_checked(ty, out),
            Value::Bytes(v) => v.to_sql_checked(ty, out),
            Value::Json(v) => v.to_sql_checked(ty, out),
            Value::Uuid(v) => v.to_sql_checked(ty, out),
            Value::Date(v) => v.to_sql_checked(ty, out),
            Value::Timestamp(v) => v.to_sql_checked(ty, out),
            Value::TimestampTz(v) => v.to_sql_checked(ty, out),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn option_none_is_null() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("ada")), Value::Text("ada".into()));
    }

    #[test]
    fn integers_widen_to_int() {
        assert_eq!(Value::from(7u8), Value::Int(7));
        assert_eq!(Value::from(-3i32).as_i64(), Some(-3));
    }

    #[test]
    fn floats_hash_by_bits() {
        let mut set = HashSet::new();
        set.insert(Value::Float(f64::NAN));
        set.insert(Value::Float(f64::NAN));
        set.insert(Value::Float(1.5));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn int_encodes_to_narrow_column() {
        let mut buf = BytesMut::new();
        let is_null = Value::Int(42).to_sql_checked(&Type::INT4, &mut buf).unwrap();
        assert!(matches!(is_null, IsNull::No));
        assert_eq!(&buf[..], &42i32.to_be_bytes());
    }

    #[test]
    fn int_overflowing_column_is_rejected() {
        let mut buf = BytesMut::new();
        assert!(
            Value::Int(i64::from(i16::MAX) + 1)
                .to_sql_checked(&Type::INT2, &mut buf)
                .is_err()
        );
    }

    #[test]
    fn decimals_compare_by_value_and_bind_to_numeric() {
        let a = Value::from(Decimal::new(150, 2));
        assert_eq!(a, Value::Decimal(Decimal::new(15, 1)));
        assert_eq!(a.type_name(), "decimal");

        let mut buf = BytesMut::new();
        assert!(a.to_sql_checked(&Type::NUMERIC, &mut buf).is_ok());
        let mut buf = BytesMut::new();
        assert!(Value::Int(3).to_sql_checked(&Type::NUMERIC, &mut buf).is_ok());
    }

    #[test]
    fn text_into_int_column_is_rejected() {
        let mut buf = BytesMut::new();
        assert!(
            Value::from("x")
                .to_sql_checked(&Type::INT8, &mut buf)
                .is_err()
        );
    }
}
