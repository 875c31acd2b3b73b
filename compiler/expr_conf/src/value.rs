//! Host values.

use std::collections::BTreeMap;
use std::fmt;

use expr_nature::{schema, Decl, HostType};

/// Instance of a host record type.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    /// The record type, or a pointer to it.
    pub ty: HostType,
    pub fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new(ty: HostType) -> Self {
        Record {
            ty,
            fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }
}

/// A value supplied by the embedding host.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Record(Record),
    /// A value that states its own shape instead of carrying data.
    Decl(Decl),
}

impl Value {
    /// Map value from key/value pairs.
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Concrete runtime type. Nil has none; a declaration has the type its
    /// Nature binds.
    pub fn type_of(&self) -> Option<HostType> {
        match self {
            Value::Nil => None,
            Value::Bool(_) => Some(schema::bool()),
            Value::Int(_) => Some(schema::int()),
            Value::Float(_) => Some(schema::float()),
            Value::String(_) => Some(schema::string()),
            Value::Array(_) => Some(schema::any_slice()),
            Value::Map(_) => Some(schema::any_map()),
            Value::Record(record) => Some(record.ty.clone()),
            Value::Decl(decl) => decl.nature().ty,
        }
    }

    /// Short description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Value::Nil => "nil".to_owned(),
            Value::Decl(_) => "declaration".to_owned(),
            other => other
                .type_of()
                .map_or_else(|| "unknown".to_owned(), |ty| ty.name()),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<Decl> for Value {
    fn from(decl: Decl) -> Self {
        Value::Decl(decl)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Map(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k:?}: {v}")?;
                }
                f.write_str("}")
            }
            Value::Record(record) => {
                write!(f, "{}{{", record.ty)?;
                for (i, (k, v)) in record.fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Value::Decl(decl) => write!(f, "{}", decl.nature()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_from_json() {
        let value = Value::from(json!({"a": [1, 2.5, null], "b": "x", "c": true}));
        let expected = Value::map([
            (
                "a",
                Value::Array(vec![Value::Int(1), Value::Float(2.5), Value::Nil]),
            ),
            ("b", Value::from("x")),
            ("c", Value::Bool(true)),
        ]);
        assert_eq!(value, expected);
    }

    #[test]
    fn test_large_unsigned_becomes_float() {
        let value = Value::from(json!(u64::MAX));
        assert!(matches!(value, Value::Float(_)));
    }

    #[test]
    fn test_type_of() {
        assert_eq!(Value::Nil.type_of(), None);
        assert_eq!(Value::Int(1).type_of(), Some(schema::int()));
        assert_eq!(Value::Array(vec![]).type_of(), Some(schema::any_slice()));
        assert_eq!(Value::map::<&str>([]).type_of(), Some(schema::any_map()));

        let user = schema::record("User").field("Name", schema::string()).build();
        let record = Value::Record(Record::new(user.clone()).with("Name", "ann".into()));
        assert_eq!(record.type_of(), Some(user));

        let decl = Value::Decl(Decl::array(Decl::any()));
        assert_eq!(decl.type_of(), Some(schema::any_slice()));
    }

    #[test]
    fn test_describe_and_display() {
        assert_eq!(Value::Nil.describe(), "nil");
        assert_eq!(Value::Float(1.0).describe(), "float");
        assert_eq!(Value::Array(vec![]).describe(), "[]any");
        let value = Value::map([("k", Value::Array(vec![Value::Int(1)]))]);
        assert_eq!(value.to_string(), r#"{"k": [1]}"#);

        let user = schema::record("User")
            .field("Age", schema::int())
            .field("Name", schema::string())
            .build();
        let record = Record::new(user)
            .with("Name", "ann".into())
            .with("Age", Value::Int(7));
        assert_eq!(Value::Record(record).to_string(), r#"User{Age: 7, Name: "ann"}"#);
    }
}
