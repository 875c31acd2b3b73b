//! Environment introspection.
//!
//! Builds the root Nature for an environment value:
//!
//! | environment | root Nature |
//! |---|---|
//! | none | strict, empty `map[string]any` |
//! | declaration | the declaration's Nature |
//! | record (or pointer to one) | strict, bound to the record type |
//! | map | open `map[string]any`, one field per present key |
//!
//! Record members are not enumerated here; the checker resolves them one at
//! a time through `Nature::get`. Map entries are scanned once.

use expr_nature::{schema, Kind, Nature};

use crate::{ConfigError, Value};

/// Root Nature of a compilation without an environment.
pub fn empty_env() -> Nature {
    let mut nature = Nature::of(schema::any_map());
    nature.strict = true;
    nature
}

/// Derive the root Nature from an environment value.
#[tracing::instrument(level = "debug", skip_all)]
pub fn env(env: Option<&Value>) -> Result<Nature, ConfigError> {
    let Some(env) = env else {
        return Ok(empty_env());
    };

    match env {
        Value::Decl(decl) => Ok(decl.nature()),
        Value::Record(record) if record.ty.deref_all().kind() == Kind::Struct => {
            let mut nature = Nature::of(record.ty.clone());
            nature.strict = true;
            tracing::debug!(ty = %record.ty, "record environment");
            Ok(nature)
        }
        Value::Map(entries) => {
            let mut nature = Nature::of(schema::any_map());
            nature.fields = entries
                .iter()
                .map(|(key, value)| (key.clone(), entry_nature(value)))
                .collect();
            tracing::debug!(keys = entries.len(), "map environment");
            Ok(nature)
        }
        other => {
            tracing::warn!(found = %other.describe(), "unsupported environment");
            Err(ConfigError::UnsupportedEnvironment {
                found: other.describe(),
            })
        }
    }
}

fn entry_nature(value: &Value) -> Nature {
    match value {
        Value::Decl(decl) => decl.nature(),
        Value::Nil => Nature::nil(),
        other => other.type_of().map_or_else(Nature::unknown, Nature::of),
    }
}

#[cfg(test)]
mod tests {
    use expr_nature::Decl;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::Record;

    #[test]
    fn test_absent_environment() {
        let Ok(nature) = env(None) else {
            panic!("absent environment is valid");
        };
        assert!(nature.strict);
        assert!(nature.fields.is_empty());
        assert!(nature.is_fast_map());
        assert!(nature.get("anything").is_none());
    }

    #[test]
    fn test_map_environment() {
        let value = Value::from(json!({"x": true, "y": null}));
        let Ok(nature) = env(Some(&value)) else {
            panic!("map environment is valid");
        };
        assert!(!nature.strict);
        assert_eq!(nature.fields.len(), 2);

        let x = &nature.fields["x"];
        assert_eq!(x.ty, Some(schema::bool()));
        assert!(!x.nil);

        let y = &nature.fields["y"];
        assert!(y.nil);
        assert!(y.is_unknown());
    }

    #[test]
    fn test_map_entries_are_not_expanded() {
        let value = Value::from(json!({"user": {"name": "ann"}, "tags": ["a"]}));
        let Ok(nature) = env(Some(&value)) else {
            panic!("map environment is valid");
        };
        let user = &nature.fields["user"];
        assert_eq!(user.ty, Some(schema::any_map()));
        assert!(user.fields.is_empty());
        assert_eq!(nature.fields["tags"].ty, Some(schema::any_slice()));
    }

    #[test]
    fn test_declared_entries_keep_their_shape() {
        let value = Value::map([
            ("count", Value::Int(3)),
            (
                "user",
                Value::Decl(Decl::map([("name", Decl::Type(schema::string()))])),
            ),
        ]);
        let Ok(nature) = env(Some(&value)) else {
            panic!("map environment is valid");
        };
        let user = &nature.fields["user"];
        assert!(user.strict);
        assert_eq!(user.get("name").and_then(|n| n.ty), Some(schema::string()));
        assert!(user.get("age").is_none());
    }

    #[test]
    fn test_root_declaration() {
        let decl = Decl::map([("x", Decl::Type(schema::int()))]).with_extra(Decl::any());
        let Ok(nature) = env(Some(&Value::Decl(decl))) else {
            panic!("declared environment is valid");
        };
        assert!(!nature.strict);
        assert_eq!(nature.get("x").and_then(|n| n.ty), Some(schema::int()));
        assert_eq!(nature.get("other").and_then(|n| n.ty), Some(schema::any()));
    }

    #[test]
    fn test_record_environment() {
        let env_type = schema::record("Env")
            .field("Count", schema::int())
            .method("Double", schema::func(vec![schema::int()], vec![schema::int()], false))
            .build();

        for ty in [env_type.clone(), schema::pointer(env_type)] {
            let value = Value::Record(Record::new(ty.clone()));
            let Ok(nature) = env(Some(&value)) else {
                panic!("record environment is valid");
            };
            assert!(nature.strict);
            assert_eq!(nature.ty, Some(ty));
            assert_eq!(nature.get("Count").and_then(|n| n.ty), Some(schema::int()));
            assert!(nature.get("Double").is_some_and(|n| n.method));
        }
    }

    #[test]
    fn test_unsupported_environments() {
        let not_a_record = Value::Record(Record::new(schema::slice(schema::int())));
        for value in [
            Value::Nil,
            Value::Int(1),
            Value::Array(vec![]),
            not_a_record,
        ] {
            let Err(err) = env(Some(&value)) else {
                panic!("{value} is not an environment");
            };
            assert!(matches!(err, ConfigError::UnsupportedEnvironment { .. }));
        }
        let Err(err) = env(Some(&Value::Int(1))) else {
            panic!("scalar is not an environment");
        };
        assert_eq!(
            err.to_string(),
            "unsupported environment: expected a record or a map, found int"
        );
    }
}
