use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ModelError;

/// Largest integer a JSON number can carry without losing precision.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A persisted user record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub age: u64,
}

/// User fields as supplied by a client, before coercion and validation.
///
/// `None` means the field was absent. Field names other than `name`, `age`
/// and `id` end up in `unknown`; `id` is dropped because it always comes
/// from the server or the request path.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserCandidate {
    pub name: Option<Value>,
    pub age: Option<Value>,
    pub unknown: Vec<String>,
}

/// A candidate that passed validation: trimmed name, integer age.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedUser {
    pub name: String,
    pub age: u64,
}

impl UserCandidate {
    /// Build a candidate from `(field, value)` pairs. Later duplicates win.
    pub fn from_fields<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut candidate = Self::default();
        for (key, value) in fields {
            match key.as_str() {
                "name" => candidate.name = Some(value),
                "age" => candidate.age = Some(value),
                "id" => {}
                _ => {
                    if !candidate.unknown.contains(&key) {
                        candidate.unknown.push(key);
                    }
                }
            }
        }
        candidate
    }

    /// Candidate holding the current state of a stored record.
    pub fn from_user(user: &User) -> Self {
        Self {
            name: Some(Value::String(user.name.clone())),
            age: Some(Value::from(user.age)),
            unknown: Vec::new(),
        }
    }

    /// Overlay `patch` on top of `self`: fields present in the patch replace ours.
    pub fn merge(mut self, patch: UserCandidate) -> Self {
        if patch.name.is_some() {
            self.name = patch.name;
        }
        if patch.age.is_some() {
            self.age = patch.age;
        }
        for key in patch.unknown {
            if !self.unknown.contains(&key) {
                self.unknown.push(key);
            }
        }
        self
    }
}

impl ValidatedUser {
    pub fn into_user(self, id: impl Into<String>) -> User {
        User { id: id.into(), name: self.name, age: self.age }
    }
}

/// Enforce the user schema on a candidate.
pub fn validate(candidate: &UserCandidate) -> Result<ValidatedUser, ModelError> {
    if !candidate.unknown.is_empty() {
        return Err(ModelError::Validation(format!(
            "unrecognized field(s): {}",
            candidate.unknown.join(", ")
        )));
    }
    let name = validate_name(candidate.name.as_ref())?;
    let age = match candidate.age.as_ref() {
        None => return Err(ModelError::Validation("age is required".into())),
        Some(raw) => coerce_age(raw)
            .ok_or_else(|| ModelError::Validation("age must be a non-negative integer".into()))?,
    };
    Ok(ValidatedUser { name, age })
}

fn validate_name(raw: Option<&Value>) -> Result<String, ModelError> {
    match raw {
        None => Err(ModelError::Validation("name is required".into())),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Err(ModelError::Validation("name must not be empty".into()))
            } else {
                Ok(trimmed.to_string())
            }
        }
        Some(_) => Err(ModelError::Validation("name must be a string".into())),
    }
}

/// Coerce a raw `age` value to a non-negative integer.
///
/// Accepts JSON integers, floats without a fractional part, and strings
/// holding either. Booleans, null, blank strings and containers are rejected.
pub fn coerce_age(raw: &Value) -> Option<u64> {
    match raw {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(whole_non_negative)),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole_non_negative))
        }
        _ => None,
    }
}

fn whole_non_negative(f: f64) -> Option<u64> {
    if f.is_finite() && f.fract() == 0.0 && (0.0..=MAX_SAFE_INTEGER).contains(&f) {
        Some(f as u64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidate(value: Value) -> UserCandidate {
        match value {
            Value::Object(map) => UserCandidate::from_fields(map),
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn accepts_valid_user_and_trims_name() {
        let v = validate(&candidate(json!({"name": "  Ann  ", "age": 30}))).unwrap();
        assert_eq!(v, ValidatedUser { name: "Ann".into(), age: 30 });
        assert_eq!(v.into_user("7"), User { id: "7".into(), name: "Ann".into(), age: 30 });
    }

    #[test]
    fn rejects_missing_or_blank_name() {
        assert!(matches!(validate(&candidate(json!({"age": 3}))), Err(ModelError::Validation(_))));
        assert!(matches!(
            validate(&candidate(json!({"name": "   ", "age": 3}))),
            Err(ModelError::Validation(_))
        ));
        assert!(matches!(
            validate(&candidate(json!({"name": 42, "age": 3}))),
            Err(ModelError::Validation(_))
        ));
    }

    #[test]
    fn rejects_bad_ages() {
        for age in [json!(-1), json!(1.5), json!("abc"), json!(""), json!(null), json!(true), json!([1])] {
            let res = validate(&candidate(json!({"name": "Bob", "age": age.clone()})));
            assert!(res.is_err(), "age {age} should be rejected");
        }
        assert!(validate(&candidate(json!({"name": "Bob"}))).is_err());
    }

    #[test]
    fn coerces_numeric_strings_and_whole_floats() {
        assert_eq!(coerce_age(&json!("31")), Some(31));
        assert_eq!(coerce_age(&json!(" 31 ")), Some(31));
        assert_eq!(coerce_age(&json!("31.0")), Some(31));
        assert_eq!(coerce_age(&json!(40.0)), Some(40));
        assert_eq!(coerce_age(&json!(0)), Some(0));
        assert_eq!(coerce_age(&json!("-2")), None);
        assert_eq!(coerce_age(&json!("inf")), None);
    }

    #[test]
    fn unknown_fields_are_rejected_but_id_is_ignored() {
        let c = candidate(json!({"id": "99", "name": "Ann", "age": 1}));
        assert!(c.unknown.is_empty());
        assert!(validate(&c).is_ok());

        let c = candidate(json!({"name": "Ann", "age": 1, "email": "a@b"}));
        assert_eq!(c.unknown, vec!["email".to_string()]);
        assert!(matches!(validate(&c), Err(ModelError::Validation(msg)) if msg.contains("email")));
    }

    #[test]
    fn merge_keeps_omitted_fields() {
        let existing = User { id: "3".into(), name: "Ann".into(), age: 30 };
        let merged = UserCandidate::from_user(&existing).merge(candidate(json!({"age": 31})));
        let v = validate(&merged).unwrap();
        assert_eq!(v.into_user("3"), User { id: "3".into(), name: "Ann".into(), age: 31 });
    }

    #[test]
    fn merge_with_invalid_field_still_fails() {
        let existing = User { id: "3".into(), name: "Ann".into(), age: 30 };
        let merged = UserCandidate::from_user(&existing).merge(candidate(json!({"name": ""})));
        assert!(validate(&merged).is_err());
    }

    #[test]
    fn user_serializes_with_string_id() {
        let u = User { id: "1".into(), name: "A".into(), age: 20 };
        assert_eq!(serde_json::to_value(&u).unwrap(), json!({"id": "1", "name": "A", "age": 20}));
    }
}
