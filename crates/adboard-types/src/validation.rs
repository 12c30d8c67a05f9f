//! Shape checking for incoming JSON bodies.
//!
//! Each request type lists its fields explicitly in a [`Validate`] impl. A
//! [`Fields`] collector walks those fields over the raw object and records a
//! [`FieldError`] for every problem, so a single response can report all of
//! them. Keys the type does not name are ignored.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Location used when the body itself has the wrong shape.
pub const ROOT_LOC: &str = "__root__";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    pub fn new(field: &str, msg: &str, kind: &str) -> Self {
        Self {
            loc: vec![field.to_string()],
            msg: msg.to_string(),
            kind: kind.to_string(),
        }
    }

    fn missing(field: &str) -> Self {
        Self::new(field, "field required", "value_error.missing")
    }

    fn null(field: &str) -> Self {
        Self::new(field, "none is not an allowed value", "type_error.none.not_allowed")
    }
}

pub trait Validate: Sized {
    fn validate(raw: &Map<String, Value>) -> Result<Self, Vec<FieldError>>;

    /// Entry point for an arbitrary JSON value; anything but an object fails.
    fn validate_value(raw: &Value) -> Result<Self, Vec<FieldError>> {
        match raw.as_object() {
            Some(map) => Self::validate(map),
            None => Err(vec![FieldError::new(
                ROOT_LOC,
                "value is not a valid dict",
                "type_error.dict",
            )]),
        }
    }
}

pub struct Fields<'a> {
    raw: &'a Map<String, Value>,
    errors: Vec<FieldError>,
}

impl<'a> Fields<'a> {
    pub fn new(raw: &'a Map<String, Value>) -> Self {
        Self {
            raw,
            errors: Vec::new(),
        }
    }

    pub fn required_str(&mut self, field: &str) -> Option<String> {
        match self.raw.get(field) {
            None => {
                self.errors.push(FieldError::missing(field));
                None
            }
            Some(Value::Null) => {
                self.errors.push(FieldError::null(field));
                None
            }
            Some(value) => self.check_str(field, value),
        }
    }

    /// Absent, `null` and `""` all mean "leave unchanged".
    pub fn optional_str(&mut self, field: &str) -> Option<String> {
        match self.raw.get(field) {
            None | Some(Value::Null) => None,
            Some(value) => self.check_str(field, value).filter(|s| !s.is_empty()),
        }
    }

    pub fn required_int(&mut self, field: &str) -> Option<i64> {
        match self.raw.get(field) {
            None => {
                self.errors.push(FieldError::missing(field));
                None
            }
            Some(Value::Null) => {
                self.errors.push(FieldError::null(field));
                None
            }
            Some(value) => match value.as_i64() {
                Some(n) => Some(n),
                None => {
                    self.errors.push(FieldError::new(
                        field,
                        "value is not a valid integer",
                        "type_error.integer",
                    ));
                    None
                }
            },
        }
    }

    /// Wrap `value` in `Ok` unless some field failed.
    pub fn finish<T>(self, value: T) -> Result<T, Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self.errors)
        }
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    fn check_str(&mut self, field: &str, value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            _ => {
                self.errors
                    .push(FieldError::new(field, "str type expected", "type_error.str"));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn collects_every_failing_field() {
        let raw = object(json!({ "a": 1, "b": null }));
        let mut fields = Fields::new(&raw);

        assert_eq!(fields.required_str("a"), None);
        assert_eq!(fields.required_str("b"), None);
        assert_eq!(fields.required_str("c"), None);

        let errors = fields.into_errors();
        let kinds: Vec<&str> = errors.iter().map(|e| e.kind.as_str()).collect();
        assert_eq!(
            kinds,
            ["type_error.str", "type_error.none.not_allowed", "value_error.missing"]
        );
        assert_eq!(errors[2].loc, vec!["c".to_string()]);
    }

    #[test]
    fn optional_fields_treat_null_as_absent() {
        let raw = object(json!({ "name": null }));
        let mut fields = Fields::new(&raw);

        assert_eq!(fields.optional_str("name"), None);
        assert_eq!(fields.optional_str("password"), None);
        assert!(fields.finish(()).is_ok());
    }

    #[test]
    fn empty_strings_are_valid_values() {
        let raw = object(json!({ "name": "" }));
        let mut fields = Fields::new(&raw);

        assert_eq!(fields.required_str("name"), Some(String::new()));
        assert!(fields.finish(()).is_ok());
    }

    #[test]
    fn empty_optional_string_means_unchanged() {
        let raw = object(json!({ "name": "" }));
        let mut fields = Fields::new(&raw);

        assert_eq!(fields.optional_str("name"), None);
        assert!(fields.finish(()).is_ok());
    }

    #[test]
    fn integers_must_be_whole_numbers() {
        let raw = object(json!({ "a": 7, "b": 1.5, "c": "7" }));
        let mut fields = Fields::new(&raw);

        assert_eq!(fields.required_int("a"), Some(7));
        assert_eq!(fields.required_int("b"), None);
        assert_eq!(fields.required_int("c"), None);
        assert_eq!(fields.into_errors().len(), 2);
    }

    #[test]
    fn field_error_serializes_type_key() {
        let err = FieldError::new("name", "field required", "value_error.missing");
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(
            value,
            json!({ "loc": ["name"], "msg": "field required", "type": "value_error.missing" })
        );
    }
}
