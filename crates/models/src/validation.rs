//! Typed field extraction from JSON request bodies.
//!
//! Presence of every required field is checked before any type check, so a
//! body missing several fields always reports the first one in field order.

use serde_json::{Map, Value};

use crate::errors::ValidationError;

/// Longest product name the `product.name` column accepts.
pub const MAX_NAME_LEN: usize = 260;

pub(crate) struct Fields<'a> {
    entity: &'static str,
    obj: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(entity: &'static str, value: &'a Value, required: &[&'static str]) -> Result<Self, ValidationError> {
        let obj = value.as_object().ok_or(ValidationError::NotAnObject { entity })?;
        if let Some(&field) = required.iter().find(|f| !obj.contains_key(**f)) {
            return Err(ValidationError::MissingField { entity, field });
        }
        Ok(Self { entity, obj })
    }

    fn get(&self, field: &'static str) -> Result<&'a Value, ValidationError> {
        self.obj
            .get(field)
            .ok_or(ValidationError::MissingField { entity: self.entity, field })
    }

    fn wrong_type(&self, field: &'static str, expected: &'static str) -> ValidationError {
        ValidationError::WrongType { entity: self.entity, field, expected }
    }

    pub(crate) fn int(&self, field: &'static str) -> Result<i32, ValidationError> {
        let raw = self.get(field)?.as_i64().ok_or_else(|| self.wrong_type(field, "an integer"))?;
        i32::try_from(raw).map_err(|_| ValidationError::InvalidValue {
            entity: self.entity,
            field,
            reason: format!("{raw} is out of range"),
        })
    }

    pub(crate) fn number(&self, field: &'static str) -> Result<f64, ValidationError> {
        self.get(field)?.as_f64().ok_or_else(|| self.wrong_type(field, "a number"))
    }

    pub(crate) fn string(&self, field: &'static str) -> Result<&'a str, ValidationError> {
        self.get(field)?.as_str().ok_or_else(|| self.wrong_type(field, "a string"))
    }

    pub(crate) fn array(&self, field: &'static str) -> Result<&'a Vec<Value>, ValidationError> {
        self.get(field)?.as_array().ok_or_else(|| self.wrong_type(field, "a list"))
    }
}

/// Product names are required and bounded by the column width.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::InvalidValue { entity: "Product", field: "name", reason: "must not be empty".into() });
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::InvalidValue {
            entity: "Product",
            field: "name",
            reason: format!("must be at most {MAX_NAME_LEN} characters"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_missing_field_wins_over_type_errors() {
        let body = json!({"a": "not a number"});
        let err = Fields::new("Thing", &body, &["a", "b", "c"]).err().unwrap();
        assert_eq!(err, ValidationError::MissingField { entity: "Thing", field: "b" });
    }

    #[test]
    fn int_rejects_floats_and_out_of_range() {
        let body = json!({"q": 2.5, "big": 5_000_000_000i64});
        let f = Fields::new("Thing", &body, &["q", "big"]).unwrap();
        assert!(matches!(f.int("q"), Err(ValidationError::WrongType { field: "q", .. })));
        assert!(matches!(f.int("big"), Err(ValidationError::InvalidValue { field: "big", .. })));
    }

    #[test]
    fn number_accepts_integers() {
        let body = json!({"price": 10});
        let f = Fields::new("Thing", &body, &["price"]).unwrap();
        assert_eq!(f.number("price").unwrap(), 10.0);
    }

    #[test]
    fn null_is_a_wrong_type_not_a_missing_field() {
        let body = json!({"name": null});
        let f = Fields::new("Thing", &body, &["name"]).unwrap();
        assert!(matches!(f.string("name"), Err(ValidationError::WrongType { field: "name", .. })));
    }

    #[test]
    fn name_bounds() {
        assert!(validate_name("Widget").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(MAX_NAME_LEN)).is_ok());
        assert!(validate_name(&"x".repeat(MAX_NAME_LEN + 1)).is_err());
    }
}
