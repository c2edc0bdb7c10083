//! Declarative payload schemas for the entity types.
//!
//! A [`Schema`] lists the required fields of an entity and their types. It is
//! checked against an untyped JSON payload before anything else happens to a
//! write request, and it reports every offending field at once.

use crate::enums::FieldType;
use crate::error::ValidationErrors;
use crate::structs::{Member, WorkoutSession};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

pub const MISSING_FIELD: &str = "Missing data for required field.";
pub const NULL_FIELD: &str = "Field may not be null.";
pub const UNKNOWN_FIELD: &str = "Unknown field.";
pub const INVALID_INPUT: &str = "Invalid input type.";

/// One required field of a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldType,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: FieldType) -> Self {
        Self { name, kind }
    }
}

/// The field list of one entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub entity: &'static str,
    pub fields: &'static [FieldSpec],
}

pub const MEMBER_SCHEMA: Schema = Schema {
    entity: "Member",
    fields: &[
        FieldSpec::new("id", FieldType::Integer),
        FieldSpec::new("name", FieldType::String),
        FieldSpec::new("age", FieldType::Integer),
    ],
};

pub const WORKOUT_SESSION_SCHEMA: Schema = Schema {
    entity: "WorkoutSession",
    fields: &[
        FieldSpec::new("session_id", FieldType::Integer),
        FieldSpec::new("member_id", FieldType::Integer),
        FieldSpec::new("session_date", FieldType::Date),
        FieldSpec::new("session_time", FieldType::Time),
        FieldSpec::new("activity", FieldType::String),
    ],
};

impl Schema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Checks `payload` against the schema.
    ///
    /// On success returns the payload's fields in canonical form. On failure
    /// returns every missing, null, mistyped or unknown field.
    pub fn validate(&self, payload: &Value) -> Result<Map<String, Value>, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let Some(object) = payload.as_object() else {
            errors.add(ValidationErrors::SCHEMA_KEY, INVALID_INPUT);
            return Err(errors);
        };

        let mut record = Map::with_capacity(self.fields.len());
        for spec in self.fields {
            match object.get(spec.name) {
                None => errors.add(spec.name, MISSING_FIELD),
                Some(Value::Null) => errors.add(spec.name, NULL_FIELD),
                Some(raw) => match spec.kind.coerce(raw) {
                    Some(value) => {
                        record.insert(spec.name.to_owned(), value);
                    }
                    None => errors.add(spec.name, spec.kind.invalid_message()),
                },
            }
        }

        for name in object.keys() {
            if self.field(name).is_none() {
                errors.add(name.as_str(), UNKNOWN_FIELD);
            }
        }

        if errors.is_empty() {
            Ok(record)
        } else {
            Err(errors)
        }
    }

    /// Validates `payload` and deserializes it into `T`.
    pub fn load<T: DeserializeOwned>(&self, payload: &Value) -> Result<T, ValidationErrors> {
        let record = self.validate(payload)?;
        serde_json::from_value(Value::Object(record)).map_err(|e| {
            let mut errors = ValidationErrors::new();
            errors.add(ValidationErrors::SCHEMA_KEY, e.to_string());
            errors
        })
    }
}

/// A record type that is created from a validated request payload.
pub trait Entity: DeserializeOwned + Serialize + Send + Sync + 'static {
    const SCHEMA: Schema;

    fn from_payload(payload: &Value) -> Result<Self, ValidationErrors> {
        Self::SCHEMA.load(payload)
    }
}

impl Entity for Member {
    const SCHEMA: Schema = MEMBER_SCHEMA;
}

impl Entity for WorkoutSession {
    const SCHEMA: Schema = WORKOUT_SESSION_SCHEMA;
}
