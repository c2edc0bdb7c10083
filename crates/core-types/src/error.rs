use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Field-keyed validation failures for a single payload.
///
/// Every offending field is listed, each with one or more human readable
/// reasons. Serializes as a plain JSON object, e.g.
/// `{"activity": ["Missing data for required field."]}`.
#[derive(Error, Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[error("{} field(s) failed validation: {}", .0.len(), self.fields().collect::<Vec<_>>().join(", "))]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    /// Key used for errors that concern the payload as a whole.
    pub const SCHEMA_KEY: &'static str = "_schema";

    pub fn new() -> Self {
        Self::default()
    }

    /// Records a reason against a field.
    pub fn add(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(reason.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the reasons recorded against `field`, if any.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Iterates over offending fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
