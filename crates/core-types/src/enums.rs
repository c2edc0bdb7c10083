use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The wire format for calendar dates (`session_date`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Accepted wire formats for times of day (`session_time`), tried in order.
const TIME_FORMATS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M"];

/// The type a schema declares for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    Integer,
    String,
    Date,
    Time,
}

impl FieldType {
    /// The reason reported when a present value cannot be read as this type.
    pub fn invalid_message(&self) -> &'static str {
        match self {
            FieldType::Integer => "Not a valid integer.",
            FieldType::String => "Not a valid string.",
            FieldType::Date => "Not a valid date.",
            FieldType::Time => "Not a valid time.",
        }
    }

    /// Reads `value` as this type and returns it in canonical JSON form.
    ///
    /// Integers accept JSON integers, integral floats and numeric strings, and
    /// must fit in 32 bits. Booleans are never integers. Dates and times must
    /// be strings in ISO form; they come back normalised so that typed
    /// deserialization cannot fail afterwards.
    pub fn coerce(&self, value: &Value) -> Option<Value> {
        match self {
            FieldType::Integer => coerce_integer(value).map(Value::from),
            FieldType::String => value.as_str().map(|s| Value::String(s.to_owned())),
            FieldType::Date => {
                let raw = value.as_str()?;
                let date = NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()?;
                Some(Value::String(date.format(DATE_FORMAT).to_string()))
            }
            FieldType::Time => {
                let raw = value.as_str()?.trim();
                let time = TIME_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok())?;
                Some(Value::String(time.format("%H:%M:%S%.f").to_string()))
            }
        }
    }
}

fn coerce_integer(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i32::try_from(i).ok()
            } else {
                let f = n.as_f64()?;
                if f.fract() == 0.0 && f >= f64::from(i32::MIN) && f <= f64::from(i32::MAX) {
                    Some(f as i32)
                } else {
                    None
                }
            }
        }
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integers_accept_numeric_forms_but_not_booleans() {
        assert_eq!(FieldType::Integer.coerce(&json!(30)), Some(json!(30)));
        assert_eq!(FieldType::Integer.coerce(&json!(30.0)), Some(json!(30)));
        assert_eq!(FieldType::Integer.coerce(&json!(" 42 ")), Some(json!(42)));
        assert_eq!(FieldType::Integer.coerce(&json!(30.5)), None);
        assert_eq!(FieldType::Integer.coerce(&json!(true)), None);
        assert_eq!(FieldType::Integer.coerce(&json!("thirty")), None);
        assert_eq!(FieldType::Integer.coerce(&json!(10_000_000_000_i64)), None);
    }

    #[test]
    fn strings_must_be_json_strings() {
        assert_eq!(FieldType::String.coerce(&json!("Yoga")), Some(json!("Yoga")));
        assert_eq!(FieldType::String.coerce(&json!(12)), None);
        assert_eq!(FieldType::String.coerce(&json!(["Yoga"])), None);
    }

    #[test]
    fn dates_and_times_are_normalised() {
        assert_eq!(
            FieldType::Date.coerce(&json!("2024-05-01")),
            Some(json!("2024-05-01"))
        );
        assert_eq!(FieldType::Date.coerce(&json!("2024-02-30")), None);
        assert_eq!(FieldType::Date.coerce(&json!("05/01/2024")), None);

        assert_eq!(FieldType::Time.coerce(&json!("09:30")), Some(json!("09:30:00")));
        assert_eq!(
            FieldType::Time.coerce(&json!("18:05:30")),
            Some(json!("18:05:30"))
        );
        assert_eq!(FieldType::Time.coerce(&json!("25:00")), None);
        assert_eq!(FieldType::Time.coerce(&json!(930)), None);
    }
}
