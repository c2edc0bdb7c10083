use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// A registered member of the fitness center. Rows live in the `Members` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Member {
    /// Caller-supplied identifier; never generated by the service.
    pub id: i32,
    pub name: String,
    pub age: i32,
}

/// A scheduled workout, addressed by (`session_id`, `member_id`).
/// Rows live in the `WorkoutSessions` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct WorkoutSession {
    pub session_id: i32,
    /// Refers to a `Member` by convention only; the reference is not checked.
    pub member_id: i32,
    pub session_date: NaiveDate,
    pub session_time: NaiveTime,
    pub activity: String,
}

impl WorkoutSession {
    pub fn key(&self) -> SessionKey {
        SessionKey {
            session_id: self.session_id,
            member_id: self.member_id,
        }
    }
}

/// The composite key of a workout session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionKey {
    pub session_id: i32,
    pub member_id: i32,
}

impl SessionKey {
    pub fn new(session_id: i32, member_id: i32) -> Self {
        Self {
            session_id,
            member_id,
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.session_id, self.member_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn workout_session_serializes_dates_and_times_in_iso_form() {
        let session = WorkoutSession {
            session_id: 7,
            member_id: 1,
            session_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            session_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            activity: "Spin".to_string(),
        };

        assert_eq!(
            serde_json::to_value(&session).unwrap(),
            json!({
                "session_id": 7,
                "member_id": 1,
                "session_date": "2024-05-01",
                "session_time": "09:30:00",
                "activity": "Spin"
            })
        );
        assert_eq!(session.key(), SessionKey::new(7, 1));
        assert_eq!(session.key().to_string(), "7/1");
    }
}
