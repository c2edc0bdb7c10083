pub mod enums;
pub mod error;
pub mod schema;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::FieldType;
pub use error::ValidationErrors;
pub use schema::{Entity, FieldSpec, Schema, MEMBER_SCHEMA, WORKOUT_SESSION_SCHEMA};
pub use structs::{Member, SessionKey, WorkoutSession};
