use crate::extractors::{MemberId, SessionKeyPath};
use crate::pipeline::with_connection;
use crate::{error::AppError, AppState};
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use core_types::{Entity, Member, WorkoutSession};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

pub const WELCOME: &str = "Welcome to the Fitness Center Management App";
pub const MEMBER_NOT_FOUND: &str = "Member not found";
pub const SESSION_NOT_FOUND: &str = "Workout Session Not Found";

/// Body of every successful write.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: &'static str,
}

type Created = (StatusCode, Json<MessageBody>);
type Payload = Result<Json<Value>, JsonRejection>;

// Create, update and delete all answer 201 on success.
fn created(message: &'static str) -> Created {
    (StatusCode::CREATED, Json(MessageBody { message }))
}

/// # GET /
pub async fn home() -> &'static str {
    WELCOME
}

// ==============================================================================
// Members
// ==============================================================================

/// # POST /members
pub async fn add_member(
    State(state): State<Arc<AppState>>,
    payload: Payload,
) -> Result<Created, AppError> {
    let Json(payload) = payload?;
    let member = Member::from_payload(&payload)?;
    let id = member.id;

    with_connection(&state, "add_member", |conn| {
        Box::pin(async move {
            conn.begin().await?;
            conn.insert_member(&member).await?;
            conn.commit().await?;
            Ok(())
        })
    })
    .await?;

    tracing::info!(member_id = id, "Member added.");
    Ok(created("New member added successfully"))
}

/// # GET /members
pub async fn list_members(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Member>>, AppError> {
    let members = with_connection(&state, "list_members", |conn| {
        Box::pin(async move { Ok(conn.list_members().await?) })
    })
    .await?;
    Ok(Json(members))
}

/// # GET /members/:id
pub async fn get_member(
    State(state): State<Arc<AppState>>,
    MemberId(id): MemberId,
) -> Result<Json<Member>, AppError> {
    let member = with_connection(&state, "get_member", |conn| {
        Box::pin(async move {
            conn.find_member(id)
                .await?
                .ok_or_else(|| AppError::NotFound(MEMBER_NOT_FOUND.to_string()))
        })
    })
    .await?;
    Ok(Json(member))
}

/// # PUT /members/:id
/// Replaces every field, including `id` itself, of the member stored under the path id.
pub async fn update_member(
    State(state): State<Arc<AppState>>,
    MemberId(id): MemberId,
    payload: Payload,
) -> Result<Created, AppError> {
    let Json(payload) = payload?;
    let member = Member::from_payload(&payload)?;

    with_connection(&state, "update_member", |conn| {
        Box::pin(async move {
            conn.begin().await?;
            if conn.find_member(id).await?.is_none() {
                return Err(AppError::NotFound(MEMBER_NOT_FOUND.to_string()));
            }
            conn.update_member(id, &member).await?;
            conn.commit().await?;
            Ok(())
        })
    })
    .await?;

    tracing::info!(member_id = id, "Member updated.");
    Ok(created("Member updated successfully"))
}

/// # DELETE /members/:id
pub async fn remove_member(
    State(state): State<Arc<AppState>>,
    MemberId(id): MemberId,
) -> Result<Created, AppError> {
    with_connection(&state, "remove_member", |conn| {
        Box::pin(async move {
            conn.begin().await?;
            if conn.find_member(id).await?.is_none() {
                return Err(AppError::NotFound(MEMBER_NOT_FOUND.to_string()));
            }
            conn.delete_member(id).await?;
            conn.commit().await?;
            Ok(())
        })
    })
    .await?;

    tracing::info!(member_id = id, "Member removed.");
    Ok(created("Member removed successfully"))
}

// ==============================================================================
// Workout sessions
// ==============================================================================

/// # POST /workoutsessions
/// The referenced member is not required to exist.
pub async fn schedule_workout(
    State(state): State<Arc<AppState>>,
    payload: Payload,
) -> Result<Created, AppError> {
    let Json(payload) = payload?;
    let session = WorkoutSession::from_payload(&payload)?;
    let key = session.key();

    with_connection(&state, "schedule_workout", |conn| {
        Box::pin(async move {
            conn.begin().await?;
            conn.insert_workout_session(&session).await?;
            conn.commit().await?;
            Ok(())
        })
    })
    .await?;

    tracing::info!(session = %key, "Workout session scheduled.");
    Ok(created("New workout session was scheduled successfully"))
}

/// # GET /workoutsessions
pub async fn list_workouts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<WorkoutSession>>, AppError> {
    let sessions = with_connection(&state, "list_workouts", |conn| {
        Box::pin(async move { Ok(conn.list_workout_sessions().await?) })
    })
    .await?;
    Ok(Json(sessions))
}

/// # GET /workoutsessions/:session_id/:member_id
pub async fn get_workout(
    State(state): State<Arc<AppState>>,
    SessionKeyPath(key): SessionKeyPath,
) -> Result<Json<WorkoutSession>, AppError> {
    let session = with_connection(&state, "get_workout", |conn| {
        Box::pin(async move {
            conn.find_workout_session(key)
                .await?
                .ok_or_else(|| AppError::NotFound(SESSION_NOT_FOUND.to_string()))
        })
    })
    .await?;
    Ok(Json(session))
}

/// # PUT /workoutsessions/:session_id/:member_id
pub async fn update_workout(
    State(state): State<Arc<AppState>>,
    SessionKeyPath(key): SessionKeyPath,
    payload: Payload,
) -> Result<Created, AppError> {
    let Json(payload) = payload?;
    let session = WorkoutSession::from_payload(&payload)?;

    with_connection(&state, "update_workout", |conn| {
        Box::pin(async move {
            conn.begin().await?;
            if conn.find_workout_session(key).await?.is_none() {
                return Err(AppError::NotFound(SESSION_NOT_FOUND.to_string()));
            }
            conn.update_workout_session(key, &session).await?;
            conn.commit().await?;
            Ok(())
        })
    })
    .await?;

    tracing::info!(session = %key, "Workout session updated.");
    Ok(created("Workout session updated successfully"))
}

/// # DELETE /workoutsessions/:session_id/:member_id
pub async fn cancel_workout(
    State(state): State<Arc<AppState>>,
    SessionKeyPath(key): SessionKeyPath,
) -> Result<Created, AppError> {
    with_connection(&state, "cancel_workout", |conn| {
        Box::pin(async move {
            conn.begin().await?;
            if conn.find_workout_session(key).await?.is_none() {
                return Err(AppError::NotFound(SESSION_NOT_FOUND.to_string()));
            }
            conn.delete_workout_session(key).await?;
            conn.commit().await?;
            Ok(())
        })
    })
    .await?;

    tracing::info!(session = %key, "Workout session cancelled.");
    Ok(created("Workout session removed successfully"))
}
