//! An in-memory stand-in for the relational store.
//!
//! Behaves like the PostgreSQL implementation where the handlers can tell the
//! difference: writes inside `begin`/`commit` are staged and discarded on
//! release, duplicate keys are rejected, and every connection is counted so
//! tests can check that none is left open.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use core_types::{Member, SessionKey, WorkoutSession};
use database::{ConnectionManager, DbError, StoreConnection};
use http_body_util::BodyExt;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use web_server::{build_router, AppState};

#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub members: BTreeMap<i32, Member>,
    pub sessions: BTreeMap<SessionKey, WorkoutSession>,
}

#[derive(Default)]
struct Shared {
    tables: Mutex<Tables>,
    open: AtomicUsize,
    acquired: AtomicUsize,
    fail_acquire: AtomicBool,
    fail_statements: AtomicBool,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Shared>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn router(&self) -> Router {
        build_router(AppState::new(Arc::new(self.clone())))
    }

    /// Committed state.
    pub fn snapshot(&self) -> Tables {
        self.shared.tables.lock().unwrap().clone()
    }

    pub fn seed_member(&self, id: i32, name: &str, age: i32) {
        let member = Member {
            id,
            name: name.to_string(),
            age,
        };
        self.shared.tables.lock().unwrap().members.insert(id, member);
    }

    /// Connections acquired and not yet released.
    pub fn open_connections(&self) -> usize {
        self.shared.open.load(Ordering::SeqCst)
    }

    /// Connections ever acquired.
    pub fn acquisitions(&self) -> usize {
        self.shared.acquired.load(Ordering::SeqCst)
    }

    pub fn fail_acquire(&self, fail: bool) {
        self.shared.fail_acquire.store(fail, Ordering::SeqCst);
    }

    pub fn fail_statements(&self, fail: bool) {
        self.shared.fail_statements.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ConnectionManager for MemoryStore {
    async fn acquire(&self) -> Result<Box<dyn StoreConnection>, DbError> {
        if self.shared.fail_acquire.load(Ordering::SeqCst) {
            return Err(DbError::ConnectionError(sqlx::Error::Io(
                std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused"),
            )));
        }
        self.shared.acquired.fetch_add(1, Ordering::SeqCst);
        self.shared.open.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryConnection {
            shared: self.shared.clone(),
            staged: None,
        }))
    }
}

struct MemoryConnection {
    shared: Arc<Shared>,
    staged: Option<Tables>,
}

fn store_error(message: &str) -> DbError {
    DbError::QueryError(sqlx::Error::Protocol(message.to_string()))
}

impl MemoryConnection {
    /// Runs `f` against the open transaction, or directly against committed
    /// state when none is open.
    fn with_tables<R>(&mut self, f: impl FnOnce(&mut Tables) -> Result<R, DbError>) -> Result<R, DbError> {
        if self.shared.fail_statements.load(Ordering::SeqCst) {
            return Err(store_error("injected statement failure"));
        }
        match self.staged.as_mut() {
            Some(tables) => f(tables),
            None => {
                let mut committed = self.shared.tables.lock().unwrap();
                f(&mut *committed)
            }
        }
    }
}

#[async_trait]
impl StoreConnection for MemoryConnection {
    async fn begin(&mut self) -> Result<(), DbError> {
        let committed = self.shared.tables.lock().unwrap().clone();
        self.staged = Some(committed);
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), DbError> {
        if let Some(staged) = self.staged.take() {
            *self.shared.tables.lock().unwrap() = staged;
        }
        Ok(())
    }

    async fn list_members(&mut self) -> Result<Vec<Member>, DbError> {
        self.with_tables(|t| Ok(t.members.values().cloned().collect()))
    }

    async fn find_member(&mut self, id: i32) -> Result<Option<Member>, DbError> {
        self.with_tables(|t| Ok(t.members.get(&id).cloned()))
    }

    async fn insert_member(&mut self, member: &Member) -> Result<u64, DbError> {
        self.with_tables(|t| {
            if t.members.contains_key(&member.id) {
                return Err(store_error("duplicate key value violates unique constraint"));
            }
            t.members.insert(member.id, member.clone());
            Ok(1)
        })
    }

    async fn update_member(&mut self, id: i32, member: &Member) -> Result<u64, DbError> {
        self.with_tables(|t| {
            if !t.members.contains_key(&id) {
                return Ok(0);
            }
            if member.id != id && t.members.contains_key(&member.id) {
                return Err(store_error("duplicate key value violates unique constraint"));
            }
            t.members.remove(&id);
            t.members.insert(member.id, member.clone());
            Ok(1)
        })
    }

    async fn delete_member(&mut self, id: i32) -> Result<u64, DbError> {
        self.with_tables(|t| Ok(t.members.remove(&id).map_or(0, |_| 1)))
    }

    async fn list_workout_sessions(&mut self) -> Result<Vec<WorkoutSession>, DbError> {
        self.with_tables(|t| Ok(t.sessions.values().cloned().collect()))
    }

    async fn find_workout_session(
        &mut self,
        key: SessionKey,
    ) -> Result<Option<WorkoutSession>, DbError> {
        self.with_tables(|t| Ok(t.sessions.get(&key).cloned()))
    }

    async fn insert_workout_session(&mut self, session: &WorkoutSession) -> Result<u64, DbError> {
        self.with_tables(|t| {
            if t.sessions.contains_key(&session.key()) {
                return Err(store_error("duplicate key value violates unique constraint"));
            }
            t.sessions.insert(session.key(), session.clone());
            Ok(1)
        })
    }

    async fn update_workout_session(
        &mut self,
        key: SessionKey,
        session: &WorkoutSession,
    ) -> Result<u64, DbError> {
        self.with_tables(|t| {
            if !t.sessions.contains_key(&key) {
                return Ok(0);
            }
            if session.key() != key && t.sessions.contains_key(&session.key()) {
                return Err(store_error("duplicate key value violates unique constraint"));
            }
            t.sessions.remove(&key);
            t.sessions.insert(session.key(), session.clone());
            Ok(1)
        })
    }

    async fn delete_workout_session(&mut self, key: SessionKey) -> Result<u64, DbError> {
        self.with_tables(|t| Ok(t.sessions.remove(&key).map_or(0, |_| 1)))
    }

    async fn release(self: Box<Self>) -> Result<(), DbError> {
        self.shared.open.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Sends one request through a fresh router and returns status and parsed body.
///
/// Bodies that are not JSON come back as a JSON string.
pub async fn send(store: &MemoryStore, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = store
        .router()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}

pub async fn get(store: &MemoryStore, uri: &str) -> (StatusCode, Value) {
    send(store, Method::GET, uri, None).await
}

pub async fn post(store: &MemoryStore, uri: &str, body: Value) -> (StatusCode, Value) {
    send(store, Method::POST, uri, Some(body)).await
}

pub async fn put(store: &MemoryStore, uri: &str, body: Value) -> (StatusCode, Value) {
    send(store, Method::PUT, uri, Some(body)).await
}

pub async fn delete(store: &MemoryStore, uri: &str) -> (StatusCode, Value) {
    send(store, Method::DELETE, uri, None).await
}
