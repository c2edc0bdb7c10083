use crate::DbError;
use async_trait::async_trait;
use core_types::{Member, SessionKey, WorkoutSession};
use sqlx::postgres::PgConnection;
use sqlx::Connection;

/// The statements one request may run on its connection.
///
/// Writes are grouped with [`begin`](StoreConnection::begin) and
/// [`commit`](StoreConnection::commit). A transaction still open when the
/// connection is released is rolled back. Mutating statements return the
/// number of rows they touched.
#[async_trait]
pub trait StoreConnection: Send {
    async fn begin(&mut self) -> Result<(), DbError>;
    async fn commit(&mut self) -> Result<(), DbError>;

    async fn list_members(&mut self) -> Result<Vec<Member>, DbError>;
    async fn find_member(&mut self, id: i32) -> Result<Option<Member>, DbError>;
    async fn insert_member(&mut self, member: &Member) -> Result<u64, DbError>;
    /// Overwrites every column of the member currently stored under `id`.
    async fn update_member(&mut self, id: i32, member: &Member) -> Result<u64, DbError>;
    async fn delete_member(&mut self, id: i32) -> Result<u64, DbError>;

    async fn list_workout_sessions(&mut self) -> Result<Vec<WorkoutSession>, DbError>;
    async fn find_workout_session(
        &mut self,
        key: SessionKey,
    ) -> Result<Option<WorkoutSession>, DbError>;
    async fn insert_workout_session(&mut self, session: &WorkoutSession) -> Result<u64, DbError>;
    /// Overwrites every column of the session currently stored under `key`.
    async fn update_workout_session(
        &mut self,
        key: SessionKey,
        session: &WorkoutSession,
    ) -> Result<u64, DbError>;
    async fn delete_workout_session(&mut self, key: SessionKey) -> Result<u64, DbError>;

    /// Rolls back any open transaction and closes the connection.
    async fn release(self: Box<Self>) -> Result<(), DbError>;
}

const SELECT_MEMBERS: &str = "SELECT id, name, age FROM Members ORDER BY id";
const SELECT_MEMBER: &str = "SELECT id, name, age FROM Members WHERE id = $1";
const INSERT_MEMBER: &str = "INSERT INTO Members (id, name, age) VALUES ($1, $2, $3)";
const UPDATE_MEMBER: &str = "UPDATE Members SET id = $1, name = $2, age = $3 WHERE id = $4";
const DELETE_MEMBER: &str = "DELETE FROM Members WHERE id = $1";

const SELECT_SESSIONS: &str = r#"
    SELECT session_id, member_id, session_date, session_time, activity
    FROM WorkoutSessions
    ORDER BY session_id, member_id
"#;
const SELECT_SESSION: &str = r#"
    SELECT session_id, member_id, session_date, session_time, activity
    FROM WorkoutSessions
    WHERE session_id = $1 AND member_id = $2
"#;
const INSERT_SESSION: &str = r#"
    INSERT INTO WorkoutSessions (session_id, member_id, session_date, session_time, activity)
    VALUES ($1, $2, $3, $4, $5)
"#;
const UPDATE_SESSION: &str = r#"
    UPDATE WorkoutSessions
    SET session_id = $1, member_id = $2, session_date = $3, session_time = $4, activity = $5
    WHERE session_id = $6 AND member_id = $7
"#;
const DELETE_SESSION: &str = "DELETE FROM WorkoutSessions WHERE session_id = $1 AND member_id = $2";

/// A single PostgreSQL connection owned by one request.
///
/// A transaction spans several trait calls (`begin`, the statements, `commit`),
/// so it cannot be held as a `sqlx::Transaction`, which borrows the connection
/// for its own lifetime. `BEGIN`/`COMMIT` are issued directly instead and
/// `in_transaction` records whether `release` still owes a `ROLLBACK`.
pub struct PgStoreConnection {
    conn: PgConnection,
    in_transaction: bool,
}

impl PgStoreConnection {
    pub fn new(conn: PgConnection) -> Self {
        Self {
            conn,
            in_transaction: false,
        }
    }
}

#[async_trait]
impl StoreConnection for PgStoreConnection {
    async fn begin(&mut self) -> Result<(), DbError> {
        sqlx::query("BEGIN").execute(&mut self.conn).await?;
        self.in_transaction = true;
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), DbError> {
        sqlx::query("COMMIT").execute(&mut self.conn).await?;
        self.in_transaction = false;
        Ok(())
    }

    async fn list_members(&mut self) -> Result<Vec<Member>, DbError> {
        let members = sqlx::query_as::<_, Member>(SELECT_MEMBERS)
            .fetch_all(&mut self.conn)
            .await?;
        Ok(members)
    }

    async fn find_member(&mut self, id: i32) -> Result<Option<Member>, DbError> {
        let member = sqlx::query_as::<_, Member>(SELECT_MEMBER)
            .bind(id)
            .fetch_optional(&mut self.conn)
            .await?;
        Ok(member)
    }

    async fn insert_member(&mut self, member: &Member) -> Result<u64, DbError> {
        let result = sqlx::query(INSERT_MEMBER)
            .bind(member.id)
            .bind(&member.name)
            .bind(member.age)
            .execute(&mut self.conn)
            .await?;
        Ok(result.rows_affected())
    }

    async fn update_member(&mut self, id: i32, member: &Member) -> Result<u64, DbError> {
        let result = sqlx::query(UPDATE_MEMBER)
            .bind(member.id)
            .bind(&member.name)
            .bind(member.age)
            .bind(id)
            .execute(&mut self.conn)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_member(&mut self, id: i32) -> Result<u64, DbError> {
        let result = sqlx::query(DELETE_MEMBER)
            .bind(id)
            .execute(&mut self.conn)
            .await?;
        Ok(result.rows_affected())
    }

    async fn list_workout_sessions(&mut self) -> Result<Vec<WorkoutSession>, DbError> {
        let sessions = sqlx::query_as::<_, WorkoutSession>(SELECT_SESSIONS)
            .fetch_all(&mut self.conn)
            .await?;
        Ok(sessions)
    }

    async fn find_workout_session(
        &mut self,
        key: SessionKey,
    ) -> Result<Option<WorkoutSession>, DbError> {
        let session = sqlx::query_as::<_, WorkoutSession>(SELECT_SESSION)
            .bind(key.session_id)
            .bind(key.member_id)
            .fetch_optional(&mut self.conn)
            .await?;
        Ok(session)
    }

    async fn insert_workout_session(&mut self, session: &WorkoutSession) -> Result<u64, DbError> {
        let result = sqlx::query(INSERT_SESSION)
            .bind(session.session_id)
            .bind(session.member_id)
            .bind(session.session_date)
            .bind(session.session_time)
            .bind(&session.activity)
            .execute(&mut self.conn)
            .await?;
        Ok(result.rows_affected())
    }

    async fn update_workout_session(
        &mut self,
        key: SessionKey,
        session: &WorkoutSession,
    ) -> Result<u64, DbError> {
        let result = sqlx::query(UPDATE_SESSION)
            .bind(session.session_id)
            .bind(session.member_id)
            .bind(session.session_date)
            .bind(session.session_time)
            .bind(&session.activity)
            .bind(key.session_id)
            .bind(key.member_id)
            .execute(&mut self.conn)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_workout_session(&mut self, key: SessionKey) -> Result<u64, DbError> {
        let result = sqlx::query(DELETE_SESSION)
            .bind(key.session_id)
            .bind(key.member_id)
            .execute(&mut self.conn)
            .await?;
        Ok(result.rows_affected())
    }

    async fn release(self: Box<Self>) -> Result<(), DbError> {
        let mut this = *self;
        let rollback = if this.in_transaction {
            sqlx::query("ROLLBACK")
                .execute(&mut this.conn)
                .await
                .map(|_| ())
        } else {
            Ok(())
        };
        let close = this.conn.close().await;

        rollback.map_err(DbError::ReleaseError)?;
        close.map_err(DbError::ReleaseError)
    }
}
