//! PostgreSQL-backed record store.
//!
//! Uniqueness of `user_id` is the table's primary key, so a duplicate
//! candidate surfaces as an insert conflict (`DuplicateId`) for the
//! allocator's retry loop. The combined update statement sets fields and
//! increments points in one round trip, so deltas never race.

use botgame_engine::{
    store::split_field_updates, Error, InsertAck, RecordStore, UpdateOutcome, UserId, UserRecord,
};
use serde_json::{Map, Value};
use sqlx::{PgPool, Row};

/// A stored user row from the database.
#[derive(Debug)]
pub struct UserRow {
    pub user_id: String,
    pub points: f64,
    pub friend_list: Value,
    pub extra: Value,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for UserRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(UserRow {
            user_id: row.try_get("user_id")?,
            points: row.try_get("points")?,
            friend_list: row.try_get("friend_list")?,
            extra: row.try_get("extra")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl UserRow {
    /// Convert a database row to an engine record.
    fn into_record(self) -> UserRecord {
        UserRecord {
            user_id: self.user_id,
            points: self.points,
            friend_list: serde_json::from_value(self.friend_list).unwrap_or_default(),
            created_at: self.created_at,
            extra: match self.extra {
                Value::Object(map) => map,
                _ => Map::new(),
            },
        }
    }
}

const SELECT_COLUMNS: &str = "user_id, points, friend_list, extra, created_at";

/// [`RecordStore`] over a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl RecordStore for PgStore {
    async fn insert(&self, record: UserRecord) -> Result<InsertAck, Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (user_id, points, friend_list, extra, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&record.user_id)
        .bind(record.points)
        .bind(Value::from(record.friend_list.clone()))
        .bind(Value::Object(record.extra.clone()))
        .bind(record.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(InsertAck {
                acknowledged: true,
                inserted_id: record.user_id,
            }),
            Err(e) if is_unique_violation(&e) => Err(Error::DuplicateId(record.user_id)),
            Err(e) => Err(store_error("insert", e)),
        }
    }

    async fn find(&self, user_id: &str) -> Result<Option<UserRecord>, Error> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_error("find", e))?;

        Ok(row.map(UserRow::into_record))
    }

    async fn find_many(&self, user_ids: &[UserId]) -> Result<Vec<UserRecord>, Error> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM users WHERE user_id = ANY($1)"
        ))
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error("find_many", e))?;

        Ok(rows.into_iter().map(UserRow::into_record).collect())
    }

    async fn apply_update(
        &self,
        user_id: &str,
        delta: f64,
        fields: &Map<String, Value>,
    ) -> Result<UpdateOutcome, Error> {
        let (friend_list, extra) = split_field_updates(fields)?;

        let result = sqlx::query(
            r#"
            UPDATE users
            SET points = points + $2,
                extra = extra || $3,
                friend_list = COALESCE($4, friend_list)
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(delta)
        .bind(Value::Object(extra))
        .bind(friend_list.map(Value::from))
        .execute(&self.pool)
        .await
        .map_err(|e| store_error("apply_update", e))?;

        let affected = result.rows_affected();
        Ok(UpdateOutcome {
            matched_count: affected,
            modified_count: affected,
        })
    }

    async fn top_by_points(&self, limit: i64) -> Result<Vec<UserRecord>, Error> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM users ORDER BY points DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error("top_by_points", e))?;

        Ok(rows.into_iter().map(UserRow::into_record).collect())
    }

    async fn all(&self) -> Result<Vec<UserRecord>, Error> {
        let rows =
            sqlx::query_as::<_, UserRow>(&format!("SELECT {SELECT_COLUMNS} FROM users"))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| store_error("all", e))?;

        Ok(rows.into_iter().map(UserRow::into_record).collect())
    }
}

/// Check if a SQL error is a unique constraint violation.
fn is_unique_violation(e: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = e {
        // PostgreSQL unique violation code is "23505"
        db_err.code().map(|c| c == "23505").unwrap_or(false)
    } else {
        false
    }
}

/// Log the underlying failure and surface an opaque store error.
fn store_error(operation: &str, e: sqlx::Error) -> Error {
    tracing::error!("database error during {}: {:?}", operation, e);
    Error::Unavailable(format!("database error during {operation}"))
}
