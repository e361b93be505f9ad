use chrono::{DateTime, Utc};
use log::info;
use sqlx::{
    Row, Sqlite,
    migrate::MigrateDatabase,
    sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow},
};
use thiserror::Error;

use crate::models::{NewVote, Selections, VoteRecord};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("contact number already recorded")]
    DuplicateContact,

    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Failed to encode or decode stored selections: {0}")]
    Selections(#[from] serde_json::Error),

    #[error("Failed to parse stored timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),
}

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(db_url: &str, max_connections: u32) -> Result<Self, DbError> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
            info!("Creating database at {}", db_url);
            Sqlite::create_database(db_url).await?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(db_url)
            .await?;

        Self::init_schema(&pool).await?;

        Ok(Self { pool })
    }

    async fn init_schema(pool: &SqlitePool) -> Result<(), DbError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS votes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                voter_name TEXT NOT NULL,
                contact_number TEXT UNIQUE,
                barangay TEXT,
                votes TEXT NOT NULL,
                timestamp TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_votes_barangay ON votes (barangay);")
            .execute(pool)
            .await?;

        Ok(())
    }

    pub async fn contact_exists(&self, contact_number: &str) -> Result<bool, DbError> {
        let mut conn = self.pool.acquire().await?;

        let found = sqlx::query("SELECT 1 FROM votes WHERE contact_number = ? LIMIT 1")
            .bind(contact_number)
            .fetch_optional(&mut *conn)
            .await?
            .is_some();

        Ok(found)
    }

    /// Appends a vote. A second record with the same contact number is rejected by the
    /// column constraint, even if it slipped past [`Database::contact_exists`].
    pub async fn insert_vote(&self, vote: NewVote) -> Result<VoteRecord, DbError> {
        let timestamp = Utc::now();
        let selections = serde_json::to_string(&vote.votes)?;
        let mut conn = self.pool.acquire().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO votes (voter_name, contact_number, barangay, votes, timestamp)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&vote.voter_name)
        .bind(&vote.contact_number)
        .bind(&vote.barangay)
        .bind(&selections)
        .bind(timestamp.to_rfc3339())
        .execute(&mut *conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => DbError::DuplicateContact,
            other => DbError::Sqlx(other),
        })?;

        Ok(vote.into_record(result.last_insert_rowid(), timestamp))
    }

    pub async fn all_votes(&self) -> Result<Vec<VoteRecord>, DbError> {
        let mut conn = self.pool.acquire().await?;

        let rows = sqlx::query(
            r#"
            SELECT id, voter_name, contact_number, barangay, votes, timestamp
            FROM votes
            ORDER BY id
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        rows.iter().map(vote_from_row).collect()
    }

    pub async fn votes_in_barangay(&self, barangay: &str) -> Result<Vec<VoteRecord>, DbError> {
        let mut conn = self.pool.acquire().await?;

        let rows = sqlx::query(
            r#"
            SELECT id, voter_name, contact_number, barangay, votes, timestamp
            FROM votes
            WHERE barangay = ?
            ORDER BY id
            "#,
        )
        .bind(barangay)
        .fetch_all(&mut *conn)
        .await?;

        rows.iter().map(vote_from_row).collect()
    }
}

fn vote_from_row(row: &SqliteRow) -> Result<VoteRecord, DbError> {
    let votes: Selections = serde_json::from_str(&row.try_get::<String, _>("votes")?)?;
    let timestamp = DateTime::parse_from_rfc3339(&row.try_get::<String, _>("timestamp")?)?
        .with_timezone(&Utc);

    Ok(VoteRecord {
        id: row.try_get("id")?,
        voter_name: row.try_get("voter_name")?,
        contact_number: row.try_get("contact_number")?,
        barangay: row.try_get("barangay")?,
        votes,
        timestamp,
    })
}
