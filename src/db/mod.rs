use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use std::str::FromStr;
use thiserror::Error;

pub mod models;
pub mod repository;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Opens the SQLite database, creating the file and the schema when missing.
pub async fn init_db(database_url: &str) -> Result<SqlitePool, StorageError> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePool::connect_with(options).await?;
    create_tables(&pool).await?;
    Ok(pool)
}

pub async fn create_tables(pool: &SqlitePool) -> Result<(), StorageError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS medications (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            expiry_date DATE NOT NULL,
            quantity INTEGER NOT NULL CHECK (quantity >= 0),
            added_date TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS courses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            medicine_name TEXT NOT NULL,
            dosage TEXT NOT NULL,
            schedule TEXT NOT NULL,
            method TEXT NOT NULL,
            added_date TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .execute(pool)
    .await?;

    // One row per (medication, day) on which a reminder went out.
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS reminder_log (
            medication_id INTEGER NOT NULL,
            sent_on DATE NOT NULL,
            PRIMARY KEY (medication_id, sent_on)
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}
