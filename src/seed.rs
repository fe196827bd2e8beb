//! Development seed: populates a database with medications spanning the
//! reminder windows for a single user, so sweeps and listings can be
//! exercised by hand. Standalone binary, mirrors the app schema.

use chrono::{Duration, Local, NaiveDate};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;
use std::str::FromStr;

struct SeedMedication {
    name: &'static str,
    days_to_expiry: i64,
    quantity: i64,
}

fn seed_medications() -> Vec<SeedMedication> {
    vec![
        SeedMedication {
            name: "Аспирин",
            days_to_expiry: 120,
            quantity: 10,
        },
        SeedMedication {
            name: "Парацетамол",
            days_to_expiry: 60,
            quantity: 20,
        },
        SeedMedication {
            name: "Ибупрофен",
            days_to_expiry: 46,
            quantity: 12,
        },
        SeedMedication {
            name: "Анальгин",
            days_to_expiry: 4,
            quantity: 5,
        },
        SeedMedication {
            name: "Активированный уголь",
            days_to_expiry: -3,
            quantity: 30,
        },
    ]
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://aptechka.db".to_string());
    let user_id: i64 = std::env::var("SEED_USER_ID")
        .map_err(|_| "SEED_USER_ID must be set to a Telegram user id")?
        .parse()?;

    let options = SqliteConnectOptions::from_str(&database_url)?.create_if_missing(true);
    let pool = SqlitePool::connect_with(options).await?;

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
    .execute(&pool)
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
    .execute(&pool)
    .await?;

    let today: NaiveDate = Local::now().date_naive();
    for med in seed_medications() {
        sqlx::query(
            "INSERT INTO medications (user_id, name, expiry_date, quantity) VALUES ($1, $2, $3, $4)",
        )
        .bind(user_id)
        .bind(med.name)
        .bind(today + Duration::days(med.days_to_expiry))
        .bind(med.quantity)
        .execute(&pool)
        .await?;
    }

    sqlx::query(
        "INSERT INTO courses (user_id, medicine_name, dosage, schedule, method)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(user_id)
    .bind("Ибупрофен")
    .bind("200мг")
    .bind("2 раза в день")
    .bind("после еды")
    .execute(&pool)
    .await?;

    println!("Seeded {} medications for user {}", seed_medications().len(), user_id);
    Ok(())
}
