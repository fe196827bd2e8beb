use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Medication {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub expiry_date: NaiveDate,
    pub quantity: i64,
    pub added_date: NaiveDateTime,
}

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Course {
    pub id: i64,
    pub user_id: i64,
    pub medicine_name: String,
    pub dosage: String,
    pub schedule: String,
    pub method: String,
    pub added_date: NaiveDateTime,
}

/// Projection used by the reminder sweep's full scan.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct MedicationSummary {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub expiry_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMedication {
    pub name: String,
    pub expiry_date: NaiveDate,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCourse {
    pub medicine_name: String,
    pub dosage: String,
    pub schedule: String,
    pub method: String,
}
