use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;

use super::models::{Course, Medication, MedicationSummary, NewCourse, NewMedication};
use super::StorageError;

/// Persistence contract consumed by the executor and the reminder engine.
/// The implementation is the sole mutator of inventory state.
#[async_trait]
pub trait MedicineRepository: Send + Sync {
    async fn add_medication(
        &self,
        user_id: i64,
        medication: &NewMedication,
    ) -> Result<(), StorageError>;

    async fn list_medications(&self, user_id: i64) -> Result<Vec<Medication>, StorageError>;

    async fn delete_medication(&self, id: i64) -> Result<(), StorageError>;

    async fn add_course(&self, user_id: i64, course: &NewCourse) -> Result<(), StorageError>;

    async fn list_courses(&self, user_id: i64) -> Result<Vec<Course>, StorageError>;

    /// Full scan across all users, used by the reminder sweep.
    async fn scan_all_medications(&self) -> Result<Vec<MedicationSummary>, StorageError>;

    /// Records that a reminder for `medication_id` went out on `day`.
    /// Returns false when a reminder was already recorded for that day.
    async fn mark_reminder_sent(
        &self,
        medication_id: i64,
        day: NaiveDate,
    ) -> Result<bool, StorageError>;
}

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MedicineRepository for SqliteRepository {
    async fn add_medication(
        &self,
        user_id: i64,
        medication: &NewMedication,
    ) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO medications (user_id, name, expiry_date, quantity) VALUES ($1, $2, $3, $4)",
        )
        .bind(user_id)
        .bind(&medication.name)
        .bind(medication.expiry_date)
        .bind(medication.quantity)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_medications(&self, user_id: i64) -> Result<Vec<Medication>, StorageError> {
        let medications = sqlx::query_as::<_, Medication>(
            "SELECT id, user_id, name, expiry_date, quantity, added_date
             FROM medications WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(medications)
    }

    async fn delete_medication(&self, id: i64) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM medications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM reminder_log WHERE medication_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn add_course(&self, user_id: i64, course: &NewCourse) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO courses (user_id, medicine_name, dosage, schedule, method)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(user_id)
        .bind(&course.medicine_name)
        .bind(&course.dosage)
        .bind(&course.schedule)
        .bind(&course.method)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_courses(&self, user_id: i64) -> Result<Vec<Course>, StorageError> {
        let courses = sqlx::query_as::<_, Course>(
            "SELECT id, user_id, medicine_name, dosage, schedule, method, added_date
             FROM courses WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(courses)
    }

    async fn scan_all_medications(&self) -> Result<Vec<MedicationSummary>, StorageError> {
        let medications = sqlx::query_as::<_, MedicationSummary>(
            "SELECT id, user_id, name, expiry_date FROM medications ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(medications)
    }

    async fn mark_reminder_sent(
        &self,
        medication_id: i64,
        day: NaiveDate,
    ) -> Result<bool, StorageError> {
        let result =
            sqlx::query("INSERT OR IGNORE INTO reminder_log (medication_id, sent_on) VALUES ($1, $2)")
                .bind(medication_id)
                .bind(day)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::create_tables;

    pub(crate) async fn memory_repository() -> SqliteRepository {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("in-memory database");
        create_tables(&pool).await.expect("schema");
        SqliteRepository::new(pool)
    }

    fn sample_medication(days_out: i64) -> NewMedication {
        NewMedication {
            name: "Аспирин".to_string(),
            expiry_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
                + chrono::Duration::days(days_out),
            quantity: 3,
        }
    }

    #[tokio::test]
    async fn adds_and_lists_medications_per_user() {
        let repo = memory_repository().await;
        repo.add_medication(1, &sample_medication(30)).await.unwrap();
        repo.add_medication(2, &sample_medication(10)).await.unwrap();

        let meds = repo.list_medications(1).await.unwrap();
        assert_eq!(meds.len(), 1);
        assert_eq!(meds[0].name, "Аспирин");
        assert_eq!(meds[0].quantity, 3);
        assert!(repo.list_medications(3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deletes_medication_by_id() {
        let repo = memory_repository().await;
        repo.add_medication(1, &sample_medication(5)).await.unwrap();
        let id = repo.list_medications(1).await.unwrap()[0].id;

        repo.delete_medication(id).await.unwrap();
        assert!(repo.list_medications(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn adds_and_lists_courses() {
        let repo = memory_repository().await;
        let course = NewCourse {
            medicine_name: "Ибупрофен".to_string(),
            dosage: "200мг".to_string(),
            schedule: "2 раза в день".to_string(),
            method: "Не указан".to_string(),
        };
        repo.add_course(7, &course).await.unwrap();

        let courses = repo.list_courses(7).await.unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].medicine_name, "Ибупрофен");
        assert_eq!(courses[0].method, "Не указан");
    }

    #[tokio::test]
    async fn scan_covers_all_users() {
        let repo = memory_repository().await;
        repo.add_medication(1, &sample_medication(30)).await.unwrap();
        repo.add_medication(2, &sample_medication(40)).await.unwrap();

        let all = repo.scan_all_medications().await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn reminder_marker_is_recorded_once_per_day() {
        let repo = memory_repository().await;
        let day = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();

        assert!(repo.mark_reminder_sent(1, day).await.unwrap());
        assert!(!repo.mark_reminder_sent(1, day).await.unwrap());
        // A different day is a fresh marker.
        let next = day + chrono::Duration::days(1);
        assert!(repo.mark_reminder_sent(1, next).await.unwrap());
    }
}
