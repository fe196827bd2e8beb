//! Maps a resolved intent to repository calls and a response string.

use chrono::Local;

use crate::constants;
use crate::db::repository::MedicineRepository;
use crate::db::StorageError;
use crate::formatters;
use crate::intent::Intent;
use crate::llm::{prompts, CompletionService};

/// Stateless dispatch: at most one repository interaction per intent, and
/// always a non-empty response, even on internal failure.
pub async fn execute(
    intent: Intent,
    user_id: i64,
    repo: &dyn MedicineRepository,
    llm: &dyn CompletionService,
) -> String {
    match try_execute(intent, user_id, repo, llm).await {
        Ok(response) => response,
        Err(e) => {
            log::error!("Failed to execute command for user {}: {}", user_id, e);
            constants::ERROR_PROCESSING.to_string()
        }
    }
}

async fn try_execute(
    intent: Intent,
    user_id: i64,
    repo: &dyn MedicineRepository,
    llm: &dyn CompletionService,
) -> Result<String, StorageError> {
    match intent {
        Intent::ListMedications => {
            let medications = repo.list_medications(user_id).await?;
            Ok(formatters::format_medications_list(&medications))
        }
        Intent::ListCourses => {
            let courses = repo.list_courses(user_id).await?;
            Ok(formatters::format_courses_list(&courses))
        }
        Intent::ExpiryOverview => {
            let medications = repo.list_medications(user_id).await?;
            if medications.is_empty() {
                return Ok(constants::EMPTY_CABINET.to_string());
            }
            Ok(formatters::format_expiry_overview(
                &medications,
                Local::now().date_naive(),
            ))
        }
        Intent::AddMedication(medication) => {
            repo.add_medication(user_id, &medication).await?;
            Ok(formatters::medication_added(&medication))
        }
        Intent::AddCourse(course) => {
            repo.add_course(user_id, &course).await?;
            Ok(formatters::course_added(&course))
        }
        Intent::Recommend { symptoms } => {
            let medications = repo.list_medications(user_id).await?;
            if medications.is_empty() {
                return Ok(constants::CANNOT_RECOMMEND_EMPTY.to_string());
            }
            let prompt = prompts::recommendation_prompt(&symptoms, &medications);
            match llm.complete(&prompt).await {
                Ok(recommendation) if !recommendation.trim().is_empty() => Ok(recommendation),
                Ok(_) => Ok(constants::RECOMMENDATION_FAILED.to_string()),
                Err(e) => {
                    log::error!("Recommendation failed for user {}: {}", user_id, e);
                    Ok(constants::RECOMMENDATION_FAILED.to_string())
                }
            }
        }
        Intent::InvalidCourse => Ok(constants::INVALID_COURSE_FORMAT.to_string()),
        Intent::AddHint => Ok(constants::ADD_FORMAT_HINT.to_string()),
        Intent::Unknown => Ok(constants::UNKNOWN_INTENT.to_string()),
        Intent::ServiceUnavailable => Ok(constants::UPSTREAM_UNAVAILABLE.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{NewCourse, NewMedication};
    use crate::db::repository::tests::memory_repository;
    use crate::llm::testing::StubCompletion;
    use chrono::NaiveDate;

    fn aspirin() -> NewMedication {
        NewMedication {
            name: "Аспирин".to_string(),
            expiry_date: NaiveDate::from_ymd_opt(2030, 5, 31).unwrap(),
            quantity: 3,
        }
    }

    #[tokio::test]
    async fn listing_an_empty_cabinet_returns_the_fixed_text() {
        let repo = memory_repository().await;
        let llm = StubCompletion::replying("нет");

        let response = execute(Intent::ListMedications, 1, &repo, &llm).await;
        assert_eq!(response, constants::EMPTY_CABINET);
    }

    #[tokio::test]
    async fn add_medication_persists_and_confirms() {
        let repo = memory_repository().await;
        let llm = StubCompletion::replying("нет");

        let response = execute(Intent::AddMedication(aspirin()), 1, &repo, &llm).await;
        assert!(response.contains("Аспирин"));
        assert!(response.contains("2030-05-31"));
        assert_eq!(repo.list_medications(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn add_course_persists_and_confirms() {
        let repo = memory_repository().await;
        let llm = StubCompletion::replying("нет");
        let course = NewCourse {
            medicine_name: "Ибупрофен".to_string(),
            dosage: "200мг".to_string(),
            schedule: "2 раза в день".to_string(),
            method: "Не указан".to_string(),
        };

        let response = execute(Intent::AddCourse(course), 1, &repo, &llm).await;
        assert!(response.contains("Ибупрофен"));
        assert!(response.contains("метод: Не указан"));
        assert_eq!(repo.list_courses(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn recommendation_with_empty_cabinet_skips_the_completion_call() {
        let repo = memory_repository().await;
        let llm = StubCompletion::replying("Примите Аспирин");

        let response = execute(
            Intent::Recommend {
                symptoms: "болит голова".to_string(),
            },
            1,
            &repo,
            &llm,
        )
        .await;

        assert_eq!(response, constants::CANNOT_RECOMMEND_EMPTY);
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn recommendation_returns_the_completion_text() {
        let repo = memory_repository().await;
        repo.add_medication(1, &aspirin()).await.unwrap();
        let llm = StubCompletion::replying("Примите Аспирин после еды.");

        let response = execute(
            Intent::Recommend {
                symptoms: "болит голова".to_string(),
            },
            1,
            &repo,
            &llm,
        )
        .await;

        assert_eq!(response, "Примите Аспирин после еды.");
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn failed_recommendation_falls_back_to_the_fixed_text() {
        let repo = memory_repository().await;
        repo.add_medication(1, &aspirin()).await.unwrap();
        let llm = StubCompletion::unavailable();

        let response = execute(
            Intent::Recommend {
                symptoms: "болит голова".to_string(),
            },
            1,
            &repo,
            &llm,
        )
        .await;

        assert_eq!(response, constants::RECOMMENDATION_FAILED);
    }

    #[tokio::test]
    async fn terminal_intents_map_to_their_fixed_texts() {
        let repo = memory_repository().await;
        let llm = StubCompletion::replying("нет");

        assert_eq!(
            execute(Intent::InvalidCourse, 1, &repo, &llm).await,
            constants::INVALID_COURSE_FORMAT
        );
        assert_eq!(
            execute(Intent::Unknown, 1, &repo, &llm).await,
            constants::UNKNOWN_INTENT
        );
        assert_eq!(
            execute(Intent::ServiceUnavailable, 1, &repo, &llm).await,
            constants::UPSTREAM_UNAVAILABLE
        );
    }
}
