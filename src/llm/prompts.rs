//! Prompt builders for the two completion calls the bot makes.

use crate::db::models::Medication;

/// Classification prompt: the model must answer with one of the four
/// action words.
pub fn intent_prompt(text: &str) -> String {
    format!(
        "Проанализируй сообщение и определи намерение: '{text}'\n\
         Ответь одним словом: добавить/рекомендация/аптечка/курс"
    )
}

/// Recommendation prompt embedding the user's symptoms and the names of the
/// medications currently in their cabinet.
pub fn recommendation_prompt(symptoms: &str, medications: &[Medication]) -> String {
    let names = medications
        .iter()
        .map(|med| med.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Пользователь описывает следующие симптомы: '{symptoms}'\n\
         Доступные лекарства:\n{names}\n\n\
         Дай рекомендацию по приему лекарств из списка. Учитывай:\n\
         1. Основные показания к применению\n\
         2. Возможные противопоказания\n\
         3. Дозировку\n\
         4. Меры предосторожности\n\
         Если нет подходящих лекарств, укажи это."
    )
}
