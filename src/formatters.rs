//! User-facing text builders for lists, confirmations, and notifications.

use chrono::NaiveDate;

use crate::constants;
use crate::db::models::{Course, Medication, NewCourse, NewMedication};
use crate::utils::format_date;

pub fn format_medications_list(medications: &[Medication]) -> String {
    if medications.is_empty() {
        return constants::EMPTY_CABINET.to_string();
    }
    let lines = medications
        .iter()
        .map(|med| {
            format!(
                "{} - срок годности: {}, количество: {}",
                med.name,
                format_date(med.expiry_date),
                med.quantity
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!("Ваша аптечка:\n{lines}")
}

pub fn format_courses_list(courses: &[Course]) -> String {
    if courses.is_empty() {
        return constants::NO_COURSES.to_string();
    }
    let lines = courses
        .iter()
        .map(|course| {
            format!(
                "{} - дозировка {}, расписание: {}, метод: {}",
                course.medicine_name, course.dosage, course.schedule, course.method
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!("Ваши курсы приема лекарств:\n{lines}")
}

/// One line per medication that still has days left; items expiring today
/// or already expired are left to the reminder engine.
pub fn format_expiry_overview(medications: &[Medication], today: NaiveDate) -> String {
    let expiring = medications
        .iter()
        .filter_map(|med| {
            let days = (med.expiry_date - today).num_days();
            (days > 0).then(|| format!("{} - истекает через {} дней", med.name, days))
        })
        .collect::<Vec<_>>();
    if expiring.is_empty() {
        constants::NO_EXPIRING_MEDICATIONS.to_string()
    } else {
        format!("Сроки годности:\n{}", expiring.join("\n"))
    }
}

pub fn medication_added(medication: &NewMedication) -> String {
    format!(
        "Лекарство '{}' добавлено с сроком годности до {} (количество: {}).",
        medication.name, medication.expiry_date, medication.quantity
    )
}

pub fn course_added(course: &NewCourse) -> String {
    format!(
        "Курс приема для '{}' добавлен: дозировка {}, расписание: {}, метод: {}.",
        course.medicine_name, course.dosage, course.schedule, course.method
    )
}

pub fn expired_removed(name: &str, expiry_date: NaiveDate) -> String {
    format!(
        "⚠️ Внимание! Лекарство {} было автоматически удалено из вашей аптечки, \
         так как его срок годности истёк {}.\n\
         Пожалуйста, утилизируйте это лекарство надлежащим образом.",
        name,
        format_date(expiry_date)
    )
}

pub fn reminder_text(name: &str, days_to_expiry: i64) -> String {
    format!(
        "Напоминание: лекарство {} истекает через {} дней.",
        name, days_to_expiry
    )
}
