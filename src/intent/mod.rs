//! Message-intent resolution: deterministic fast paths first, the
//! completion service only for genuinely ambiguous free text.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::MEDICATION_NAME_MAX_LENGTH;
use crate::db::models::{NewCourse, NewMedication};
use crate::llm::{prompts, CompletionService};

#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    ListMedications,
    ListCourses,
    ExpiryOverview,
    AddMedication(NewMedication),
    AddCourse(NewCourse),
    InvalidCourse,
    Recommend { symptoms: String },
    AddHint,
    Unknown,
    ServiceUnavailable,
}

// Listing triggers, scanned in order against the lower-cased text. The
// course-listing triggers are the keyboard phrases rather than the bare
// word so structured "курс ..." commands are not shadowed.
const FAST_TRIGGERS: &[(&str, Intent)] = &[
    ("аптечка", Intent::ListMedications),
    ("мой курс", Intent::ListCourses),
    ("курс лекарств", Intent::ListCourses),
    ("срок", Intent::ExpiryOverview),
];

static MEDICATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)лекарство\s+([\w\s\-]+?)\s+(\d{2})\.(\d{2})\s*x(\d+)").expect("valid pattern")
});

static COURSE_WITH_METHOD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)курс\s+([\w\s\-]+?)\s+(\w+)\s+([\w\s\-:]+?)\s+метод\s+([\w\s\-]+)")
        .expect("valid pattern")
});

static COURSE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)курс\s+([\w\s\-]+?)\s+(\w+)\s+([\w\s\-:]+)").expect("valid pattern")
});

/// Resolves one raw message into an actionable intent. First match wins:
/// listing triggers, then the structured commands, then the classifier.
pub async fn resolve(text: &str, llm: &dyn CompletionService) -> Intent {
    let lowered = text.to_lowercase();

    for (trigger, intent) in FAST_TRIGGERS {
        if lowered.contains(trigger) {
            return intent.clone();
        }
    }

    if let Some(medication) = parse_medication(text) {
        return Intent::AddMedication(medication);
    }

    if lowered.trim_start().starts_with("курс") {
        return match parse_course(text) {
            Some(course) => Intent::AddCourse(course),
            None => Intent::InvalidCourse,
        };
    }

    classify_free_text(text, llm).await
}

/// Parses "лекарство <название> <ММ.ГГ> x<количество>". The two-digit year
/// always expands into the 2000s; expiry is the last day of the month.
/// Any rejection returns None so resolution can fall through.
pub(crate) fn parse_medication(text: &str) -> Option<NewMedication> {
    let caps = MEDICATION_RE.captures(text)?;
    let name = caps[1].trim().to_string();
    if name.is_empty() || name.chars().count() > MEDICATION_NAME_MAX_LENGTH {
        return None;
    }
    let month: u32 = caps[2].parse().ok()?;
    let year_suffix: i32 = caps[3].parse().ok()?;
    let quantity: i64 = caps[4].parse().ok()?;
    let expiry_date = last_day_of_month(2000 + year_suffix, month)?;
    Some(NewMedication {
        name,
        expiry_date,
        quantity,
    })
}

/// Parses "курс <название> <дозировка> <расписание> [метод <метод>]".
pub(crate) fn parse_course(text: &str) -> Option<NewCourse> {
    if let Some(caps) = COURSE_WITH_METHOD_RE.captures(text) {
        return build_course(&caps[1], &caps[2], &caps[3], Some(&caps[4]));
    }
    let caps = COURSE_RE.captures(text)?;
    build_course(&caps[1], &caps[2], &caps[3], None)
}

fn build_course(
    medicine_name: &str,
    dosage: &str,
    schedule: &str,
    method: Option<&str>,
) -> Option<NewCourse> {
    let medicine_name = medicine_name.trim();
    let dosage = dosage.trim();
    if medicine_name.is_empty() || dosage.is_empty() {
        return None;
    }
    Some(NewCourse {
        medicine_name: medicine_name.to_string(),
        dosage: dosage.to_string(),
        schedule: schedule.trim().to_string(),
        method: method
            .map(|m| m.trim().to_string())
            .unwrap_or_else(|| crate::constants::UNSPECIFIED_METHOD.to_string()),
    })
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1).and_then(|d| d.pred_opt())
}

async fn classify_free_text(text: &str, llm: &dyn CompletionService) -> Intent {
    let label = match llm.complete(&prompts::intent_prompt(text)).await {
        Ok(label) => label,
        Err(err) => {
            log::error!("Intent classification failed: {err}");
            return Intent::ServiceUnavailable;
        }
    };

    let label = label.to_lowercase();
    if label.trim().is_empty() {
        return Intent::ServiceUnavailable;
    }
    if label.contains("рекомендация") {
        Intent::Recommend {
            symptoms: text.to_string(),
        }
    } else if label.contains("аптечка") {
        Intent::ListMedications
    } else if label.contains("курс") {
        Intent::ListCourses
    } else if label.contains("добавить") {
        Intent::AddHint
    } else {
        Intent::Unknown
    }
}
