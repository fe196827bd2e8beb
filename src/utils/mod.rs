use chrono::NaiveDate;

/// Formats a date for user-facing messages.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}
