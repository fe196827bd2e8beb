//! Policy constants and fixed user-facing texts.

/// Days before expiry at which the first reminder is due.
pub const EXPIRY_WARNING_DAYS: i64 = 60;
/// Cadence of follow-up reminders inside the warning window.
pub const REMINDER_INTERVAL_DAYS: i64 = 14;

pub const MAX_CACHE_SIZE: usize = 100;
pub const DEFAULT_MAX_TOKENS: u32 = 150;
pub const MEDICATION_NAME_MAX_LENGTH: usize = 100;
pub const LLM_CONCURRENCY_LIMIT: usize = 5;
pub const LLM_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Hourly poll; the reminder_log day guard keeps the policy day-granular.
pub const REMINDER_SWEEP_CRON: &str = "0 0 * * * *";

pub const WELCOME: &str = "Здравствуйте! Я бот для управления вашей домашней аптечкой.";
pub const ACCESS_DENIED: &str = "Доступ запрещен.";
pub const EMPTY_CABINET: &str = "Ваша аптечка пуста.";
pub const ERROR_PROCESSING: &str =
    "Произошла ошибка при обработке вашего сообщения. Попробуйте позже.";
pub const INVALID_COURSE_FORMAT: &str = "Не удалось распознать данные курса. Пожалуйста, \
    используйте формат: 'курс Название Дозировка Расписание [метод Метод]'.";
pub const UPSTREAM_UNAVAILABLE: &str =
    "Извините, произошла ошибка при обработке запроса. Попробуйте позже.";
pub const UNKNOWN_INTENT: &str =
    "Не удалось определить действие. Попробуйте переформулировать запрос.";
pub const ADD_FORMAT_HINT: &str =
    "Чтобы добавить лекарство, отправьте: 'лекарство Название ММ.ГГ xКоличество'.";
pub const CANNOT_RECOMMEND_EMPTY: &str = "Ваша аптечка пуста. Невозможно дать рекомендации.";
pub const RECOMMENDATION_FAILED: &str = "Не удалось сформировать рекомендацию.";
pub const NO_EXPIRING_MEDICATIONS: &str = "Нет лекарств с приближающимся сроком годности.";
pub const NO_COURSES: &str = "У вас пока нет курсов приема лекарств.";
pub const UNSPECIFIED_METHOD: &str = "Не указан";
