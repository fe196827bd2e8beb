use dotenvy::dotenv;
use envconfig::Envconfig;
use std::sync::Arc;
use teloxide::{
    dispatching::UpdateFilterExt,
    prelude::*,
    types::{KeyboardButton, KeyboardMarkup, ReplyMarkup},
    utils::command::BotCommands,
};

pub mod access;
pub mod constants;
pub mod db;
pub mod executor;
pub mod formatters;
pub mod handlers;
pub mod intent;
pub mod llm;
pub mod notify;
pub mod reminders;
pub mod utils;

type Error = Box<dyn std::error::Error + Send + Sync>;

#[derive(Envconfig)]
pub struct Config {
    #[envconfig(from = "TELEGRAM_BOT_TOKEN")]
    telegram_bot_token: String,

    #[envconfig(from = "DATABASE_URL", default = "sqlite://aptechka.db")]
    database_url: String,

    #[envconfig(from = "GROQ_API_KEY")]
    groq_api_key: String,

    #[envconfig(from = "LLM_MODEL", default = "mixtral-8x7b-32768")]
    llm_model: String,

    #[envconfig(from = "ALLOWED_USERS", default = "")]
    allowed_users: String,
}

#[derive(BotCommands, Debug, Clone)]
#[command(rename_rule = "lowercase", description = "Доступные команды:")]
enum Command {
    #[command(description = "Начать работу с ботом.")]
    Start,
    #[command(description = "Показать справку по командам.")]
    Help,
}

/// Shared dependencies injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<db::repository::SqliteRepository>,
    pub llm: Arc<llm::GroqLlmService>,
    pub allowed_users: Arc<Vec<i64>>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    log::info!("Starting the medicine cabinet bot...");

    // Load environment variables from a .env file if present
    dotenv().ok();

    let config = Config::init_from_env().map_err(|e| format!("configuration error: {e}"))?;

    let pool = db::init_db(&config.database_url).await?;
    let bot = Bot::new(config.telegram_bot_token);

    let repo = Arc::new(db::repository::SqliteRepository::new(pool));
    let llm_service = Arc::new(llm::GroqLlmService::new(
        config.groq_api_key,
        config.llm_model,
    )?);
    let notifier = Arc::new(notify::TelegramNotifier::new(bot.clone()));

    let state = AppState {
        repo: repo.clone(),
        llm: llm_service,
        allowed_users: Arc::new(access::parse_allowed_users(&config.allowed_users)),
    };

    reminders::schedule_reminder_sweeps(repo, notifier).await?;

    let handler = Update::filter_message()
        .branch(dptree::entry().filter_command::<Command>().endpoint(answer))
        .branch(dptree::entry().endpoint(handlers::message::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    log::info!("Shutting down gracefully");
    Ok(())
}

async fn answer(bot: Bot, msg: Message, cmd: Command, state: AppState) -> Result<(), Error> {
    let user_id = msg.from.as_ref().map(|user| user.id.0 as i64).unwrap_or(0);
    if !access::is_allowed(user_id, &state.allowed_users) {
        log::warn!("Unauthorized access attempt from user {}", user_id);
        bot.send_message(msg.chat.id, constants::ACCESS_DENIED).await?;
        return Ok(());
    }

    match cmd {
        Command::Start => {
            log::info!("Received start command");
            let keyboard = KeyboardMarkup::new(vec![
                vec![
                    KeyboardButton::new("Моя аптечка"),
                    KeyboardButton::new("Мой курс лекарств"),
                ],
                vec![KeyboardButton::new("Сроки годности")],
            ])
            .resize_keyboard();

            bot.send_message(msg.chat.id, constants::WELCOME)
                .reply_markup(ReplyMarkup::Keyboard(keyboard))
                .await?;
        }
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .await?;
        }
    }

    Ok(())
}
