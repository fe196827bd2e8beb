use teloxide::prelude::*;

use crate::{access, constants, executor, intent, AppState};

/// Free-text entry point: guard, resolve, execute, reply.
pub async fn handle_message(bot: Bot, msg: Message, state: AppState) -> Result<(), crate::Error> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let user_id = user.id.0 as i64;

    if !access::is_allowed(user_id, &state.allowed_users) {
        log::warn!("Unauthorized access attempt from user {}", user_id);
        bot.send_message(msg.chat.id, constants::ACCESS_DENIED).await?;
        return Ok(());
    }

    let resolved = intent::resolve(text, state.llm.as_ref()).await;
    let response = executor::execute(resolved, user_id, state.repo.as_ref(), state.llm.as_ref()).await;
    bot.send_message(msg.chat.id, response).await?;
    Ok(())
}
