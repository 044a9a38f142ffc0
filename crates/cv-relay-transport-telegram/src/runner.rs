use crate::bot;
use crate::bot::handlers::Command;
use crate::config::TelegramSettings;
use cv_relay_core::AnswerGenerator;
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use tracing::{error, info, warn};

/// Run the Telegram transport runtime.
///
/// Updates from one chat are handled in order; different chats are handled
/// concurrently. Returns after ctrl-c.
pub async fn run_bot(settings: TelegramSettings, generator: Arc<AnswerGenerator>) {
    let bot = Bot::new(settings.telegram_bot_token);

    if let Err(e) = bot::handlers::register_commands(&bot).await {
        warn!("Failed to register bot commands: {}", e);
    }

    let handler = setup_handler();

    info!(
        model = %generator.options().model_id,
        "Bot is running..."
    );

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![generator])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

fn setup_handler() -> UpdateHandler<teloxide::RequestError> {
    Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(
            dptree::filter(|msg: Message| msg.text().is_some()).endpoint(handle_text_message),
        )
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    generator: Arc<AnswerGenerator>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = bot::handlers::greet(bot, msg, cmd, generator).await {
        error!("Command error: {}", e);
    }
    respond(())
}

async fn handle_text_message(
    bot: Bot,
    msg: Message,
    generator: Arc<AnswerGenerator>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = bot::handlers::handle_text(bot, msg, generator).await {
        error!("Text handler error: {}", e);
    }
    respond(())
}
