use crate::bot::dispatch::{route, InboundEvent, OutboundReply};
use anyhow::Result;
use cv_relay_core::utils::truncate_str;
use cv_relay_core::AnswerGenerator;
use std::sync::Arc;
use teloxide::{
    prelude::*,
    types::{ChatAction, LinkPreviewOptions, MessageEntity, MessageEntityKind, ParseMode},
    utils::command::BotCommands,
};
use tracing::{debug, info, warn};

// Helper function to get user name from Message
fn get_user_name(msg: &Message) -> String {
    if let Some(ref user) = msg.from {
        if let Some(ref username) = user.username {
            return username.clone();
        }
        if !user.first_name.is_empty() {
            return user.first_name.clone();
        }
    }
    "Unknown".to_string()
}

/// Safe extraction of user ID from a message.
/// Returns 0 if the user information is missing.
pub fn get_user_id_safe(msg: &Message) -> i64 {
    msg.from.as_ref().map_or(0, |u| u.id.0.cast_signed())
}

/// Supported commands for the bot
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    /// Show the welcome message
    #[command(description = "Start the bot.")]
    Start,
    /// Same as /start
    #[command(description = "What can this bot do?")]
    Help,
}

impl From<Command> for InboundEvent {
    fn from(_: Command) -> Self {
        Self::Greeting
    }
}

/// True when Telegram marked the start of the message as a bot command.
fn starts_with_bot_command(entities: Option<&[MessageEntity]>) -> bool {
    entities.is_some_and(|entities| {
        entities
            .iter()
            .any(|e| e.kind == MessageEntityKind::BotCommand && e.offset == 0)
    })
}

const fn disabled_link_preview() -> LinkPreviewOptions {
    LinkPreviewOptions {
        is_disabled: true,
        url: None,
        prefer_small_media: false,
        prefer_large_media: false,
        show_above_text: false,
    }
}

/// Send a routed reply with its rendering options.
///
/// # Errors
///
/// Returns an error if the Telegram API call fails.
pub async fn send_reply(bot: &Bot, chat_id: ChatId, reply: &OutboundReply) -> Result<Message> {
    let mut req = bot.send_message(chat_id, reply.text.clone());
    if reply.format.rich_text {
        req = req.parse_mode(ParseMode::Html);
    }
    if reply.format.disable_link_preview {
        req = req.link_preview_options(disabled_link_preview());
    }
    Ok(req.await?)
}

/// Greeting command handler
///
/// # Errors
///
/// Returns an error if the welcome message cannot be sent.
pub async fn greet(
    bot: Bot,
    msg: Message,
    cmd: Command,
    generator: Arc<AnswerGenerator>,
) -> Result<()> {
    let user_id = get_user_id_safe(&msg);
    let user_name = get_user_name(&msg);
    info!("User {user_id} ({user_name}) sent {cmd:?}.");

    if let Some(reply) = route(cmd.into(), &generator).await {
        send_reply(&bot, msg.chat.id, &reply).await?;
    }
    Ok(())
}

/// Text message handler
///
/// # Errors
///
/// Returns an error if the reply cannot be sent.
pub async fn handle_text(bot: Bot, msg: Message, generator: Arc<AnswerGenerator>) -> Result<()> {
    let text = msg.text().unwrap_or_default();
    let user_id = get_user_id_safe(&msg);
    let user_name = get_user_name(&msg);

    let event = InboundEvent::classify(text, starts_with_bot_command(msg.entities()));
    match &event {
        InboundEvent::Ignored => {
            debug!("Ignoring unsupported command from user {user_id}.");
            return Ok(());
        }
        InboundEvent::Question(question) => {
            info!(
                "Handling question from user {user_id} ({user_name}). Text: '{}'",
                truncate_str(question, 100)
            );
            if let Err(e) = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await {
                warn!("Failed to send typing action to {user_id}: {e}");
            }
        }
        InboundEvent::Greeting => {
            info!("User {user_id} ({user_name}) sent a greeting command as text.");
        }
    }

    if let Some(reply) = route(event, &generator).await {
        send_reply(&bot, msg.chat.id, &reply).await?;
        info!("Reply sent to user {user_id}.");
    }
    Ok(())
}

/// Register the command list shown in Telegram clients.
///
/// # Errors
///
/// Returns an error if the Telegram API call fails.
pub async fn register_commands(bot: &Bot) -> Result<()> {
    bot.set_my_commands(Command::bot_commands()).await?;
    Ok(())
}
