//! Event classification and the reply route table.
//!
//! Kept free of Telegram types so the whole question → reply path can be
//! exercised with a stub provider.

use cv_relay_core::sanitizer::clean_reply;
use cv_relay_core::AnswerGenerator;

/// Commands answered with the welcome text
const GREETING_COMMANDS: &[&str] = &["start", "help"];

/// What an inbound chat message asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// `/start` or `/help`
    Greeting,
    /// Free text, trimmed
    Question(String),
    /// Any other bot command; gets no reply
    Ignored,
}

impl InboundEvent {
    /// Classify message text.
    ///
    /// `is_command` comes from the platform (a bot command entity at the
    /// start of the message). Only then is the text read as a command:
    /// `/start` and `/help` (optionally addressed as `/start@some_bot`) are
    /// greetings, any other command is ignored. Everything else is a
    /// question, even if it begins with a slash.
    #[must_use]
    pub fn classify(text: &str, is_command: bool) -> Self {
        let trimmed = text.trim();
        let command = match trimmed.strip_prefix('/') {
            Some(command) if is_command => command,
            _ => return Self::Question(trimmed.to_string()),
        };

        let name = command
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .split('@')
            .next()
            .unwrap_or_default()
            .to_lowercase();

        if GREETING_COMMANDS.contains(&name.as_str()) {
            Self::Greeting
        } else {
            Self::Ignored
        }
    }
}

/// Rendering options requested from the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyFormat {
    /// Render as HTML
    pub rich_text: bool,
    /// Suppress link previews
    pub disable_link_preview: bool,
}

/// A reply ready to be sent to the originating chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundReply {
    /// Message text
    pub text: String,
    /// Rendering options
    pub format: ReplyFormat,
}

impl OutboundReply {
    /// Welcome reply, rendered as HTML
    #[must_use]
    pub fn greeting(owner_name: &str) -> Self {
        Self {
            text: welcome_text(owner_name),
            format: ReplyFormat {
                rich_text: true,
                disable_link_preview: true,
            },
        }
    }

    /// Answer reply, plain text
    #[must_use]
    pub fn answer(text: String) -> Self {
        Self {
            text,
            format: ReplyFormat {
                rich_text: false,
                disable_link_preview: true,
            },
        }
    }
}

/// Static welcome text; the owner name is HTML-escaped.
#[must_use]
pub fn welcome_text(owner_name: &str) -> String {
    format!(
        "👋 Hi! I’m <b>{}</b>’s CV assistant.\n\n\
         Ask me anything about background, experience, skills, or contact info.",
        html_escape::encode_text(owner_name)
    )
}

/// Produce the reply for one event. `None` means stay silent.
pub async fn route(event: InboundEvent, generator: &AnswerGenerator) -> Option<OutboundReply> {
    match event {
        InboundEvent::Greeting => Some(OutboundReply::greeting(&generator.options().owner_name)),
        InboundEvent::Question(question) => {
            let answer = generator.answer(&question).await;
            Some(OutboundReply::answer(clean_reply(&answer)))
        }
        InboundEvent::Ignored => None,
    }
}
