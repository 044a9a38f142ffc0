//! End-to-end routing with a stub provider: event in, reply out, no Telegram.

use cv_relay_core::config::FALLBACK_MESSAGE;
use cv_relay_core::llm::{CompletionRequest, LlmError, LlmProvider};
use cv_relay_core::sanitizer::contains_sentinel;
use cv_relay_core::{AnswerGenerator, AnswerOptions, ContextDocument};
use cv_relay_transport_telegram::bot::dispatch::{route, InboundEvent};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const CV: &str = "# Jane Doe\nEmail: jane.doe@example.com\nLinkedIn: https://linkedin.com/in/janedoe\n";

struct StubProvider {
    reply: Result<String, String>,
    calls: AtomicUsize,
}

impl StubProvider {
    fn ok(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait::async_trait]
impl LlmProvider for StubProvider {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().map_err(LlmError::NetworkError)
    }
}

fn generator(provider: Arc<StubProvider>) -> AnswerGenerator {
    AnswerGenerator::new(
        provider,
        Arc::new(ContextDocument::from_text(CV).expect("valid CV")),
        AnswerOptions {
            owner_name: "Jane Doe".to_string(),
            ..AnswerOptions::default()
        },
    )
}

#[tokio::test]
async fn greeting_sends_rich_welcome_without_calling_provider() {
    let provider = StubProvider::ok("unused");
    let generator = generator(provider.clone());

    let reply = route(InboundEvent::classify("/start", true), &generator)
        .await
        .expect("greeting must reply");

    assert!(reply.text.contains("CV assistant"));
    assert!(reply.text.contains("Jane Doe"));
    assert!(reply.format.rich_text);
    assert!(reply.format.disable_link_preview);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn question_reply_keeps_email_and_is_plain_text() {
    let provider = StubProvider::ok("<s>📧 **Email:** jane.doe@example.com</s>");
    let generator = generator(provider.clone());

    let reply = route(
        InboundEvent::classify("What is the candidate's email?", false),
        &generator,
    )
    .await
    .expect("question must reply");

    assert_eq!(reply.text, "📧 Email: jane.doe@example.com");
    assert!(!reply.format.rich_text);
    assert!(reply.format.disable_link_preview);
    assert!(!contains_sentinel(&reply.text));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn provider_failure_still_replies_with_fallback() {
    let provider = StubProvider::failing("connection refused");
    let generator = generator(provider.clone());

    let reply = route(InboundEvent::classify("Where does she work?", false), &generator)
        .await
        .expect("failure must still reply");

    assert_eq!(reply.text, FALLBACK_MESSAGE);
    assert!(!reply.format.rich_text);
}

#[tokio::test]
async fn unknown_command_gets_no_reply() {
    let provider = StubProvider::ok("unused");
    let generator = generator(provider.clone());

    assert!(route(InboundEvent::classify("/stats", true), &generator)
        .await
        .is_none());
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn markup_cannot_rebuild_a_sentinel_in_the_reply() {
    for (raw, expected) in [("Answer<**s**>", "Answer"), ("Done<__/s>", "Done")] {
        let provider = StubProvider::ok(raw);
        let generator = generator(provider);

        let reply = route(InboundEvent::classify("Anything?", false), &generator)
            .await
            .expect("question must reply");

        assert_eq!(reply.text, expected);
        assert!(!contains_sentinel(&reply.text));
    }
}

#[tokio::test]
async fn slash_prefixed_text_without_command_entity_is_answered() {
    let provider = StubProvider::ok("jane.doe@example.com");
    let generator = generator(provider.clone());

    let reply = route(InboundEvent::classify("/ what is her email?", false), &generator)
        .await
        .expect("plain text must reply");

    assert_eq!(reply.text, "jane.doe@example.com");
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}
