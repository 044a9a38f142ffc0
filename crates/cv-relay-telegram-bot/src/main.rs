use cv_relay_core::config::RelaySettings;
use cv_relay_core::llm::build_provider;
use cv_relay_core::{AnswerGenerator, AnswerOptions, ContextDocument};
use cv_relay_transport_telegram::config::TelegramSettings;
use cv_relay_transport_telegram::runner::run_bot;
use dotenvy::dotenv;
use regex::Regex;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Regex patterns for redacting secrets from log output
struct RedactionPatterns {
    token_url: Regex,
    token_bare: Regex,
    openrouter_key: Regex,
    bearer: Regex,
}

impl RedactionPatterns {
    /// Initialize all regex patterns
    ///
    /// # Errors
    ///
    /// Returns an error if any regex pattern is invalid
    fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            token_url: Regex::new(r"(https?://[^/]+/bot)([0-9]+:[A-Za-z0-9_-]+)")?,
            token_bare: Regex::new(r"\b[0-9]{8,10}:[A-Za-z0-9_-]{35}\b")?,
            openrouter_key: Regex::new(r"sk-or-[A-Za-z0-9_-]+")?,
            bearer: Regex::new(r"(Bearer\s+)[A-Za-z0-9._-]+")?,
        })
    }

    fn redact(&self, input: &str) -> String {
        let output = self.token_url.replace_all(input, "$1[TELEGRAM_TOKEN]");
        let output = self.token_bare.replace_all(&output, "[TELEGRAM_TOKEN]");
        let output = self.openrouter_key.replace_all(&output, "[API_KEY]");
        self.bearer.replace_all(&output, "$1[MASKED]").into_owned()
    }
}

struct RedactingWriter<W: Write> {
    inner: W,
    patterns: Arc<RedactionPatterns>,
}

impl<W: Write> RedactingWriter<W> {
    const fn new(inner: W, patterns: Arc<RedactionPatterns>) -> Self {
        Self { inner, patterns }
    }
}

impl<W: Write> Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s = String::from_utf8_lossy(buf);
        let redacted = self.patterns.redact(&s);
        self.inner.write_all(redacted.as_bytes())?;
        // Report the original length; the redacted text may differ in size.
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

struct RedactingMakeWriter<F> {
    make_inner: F,
    patterns: Arc<RedactionPatterns>,
}

impl<F> RedactingMakeWriter<F> {
    const fn new(make_inner: F, patterns: Arc<RedactionPatterns>) -> Self {
        Self {
            make_inner,
            patterns,
        }
    }
}

impl<'a, F, W> tracing_subscriber::fmt::MakeWriter<'a> for RedactingMakeWriter<F>
where
    F: Fn() -> W + 'static,
    W: Write,
{
    type Writer = RedactingWriter<W>;

    fn make_writer(&'a self) -> Self::Writer {
        RedactingWriter::new((self.make_inner)(), self.patterns.clone())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenv().ok();

    // Redaction must be ready before the first log line
    let patterns = Arc::new(RedactionPatterns::new().map_err(|e| {
        eprintln!("Failed to compile regex patterns: {e}");
        e
    })?);

    init_logging(patterns);

    info!("Starting CV Relay TG Bot...");

    let (relay_settings, telegram_settings) = init_settings();
    let generator = init_generator(&relay_settings);

    run_bot(telegram_settings, generator).await;

    info!("CV Relay TG Bot stopped.");
    Ok(())
}

fn init_logging(patterns: Arc<RedactionPatterns>) {
    let make_writer = RedactingMakeWriter::new(io::stderr, patterns);

    let debug_mode = std::env::var("DEBUG_MODE")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);

    let filter = if debug_mode {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(
                "cv_relay_core=info,cv_relay_transport_telegram=info,cv_relay_telegram_bot=info,hyper=warn,h2=error,reqwest=warn,tokio=warn,tower=warn,async_openai=warn",
            )
        })
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(make_writer))
        .init();
}

/// Both secrets are required; the process exits before any handler exists.
fn init_settings() -> (RelaySettings, TelegramSettings) {
    let relay_settings = match RelaySettings::new() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load relay configuration (is OPENROUTER_API_KEY set?): {}", e);
            std::process::exit(1);
        }
    };
    let telegram_settings = match TelegramSettings::new() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load telegram configuration (is TELEGRAM_BOT_TOKEN set?): {}", e);
            std::process::exit(1);
        }
    };

    info!("Configuration loaded successfully.");
    (relay_settings, telegram_settings)
}

fn init_generator(settings: &RelaySettings) -> Arc<AnswerGenerator> {
    let context = match ContextDocument::load(&settings.cv_path) {
        Ok(doc) => Arc::new(doc),
        Err(e) => {
            error!("Failed to load context document: {}", e);
            std::process::exit(1);
        }
    };

    let provider = match build_provider(settings) {
        Ok(provider) => provider,
        Err(e) => {
            error!("Failed to initialize LLM provider: {}", e);
            std::process::exit(1);
        }
    };

    Arc::new(AnswerGenerator::new(
        provider,
        context,
        AnswerOptions::from(settings),
    ))
}
