//! Prompt envelope composition.
//!
//! Every request carries the same instruction preamble, the entire context
//! document and the user's question. Nothing is truncated or chunked here;
//! size limits are enforced by the caller.

use crate::context::ContextDocument;
use crate::utils::count_tokens;

/// System-level instructions sent with every request.
#[must_use]
pub fn system_prompt(owner_name: &str) -> String {
    format!(
        "You are {owner_name}'s recruiter-facing AI CV assistant.\n\
         \n\
         Rules:\n\
         - Use ONLY the provided CV content\n\
         - Do NOT invent information\n\
         - If something is not in the CV, say so clearly\n\
         \n\
         Formatting rules:\n\
         - Respond in PLAIN TEXT ONLY\n\
         - Do NOT use Markdown or HTML\n\
         - Do NOT use **, __, or any formatting symbols\n\
         - Use emojis and capitalization to highlight sections:\n\
         \x20 - Section titles: emojis\n\
         \x20 - Bullet points: start with • or ✅\n"
    )
}

/// User-level message: the full document followed by the question, verbatim.
#[must_use]
pub fn user_prompt(context: &ContextDocument, question: &str) -> String {
    format!(
        "Below is the FULL CV content.\n\
         \n\
         Use ONLY this information to answer the question.\n\
         If the answer does not exist in the CV, say so explicitly.\n\
         \n\
         CV CONTENT:\n\
         {}\n\
         \n\
         QUESTION:\n\
         {question}\n",
        context.as_str()
    )
}

/// The composed payload for one completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptEnvelope {
    /// Instruction preamble
    pub system: String,
    /// Context document plus question
    pub user: String,
}

impl PromptEnvelope {
    /// Compose the envelope for a single question.
    #[must_use]
    pub fn compose(owner_name: &str, context: &ContextDocument, question: &str) -> Self {
        Self {
            system: system_prompt(owner_name),
            user: user_prompt(context, question),
        }
    }

    /// Approximate size of the whole envelope in tokens.
    #[must_use]
    pub fn token_estimate(&self) -> usize {
        count_tokens(&self.system) + count_tokens(&self.user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextError;

    #[test]
    fn test_system_prompt_rules() {
        let prompt = system_prompt("Jane Doe");
        assert!(prompt.starts_with("You are Jane Doe's recruiter-facing AI CV assistant."));
        assert!(prompt.contains("Use ONLY the provided CV content"));
        assert!(prompt.contains("If something is not in the CV, say so clearly"));
        assert!(prompt.contains("Do NOT use **, __, or any formatting symbols"));
        assert!(prompt.contains("  - Bullet points: start with • or ✅"));
    }

    #[test]
    fn test_user_prompt_embeds_document_then_question() -> Result<(), ContextError> {
        let doc = ContextDocument::from_text("Line one\n\nEmail: jane@example.com")?;
        let prompt = user_prompt(&doc, "What is the email?");

        let doc_at = prompt.find("CV CONTENT:\nLine one\n\nEmail: jane@example.com\n");
        let question_at = prompt.find("QUESTION:\nWhat is the email?\n");
        assert!(doc_at.is_some());
        assert!(question_at.is_some());
        assert!(doc_at < question_at);
        Ok(())
    }

    #[test]
    fn test_empty_question_passes_through() -> Result<(), ContextError> {
        let doc = ContextDocument::from_text("cv")?;
        let envelope = PromptEnvelope::compose("Jane", &doc, "   ");
        assert!(envelope.user.ends_with("QUESTION:\n   \n"));
        Ok(())
    }

    #[test]
    fn test_large_document_is_not_truncated() -> Result<(), ContextError> {
        let body = "experience ".repeat(20_000);
        let doc = ContextDocument::from_text(body.clone())?;
        let envelope = PromptEnvelope::compose("Jane", &doc, "q");
        assert!(envelope.user.contains(&body));
        assert!(envelope.token_estimate() > 10_000);
        Ok(())
    }
}
