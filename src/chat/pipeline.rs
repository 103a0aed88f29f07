//! Turn resolution: rule table first, then the hosted model if configured,
//! then a canned default reply.

use std::time::Duration;

use rand::Rng;
use rand::seq::SliceRandom;
use tokio::time::timeout;

use crate::chat::CAMPUS_SYSTEM_PROMPT;
use crate::llm::provider::{GenerateInput, TextProvider};
use crate::rules::RuleTable;

/// Generic replies used when no rule matches and the model is unavailable.
pub const DEFAULT_REPLIES: [&str; 4] = [
    "I'm not sure I understand. Could you rephrase your question?",
    "That's an interesting question. Let me connect you with a human advisor who can help.",
    "I don't have information about that yet. Try asking about campus facilities, registration, or student life.",
    "I'm still learning about university processes. Could you ask something about library, exams, or dining?",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponderConfig {
    pub request_timeout_ms: u64,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 30_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    Rule,
    Model,
    /// The model was invoked and failed; the text carries the error detail.
    ModelFailure,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub text: String,
    pub source: ReplySource,
}

/// Resolves one question at a time. Holds only read-only state, so a session
/// owns exactly one and no locking is involved.
#[derive(Debug, Clone)]
pub struct Responder<P> {
    rules: RuleTable,
    provider: Option<P>,
    config: ResponderConfig,
}

impl<P: TextProvider> Responder<P> {
    pub fn new(rules: RuleTable, provider: Option<P>, config: ResponderConfig) -> Self {
        Self {
            rules,
            provider,
            config,
        }
    }

    /// Capability flag, fixed for the lifetime of the session: the provider is
    /// either constructed at startup or permanently absent.
    pub fn fallback_available(&self) -> bool {
        self.provider.is_some()
    }

    /// Resolves `input` to a reply. Never fails and never panics: every
    /// provider error is folded into a visible `ModelFailure` reply.
    pub async fn respond<R: Rng>(&self, input: &str, rng: &mut R) -> ChatReply {
        let question = input.trim();

        if let Some(answer) = self.rules.match_input(question) {
            return ChatReply {
                text: answer.to_string(),
                source: ReplySource::Rule,
            };
        }

        if let Some(provider) = &self.provider {
            // Each turn stands alone: the model sees only this question and
            // the fixed campus persona, never prior turns.
            let call = provider.generate(GenerateInput {
                prompt: question.to_string(),
                system_instruction: Some(CAMPUS_SYSTEM_PROMPT.to_string()),
            });
            let budget = Duration::from_millis(self.config.request_timeout_ms);

            return match timeout(budget, call).await {
                Ok(Ok(output)) => ChatReply {
                    text: output.text,
                    source: ReplySource::Model,
                },
                Ok(Err(err)) => failure_reply(format!("Assistant request failed: {err}")),
                Err(_) => failure_reply(
                    "Assistant request failed: no response within the time limit".to_string(),
                ),
            };
        }

        let text = DEFAULT_REPLIES
            .choose(rng)
            .copied()
            .unwrap_or(DEFAULT_REPLIES[0]);
        ChatReply {
            text: text.to_string(),
            source: ReplySource::Default,
        }
    }
}

fn failure_reply(text: String) -> ChatReply {
    ChatReply {
        text,
        source: ReplySource::ModelFailure,
    }
}
