mod chat;
mod prompt;

use serde::{Deserialize, Serialize};

use attest_core::{AiSettings, RecordSummary};

/// Answer returned to the frontend, with provider attribution for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantReply {
    pub answer: String,
    pub provider: String,
    pub model: String,
}

/// Forward a user question to the configured LLM with the fixed compliance
/// prompt. One request, one response — no retries, no streaming.
///
/// `records` is the caller's current record listing, inlined as context so
/// the assistant can answer questions about the workspace it is looking at.
pub async fn ask(
    question: &str,
    records: &[RecordSummary],
    settings: &AiSettings,
) -> Result<AssistantReply, String> {
    if !attest_core::ai_configured(settings) {
        return Err("AI provider is not configured".to_string());
    }
    if question.trim().is_empty() {
        return Err("empty question".to_string());
    }

    let user_msg = prompt::user_message(question, records);
    tracing::debug!(
        provider = %settings.provider,
        model = %settings.model,
        "sending assistant request"
    );

    let answer = chat::complete(settings, prompt::SYSTEM_PROMPT, &user_msg).await?;
    tracing::debug!(chars = answer.len(), "assistant reply received");

    Ok(AssistantReply {
        answer,
        provider: settings.provider.clone(),
        model: settings.model.clone(),
    })
}
