use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::agent::prompts;
use crate::llm::TextCompletion;
use crate::models::{ChatMessage, RiskProfile};
use crate::session::SessionState;

/// How many trailing transcript turns the advisor prompt carries.
const TRANSCRIPT_WINDOW: usize = 10;

const ADVISOR_TEMPERATURE: f32 = 0.7;

/// Stateful chat loop over the session transcript. Reads the scouting slot,
/// never writes any prediction slot; its one hard rule is that every reply
/// ends with a profiling question.
pub struct Advisor {
    llm: Arc<dyn TextCompletion>,
}

impl Advisor {
    pub fn new(llm: Arc<dyn TextCompletion>) -> Self {
        Self { llm }
    }

    /// One chat turn: append the user message, answer from current session
    /// context, enforce the trailing-question invariant, append the reply.
    pub async fn reply(&self, session: &mut SessionState, user_text: &str) -> Result<String> {
        session.push_user(user_text);

        // Elicitation: a manual override wins; otherwise let the model
        // judge whether this message settles the profile.
        if session.profile == RiskProfile::Unset {
            let verdict = self.llm.judge(&prompts::judge_profile(user_text)).await?;
            let judged = RiskProfile::parse(&verdict);
            if judged != RiskProfile::Unset {
                info!(profile = %judged, "Risk profile elicited from chat");
                session.profile = judged;
            }
        }

        let board = match session.scouting() {
            Some(list) => serde_json::to_string_pretty(&list.matches)?,
            None => prompts::NO_BOARD_MARKER.to_string(),
        };
        let transcript = render_transcript(session.transcript(), TRANSCRIPT_WINDOW);
        let prompt = prompts::advisor_turn(
            &board,
            session.profile.as_str(),
            &transcript,
            user_text,
        );

        let mut reply = self.llm.complete(&prompt, ADVISOR_TEMPERATURE).await?;

        // The prompt asks for a trailing question; the model is not trusted
        // to comply. One corrective re-prompt, then the canned fallback.
        if !ends_with_question(&reply) {
            debug!("Advisor reply missed the trailing question, re-prompting");
            reply = self
                .llm
                .complete(&prompts::advisor_fixup(&reply), ADVISOR_TEMPERATURE)
                .await?;
        }
        if !ends_with_question(&reply) {
            warn!("Re-prompt also missed the trailing question, appending fallback");
            let base = reply.trim_end().to_string();
            reply = if base.is_empty() {
                prompts::FALLBACK_QUESTION.to_string()
            } else {
                format!("{} {}", base, prompts::FALLBACK_QUESTION)
            };
        }

        session.push_advisor(reply.clone());
        Ok(reply)
    }
}

/// Last `window` turns, one line each, oldest first.
fn render_transcript(transcript: &[ChatMessage], window: usize) -> String {
    let skip = transcript.len().saturating_sub(window);
    transcript
        .iter()
        .skip(skip)
        .map(|m| match m {
            ChatMessage::User(t) => format!("User: {}", t),
            ChatMessage::Advisor(t) => format!("Advisor: {}", t),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The protocol invariant: the final sentence is interrogative. Trailing
/// whitespace, quotes and markdown emphasis are ignored.
fn ends_with_question(text: &str) -> bool {
    text.trim_end()
        .trim_end_matches(['"', '\'', '*', '_', ')'])
        .ends_with('?')
}
