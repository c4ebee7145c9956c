use crate::models::{ChatMessage, PredictionRecord, RiskProfile, ScoutList};

/// Opening advisor turn: the transcript is seeded with it so the very first
/// thing the user sees already ends in a profiling question.
pub const OPENING_MESSAGE: &str = "Hi, I'm your tennis betting advisor. I can walk you \
through today's board or a single match once you've run an analysis. To tailor my \
advice: do you prefer steady low-risk picks, or are you drawn to long odds?";

/// Per-session store. One instance per interactive session, owned by the
/// host and mutated only by the action currently running; a multi-session
/// host must construct one of these per session, never share one.
pub struct SessionState {
    prediction: Option<PredictionRecord>,
    scouting: Option<ScoutList>,
    transcript: Vec<ChatMessage>,
    pub profile: RiskProfile,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            prediction: None,
            scouting: None,
            transcript: vec![ChatMessage::Advisor(OPENING_MESSAGE.to_string())],
            profile: RiskProfile::Unset,
        }
    }

    /// Overwritten wholesale on every successful single-match analysis.
    pub fn set_prediction(&mut self, record: PredictionRecord) {
        self.prediction = Some(record);
    }

    pub fn prediction(&self) -> Option<&PredictionRecord> {
        self.prediction.as_ref()
    }

    pub fn scouting(&self) -> Option<&ScoutList> {
        self.scouting.as_ref()
    }

    pub fn set_scouting(&mut self, list: ScoutList) {
        self.scouting = Some(list);
    }

    /// Manual refresh is the only way the scout cache is cleared; the next
    /// read repopulates it. The prediction slot is untouched.
    pub fn invalidate_scouting(&mut self) {
        self.scouting = None;
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.transcript.push(ChatMessage::User(text.into()));
    }

    pub fn push_advisor(&mut self, text: impl Into<String>) {
        self.transcript.push(ChatMessage::Advisor(text.into()));
    }

    /// Append-only transcript, in arrival order.
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }
}
