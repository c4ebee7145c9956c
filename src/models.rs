use serde::{Deserialize, Serialize};

/// Reasons a generated record is rejected instead of rendered.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("missing player name")]
    MissingName,
    #[error("empty rationale")]
    EmptyReason,
    #[error("score {0} outside 0-100")]
    ScoreOutOfRange(i64),
    #[error("scores sum to {0}, not plausibly a probability pair")]
    ImplausibleScorePair(i64),
    #[error("offered odds {0} below 1.0")]
    BadOdds(f64),
    #[error("recommended side '{0}' is not one of the entry's players")]
    UnknownSide(String),
    #[error("'{0}' looks like a team, not a player")]
    WrongDomain(String),
}

/// Single-match prediction, the wire contract of the single-mode generator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionRecord {
    pub p1_name: String,
    pub p1_score: i64,
    pub p2_name: String,
    pub p2_score: i64,
    pub reason: String,
}

impl PredictionRecord {
    /// The upstream model is not trusted to produce a sane probability pair:
    /// each score must sit in 0-100 and the pair must sum near 100.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.p1_name.trim().is_empty() || self.p2_name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.reason.trim().is_empty() {
            return Err(ValidationError::EmptyReason);
        }
        for score in [self.p1_score, self.p2_score] {
            if !(0..=100).contains(&score) {
                return Err(ValidationError::ScoreOutOfRange(score));
            }
        }
        let sum = self.p1_score + self.p2_score;
        if !(80..=120).contains(&sum) {
            return Err(ValidationError::ImplausibleScorePair(sum));
        }
        Ok(())
    }
}

/// One scheduled match in the scouting list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoutEntry {
    pub p1: String,
    pub p2: String,
    pub p1_perc: i64,
    pub p2_perc: i64,
    pub bet_on: String,
    pub odd_value: f64,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_time: Option<String>,
}

/// Name fragments that mark a team rather than a tennis player. Search
/// context regularly leaks football fixtures into list mode; prompt
/// instructions alone don't stop the model from copying them through.
const TEAM_MARKERS: &[&str] = &[
    " fc", "fc ", " afc", " cf", " sc ", " ac ", "united", "city", "real ",
    "inter ", "juventus", "milan", "borussia", "atletico", "olympique",
];

fn looks_like_team(name: &str) -> bool {
    let lower = format!(" {} ", name.to_lowercase());
    TEAM_MARKERS.iter().any(|m| lower.contains(m))
}

impl ScoutEntry {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.p1.trim().is_empty() || self.p2.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        for name in [&self.p1, &self.p2] {
            if looks_like_team(name) {
                return Err(ValidationError::WrongDomain(name.clone()));
            }
        }
        for perc in [self.p1_perc, self.p2_perc] {
            if !(0..=100).contains(&perc) {
                return Err(ValidationError::ScoreOutOfRange(perc));
            }
        }
        if self.odd_value < 1.0 {
            return Err(ValidationError::BadOdds(self.odd_value));
        }
        let side = self.bet_on.trim().to_lowercase();
        let named = |p: &str| {
            let p = p.trim().to_lowercase();
            p == side || p.contains(&side) || side.contains(&p)
        };
        if side.is_empty() || !(named(&self.p1) || named(&self.p2)) {
            return Err(ValidationError::UnknownSide(self.bet_on.clone()));
        }
        Ok(())
    }
}

/// The cached scouting output, replaced only as a unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoutList {
    pub matches: Vec<ScoutEntry>,
}

impl ScoutList {
    /// Post-generation filter: drop entries the validator rejects and
    /// report how many were dropped.
    pub fn retain_valid(&mut self) -> usize {
        let before = self.matches.len();
        self.matches.retain(|entry| match entry.validate() {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(p1 = %entry.p1, p2 = %entry.p2, %err, "Dropping scout entry");
                false
            }
        });
        before - self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Elicited (or manually forced) risk appetite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RiskProfile {
    #[default]
    Unset,
    Prudent,
    Bold,
}

impl RiskProfile {
    /// Parse a judgement or override token. Anything indefinite stays unset.
    pub fn parse(text: &str) -> Self {
        match text.trim().to_lowercase().as_str() {
            "prudent" => Self::Prudent,
            "bold" => Self::Bold,
            _ => Self::Unset,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unset => "not yet established",
            Self::Prudent => "prudent",
            Self::Bold => "bold",
        }
    }
}

impl std::fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One transcript turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatMessage {
    User(String),
    Advisor(String),
}

impl ChatMessage {
    pub fn text(&self) -> &str {
        match self {
            Self::User(t) | Self::Advisor(t) => t,
        }
    }

    pub fn is_advisor(&self) -> bool {
        matches!(self, Self::Advisor(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(p1_score: i64, p2_score: i64) -> PredictionRecord {
        PredictionRecord {
            p1_name: "Sinner".to_string(),
            p1_score,
            p2_name: "Alcaraz".to_string(),
            p2_score,
            reason: "recent form".to_string(),
        }
    }

    #[test]
    fn accepts_sane_probability_pair() {
        assert_eq!(record(60, 40).validate(), Ok(()));
        assert_eq!(record(55, 44).validate(), Ok(()));
    }

    #[test]
    fn rejects_both_zero_scores() {
        assert_eq!(
            record(0, 0).validate(),
            Err(ValidationError::ImplausibleScorePair(0))
        );
    }

    #[test]
    fn rejects_out_of_range_scores() {
        assert_eq!(
            record(-5, 105).validate(),
            Err(ValidationError::ScoreOutOfRange(-5))
        );
        assert_eq!(
            record(140, 10).validate(),
            Err(ValidationError::ScoreOutOfRange(140))
        );
    }

    #[test]
    fn rejects_sum_far_from_hundred() {
        assert_eq!(
            record(10, 20).validate(),
            Err(ValidationError::ImplausibleScorePair(30))
        );
    }

    #[test]
    fn rejects_empty_rationale() {
        let mut r = record(50, 50);
        r.reason = "  ".to_string();
        assert_eq!(r.validate(), Err(ValidationError::EmptyReason));
    }

    fn entry() -> ScoutEntry {
        ScoutEntry {
            p1: "Sinner".to_string(),
            p2: "Alcaraz".to_string(),
            p1_perc: 60,
            p2_perc: 40,
            bet_on: "Sinner".to_string(),
            odd_value: 1.8,
            reason: "form".to_string(),
            match_time: Some("14:00".to_string()),
        }
    }

    #[test]
    fn scout_entry_accepts_valid() {
        assert_eq!(entry().validate(), Ok(()));
    }

    #[test]
    fn scout_entry_rejects_third_party_side() {
        let mut e = entry();
        e.bet_on = "Djokovic".to_string();
        assert_eq!(
            e.validate(),
            Err(ValidationError::UnknownSide("Djokovic".to_string()))
        );
    }

    #[test]
    fn scout_entry_accepts_surname_only_side() {
        let mut e = entry();
        e.p1 = "Jannik Sinner".to_string();
        e.bet_on = "Sinner".to_string();
        assert_eq!(e.validate(), Ok(()));
    }

    #[test]
    fn scout_entry_rejects_football_teams() {
        let mut e = entry();
        e.p1 = "Inter Milan".to_string();
        e.bet_on = "Alcaraz".to_string();
        assert!(matches!(
            e.validate(),
            Err(ValidationError::WrongDomain(_))
        ));
    }

    #[test]
    fn scout_entry_rejects_sub_unit_odds() {
        let mut e = entry();
        e.odd_value = 0.85;
        assert_eq!(e.validate(), Err(ValidationError::BadOdds(0.85)));
    }

    #[test]
    fn retain_valid_drops_only_bad_entries() {
        let mut bad = entry();
        bad.odd_value = 0.2;
        let mut list = ScoutList {
            matches: vec![entry(), bad, entry()],
        };
        assert_eq!(list.retain_valid(), 1);
        assert_eq!(list.matches.len(), 2);
    }

    #[test]
    fn scout_entry_match_time_is_optional() {
        let js = r#"{"p1":"A","p2":"B","p1_perc":55,"p2_perc":45,
                     "bet_on":"A","odd_value":1.5,"reason":"r"}"#;
        let e: ScoutEntry = serde_json::from_str(js).unwrap();
        assert!(e.match_time.is_none());
    }

    #[test]
    fn risk_profile_parse_is_definite_or_unset() {
        assert_eq!(RiskProfile::parse(" Prudent\n"), RiskProfile::Prudent);
        assert_eq!(RiskProfile::parse("BOLD"), RiskProfile::Bold);
        assert_eq!(RiskProfile::parse("maybe bold?"), RiskProfile::Unset);
    }
}
