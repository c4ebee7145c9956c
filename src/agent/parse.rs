use serde::de::DeserializeOwned;
use tracing::debug;

/// Locate the outermost brace window in raw model output.
///
/// The generator's contract is only "best-effort structured text": the model
/// routinely wraps the object in prose or ```json fences. Taking the
/// substring from the first `{` to the last `}` strips all of that in one
/// step. Known accepted limitation: two independent brace-delimited regions
/// in the same output defeat the heuristic.
pub fn extract_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

/// Recover a typed record from raw model output. Any failure (no braces,
/// invalid JSON, schema mismatch) is a soft `None`, never an error.
pub fn decode<T: DeserializeOwned>(raw: &str) -> Option<T> {
    let window = extract_object(raw)?;
    match serde_json::from_str(window) {
        Ok(value) => Some(value),
        Err(err) => {
            debug!(%err, window_len = window.len(), "Discarding unparseable model output");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PredictionRecord;

    #[test]
    fn no_braces_yields_none() {
        assert_eq!(extract_object("I couldn't find any data, sorry."), None);
        assert!(decode::<PredictionRecord>("no structure here").is_none());
        assert!(decode::<PredictionRecord>("").is_none());
    }

    #[test]
    fn reversed_braces_yield_none() {
        assert_eq!(extract_object("} backwards {"), None);
    }

    #[test]
    fn bare_object_passes_through() {
        let raw = r#"{"p1_name":"A","p1_score":60,"p2_name":"B","p2_score":40,"reason":"x"}"#;
        assert_eq!(extract_object(raw), Some(raw));
    }

    #[test]
    fn recovers_object_from_fenced_chatter() {
        let raw = "Sure! ```json {\"p1_name\":\"A\",\"p1_score\":60,\"p2_name\":\"B\",\"p2_score\":40,\"reason\":\"x\"} ``` Hope this helps!";
        assert_eq!(
            extract_object(raw),
            Some(r#"{"p1_name":"A","p1_score":60,"p2_name":"B","p2_score":40,"reason":"x"}"#)
        );
        let record: PredictionRecord = decode(raw).unwrap();
        assert_eq!(record.p1_name, "A");
        assert_eq!(record.p1_score, 60);
        assert_eq!(record.p2_name, "B");
        assert_eq!(record.p2_score, 40);
        assert_eq!(record.reason, "x");
    }

    #[test]
    fn recovers_object_wrapped_in_prose() {
        let raw = "Here is my analysis:\n{\"p1_name\":\"Sinner\",\"p1_score\":55,\
                   \"p2_name\":\"Alcaraz\",\"p2_score\":45,\"reason\":\"form\"}\nGood luck.";
        let record: PredictionRecord = decode(raw).unwrap();
        assert_eq!(record.p1_name, "Sinner");
    }

    #[test]
    fn malformed_json_inside_braces_is_soft_failure() {
        assert!(decode::<PredictionRecord>("{not json at all}").is_none());
    }

    #[test]
    fn schema_mismatch_is_soft_failure() {
        assert!(decode::<PredictionRecord>(r#"{"weather":"sunny"}"#).is_none());
    }
}
