// src/share.rs
//! Save/share: the whole user state travels inside a URL fragment, so a
//! shared bilan link restores exact state without any server round-trip.

use anyhow::{Context, Result};

use crate::store::UserState;

/// Encode the state as a compact, URL-fragment-safe blob: JSON, then
/// percent-encoded. Round-trip exact with [`deserialize_state`].
pub fn serialize_state(state: &UserState) -> Result<String> {
    let json = serde_json::to_string(state).context("Failed to encode state as JSON")?;
    Ok(urlencoding::encode(&json).into_owned())
}

/// Decode a blob produced by [`serialize_state`]. Any failure — truncated
/// blob, corrupted characters, values outside the saved-state format — is an
/// error the caller swallows, keeping whatever state it already has.
pub fn deserialize_state(blob: &str) -> Result<UserState> {
    let json = urlencoding::decode(blob).context("State blob is not valid percent-encoding")?;
    serde_json::from_str(&json).context("State blob is not a valid saved state")
}

/// The shareable link: the summary route with the state in the fragment.
pub fn results_url(base_url: &str, state: &UserState) -> Result<String> {
    Ok(format!(
        "{}/summary#{}",
        base_url.trim_end_matches('/'),
        serialize_state(state)?
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::{AnswerValue, TopicPriority};
    use crate::catalog::{QuestionId, TopicId};
    use crate::store::SurveyStore;

    fn sample_state() -> UserState {
        let mut store = SurveyStore::new();
        store
            .record_answer(TopicId::Sante, QuestionId::Medecin, AnswerValue::Bool(true))
            .unwrap();
        store
            .record_answer(TopicId::Sante, QuestionId::Forme, AnswerValue::Score(-1))
            .unwrap();
        store
            .record_answer(TopicId::Finances, QuestionId::Budget, AnswerValue::Later)
            .unwrap();
        store.set_priority(TopicId::Sante, TopicPriority::Decided(true));
        store.set_priority(TopicId::Finances, TopicPriority::Later);
        store.state().clone()
    }

    #[test]
    fn test_round_trip_is_exact() {
        let state = sample_state();
        let blob = serialize_state(&state).unwrap();
        assert_eq!(deserialize_state(&blob).unwrap(), state);

        let empty = UserState::default();
        let blob = serialize_state(&empty).unwrap();
        assert_eq!(deserialize_state(&blob).unwrap(), empty);
    }

    #[test]
    fn test_blob_is_fragment_safe() {
        let blob = serialize_state(&sample_state()).unwrap();
        assert!(blob
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "%-_.~".contains(c)));
    }

    #[test]
    fn test_corrupted_blob_fails_closed() {
        // Scenario: corrupt one character of a valid blob
        let blob = serialize_state(&sample_state()).unwrap();

        let truncated = &blob[..blob.len() - 1];
        assert!(deserialize_state(truncated).is_err());

        // %7B is the encoded '{'; turn the opening brace into '}'
        let garbled = blob.replacen("%7B", "%7D", 1);
        assert!(deserialize_state(&garbled).is_err());

        assert!(deserialize_state("not-a-blob").is_err());
    }

    #[test]
    fn test_wire_format_matches_the_saved_state_shape() {
        let state = sample_state();
        let blob = serialize_state(&state).unwrap();
        let json = urlencoding::decode(&blob).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["answers"]["sante"]["medecin"], serde_json::json!(true));
        assert_eq!(value["answers"]["sante"]["forme"], serde_json::json!(-1));
        assert_eq!(
            value["answers"]["finances"]["budget"],
            serde_json::json!("later")
        );
        assert_eq!(value["priorities"]["sante"], serde_json::json!(true));
        assert_eq!(value["priorities"]["finances"], serde_json::json!("later"));
    }

    #[test]
    fn test_results_url_embeds_the_fragment() {
        let url = results_url("https://coach.example.org/", &UserState::default()).unwrap();
        assert!(url.starts_with("https://coach.example.org/summary#"));
        let blob = url.split('#').nth(1).unwrap();
        assert_eq!(deserialize_state(blob).unwrap(), UserState::default());
    }
}
