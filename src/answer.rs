// src/answer.rs
//! Answer domains: each question declares a kind, each kind accepts a fixed
//! set of discrete values.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Valid scores for graded questions. 0 is reserved ("unknown") and never
/// accepted as an answer.
pub const SCORE_VALUES: [i8; 4] = [-2, -1, 1, 2];

/// The answer domain of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnswerKind {
    /// Plain yes/no.
    YesNo,
    /// Yes/no, or postpone the question.
    YesNoLater,
    /// Self-assessed confidence, graded -2..2 without 0.
    Confidence,
    /// Progress level on a concrete step, graded -2..2 without 0.
    Levels,
}

impl AnswerKind {
    /// Every value this kind accepts, in display order.
    pub fn choices(self) -> &'static [AnswerValue] {
        const YES_NO: [AnswerValue; 2] = [AnswerValue::Bool(true), AnswerValue::Bool(false)];
        const YES_NO_LATER: [AnswerValue; 3] = [
            AnswerValue::Bool(true),
            AnswerValue::Bool(false),
            AnswerValue::Later,
        ];
        const GRADED: [AnswerValue; 4] = [
            AnswerValue::Score(2),
            AnswerValue::Score(1),
            AnswerValue::Score(-1),
            AnswerValue::Score(-2),
        ];
        match self {
            Self::YesNo => &YES_NO,
            Self::YesNoLater => &YES_NO_LATER,
            Self::Confidence | Self::Levels => &GRADED,
        }
    }

    /// Whether `value` belongs to this kind's domain.
    pub fn accepts(self, value: &AnswerValue) -> bool {
        match (self, value) {
            (Self::YesNo, AnswerValue::Bool(_)) => true,
            (Self::YesNoLater, AnswerValue::Bool(_) | AnswerValue::Later) => true,
            (Self::Confidence | Self::Levels, AnswerValue::Score(n)) => SCORE_VALUES.contains(n),
            _ => false,
        }
    }
}

/// A recorded answer. The wire form matches the saved-state format exactly:
/// JSON `true`/`false`, the string `"later"`, or a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerValue {
    Bool(bool),
    Later,
    Score(i8),
}

impl AnswerValue {
    /// Build a graded answer, rejecting values outside {-2, -1, 1, 2}.
    pub fn score(n: i8) -> Option<Self> {
        SCORE_VALUES.contains(&n).then_some(Self::Score(n))
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Later => write!(f, "later"),
            Self::Score(n) => write!(f, "{n}"),
        }
    }
}

impl Serialize for AnswerValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Later => serializer.serialize_str("later"),
            Self::Score(n) => serializer.serialize_i8(*n),
        }
    }
}

struct AnswerValueVisitor;

impl Visitor<'_> for AnswerValueVisitor {
    type Value = AnswerValue;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a boolean, the string \"later\", or an integer score")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(AnswerValue::Bool(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        match v {
            "later" => Ok(AnswerValue::Later),
            other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
        }
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        i8::try_from(v)
            .ok()
            .and_then(AnswerValue::score)
            .ok_or_else(|| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        i64::try_from(v)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
            .and_then(|n| self.visit_i64(n))
    }
}

impl<'de> Deserialize<'de> for AnswerValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AnswerValueVisitor)
    }
}

/// Per-topic choice on the summary: address now (`true`), not needed
/// (`false`), or revisit later (`"later"`). Independent of topic completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicPriority {
    Decided(bool),
    Later,
}

impl TopicPriority {
    /// Summary ordering weight: do-now first, later next, "not needed" last
    /// (unset topics also score -1, see the summary module).
    pub fn score(self) -> i8 {
        match self {
            Self::Decided(true) => 1,
            Self::Later => 0,
            Self::Decided(false) => -1,
        }
    }
}

impl Serialize for TopicPriority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Decided(b) => serializer.serialize_bool(*b),
            Self::Later => serializer.serialize_str("later"),
        }
    }
}

struct TopicPriorityVisitor;

impl Visitor<'_> for TopicPriorityVisitor {
    type Value = TopicPriority;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a boolean or the string \"later\"")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(TopicPriority::Decided(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        match v {
            "later" => Ok(TopicPriority::Later),
            other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
        }
    }
}

impl<'de> Deserialize<'de> for TopicPriority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TopicPriorityVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_domains() {
        assert!(AnswerKind::YesNo.accepts(&AnswerValue::Bool(true)));
        assert!(!AnswerKind::YesNo.accepts(&AnswerValue::Later));
        assert!(!AnswerKind::YesNo.accepts(&AnswerValue::Score(1)));

        assert!(AnswerKind::YesNoLater.accepts(&AnswerValue::Later));
        assert!(AnswerKind::YesNoLater.accepts(&AnswerValue::Bool(false)));

        assert!(AnswerKind::Confidence.accepts(&AnswerValue::Score(-2)));
        assert!(AnswerKind::Levels.accepts(&AnswerValue::Score(2)));
        // 0 is reserved and never a valid answer
        assert!(!AnswerKind::Confidence.accepts(&AnswerValue::Score(0)));
        assert!(!AnswerKind::Levels.accepts(&AnswerValue::Score(3)));
    }

    #[test]
    fn test_score_constructor() {
        assert_eq!(AnswerValue::score(1), Some(AnswerValue::Score(1)));
        assert_eq!(AnswerValue::score(0), None);
        assert_eq!(AnswerValue::score(5), None);
    }

    #[test]
    fn test_answer_wire_format() {
        assert_eq!(
            serde_json::to_string(&AnswerValue::Bool(true)).unwrap(),
            "true"
        );
        assert_eq!(
            serde_json::to_string(&AnswerValue::Later).unwrap(),
            "\"later\""
        );
        assert_eq!(
            serde_json::to_string(&AnswerValue::Score(-2)).unwrap(),
            "-2"
        );

        assert_eq!(
            serde_json::from_str::<AnswerValue>("false").unwrap(),
            AnswerValue::Bool(false)
        );
        assert_eq!(
            serde_json::from_str::<AnswerValue>("\"later\"").unwrap(),
            AnswerValue::Later
        );
        assert_eq!(
            serde_json::from_str::<AnswerValue>("2").unwrap(),
            AnswerValue::Score(2)
        );
        assert!(serde_json::from_str::<AnswerValue>("\"soon\"").is_err());
        assert!(serde_json::from_str::<AnswerValue>("0").is_err());
        assert!(serde_json::from_str::<AnswerValue>("42").is_err());
    }

    #[test]
    fn test_priority_wire_format() {
        assert_eq!(
            serde_json::to_string(&TopicPriority::Decided(true)).unwrap(),
            "true"
        );
        assert_eq!(
            serde_json::to_string(&TopicPriority::Later).unwrap(),
            "\"later\""
        );
        assert_eq!(
            serde_json::from_str::<TopicPriority>("\"later\"").unwrap(),
            TopicPriority::Later
        );
        assert!(serde_json::from_str::<TopicPriority>("1").is_err());
    }

    #[test]
    fn test_priority_scores() {
        assert_eq!(TopicPriority::Decided(true).score(), 1);
        assert_eq!(TopicPriority::Later.score(), 0);
        assert_eq!(TopicPriority::Decided(false).score(), -1);
    }
}
