// src/store.rs
//! The answer store: the single mutable state of the wizard. Holds recorded
//! answers and per-topic priorities, validates every write against the
//! catalog, and supports wholesale replacement from a decoded share link.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::answer::{AnswerKind, AnswerValue, TopicPriority};
use crate::catalog::{QuestionCatalog, QuestionId, TopicId};

/// The aggregate user state: everything the share link transports.
///
/// An absent entry means "not yet answered", which is distinct from every
/// answer value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserState {
    #[serde(default)]
    pub answers: BTreeMap<TopicId, BTreeMap<QuestionId, AnswerValue>>,
    #[serde(default)]
    pub priorities: BTreeMap<TopicId, TopicPriority>,
}

impl UserState {
    pub fn answer(&self, topic: TopicId, question: QuestionId) -> Option<AnswerValue> {
        self.answers.get(&topic)?.get(&question).copied()
    }

    pub fn priority(&self, topic: TopicId) -> Option<TopicPriority> {
        self.priorities.get(&topic).copied()
    }
}

/// A topic is complete once every one of its questions has a recorded
/// answer. Order-independent; partial completion never blocks navigation.
pub fn is_topic_complete(catalog: &QuestionCatalog, state: &UserState, topic: TopicId) -> bool {
    match state.answers.get(&topic) {
        Some(answered) => catalog
            .topic(topic)
            .questions
            .iter()
            .all(|q| answered.contains_key(&q.id)),
        None => false,
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("question {question} does not exist in topic {topic}")]
    UnknownQuestion { topic: TopicId, question: QuestionId },

    #[error("value {value} is outside the domain of a {kind:?} question")]
    ValueOutOfDomain { kind: AnswerKind, value: AnswerValue },
}

/// Explicit, injectable store: construct one per session (or per test).
/// All writes are validated; a rejected write leaves prior state untouched.
pub struct SurveyStore {
    catalog: &'static QuestionCatalog,
    state: UserState,
}

impl Default for SurveyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SurveyStore {
    pub fn new() -> Self {
        Self {
            catalog: QuestionCatalog::get(),
            state: UserState::default(),
        }
    }

    pub fn catalog(&self) -> &'static QuestionCatalog {
        self.catalog
    }

    pub fn state(&self) -> &UserState {
        &self.state
    }

    /// Record (or overwrite) the answer for a question. The value must
    /// belong to the question's declared domain.
    pub fn record_answer(
        &mut self,
        topic: TopicId,
        question: QuestionId,
        value: AnswerValue,
    ) -> Result<(), StoreError> {
        let Some(entry) = self.catalog.question(topic, question) else {
            return Err(StoreError::UnknownQuestion { topic, question });
        };
        if !entry.kind.accepts(&value) {
            return Err(StoreError::ValueOutOfDomain {
                kind: entry.kind,
                value,
            });
        }
        self.state
            .answers
            .entry(topic)
            .or_default()
            .insert(question, value);
        Ok(())
    }

    /// Record (or overwrite) the topic's priority choice. Valid regardless
    /// of whether the topic's questions are answered.
    pub fn set_priority(&mut self, topic: TopicId, priority: TopicPriority) {
        self.state.priorities.insert(topic, priority);
    }

    /// Clear all answers and priorities. Irreversible: callers must have
    /// obtained an explicit user confirmation before invoking this.
    pub fn restart(&mut self) {
        self.state = UserState::default();
    }

    /// Replace the entire state with a decoded snapshot (counselor opening a
    /// shared link). Never merges. The snapshot is validated entry by entry
    /// and rejected wholesale on the first invalid one, keeping prior state.
    pub fn load_snapshot(&mut self, snapshot: UserState) -> Result<(), StoreError> {
        for (&topic, answers) in &snapshot.answers {
            for (&question, &value) in answers {
                let Some(entry) = self.catalog.question(topic, question) else {
                    return Err(StoreError::UnknownQuestion { topic, question });
                };
                if !entry.kind.accepts(&value) {
                    return Err(StoreError::ValueOutOfDomain {
                        kind: entry.kind,
                        value,
                    });
                }
            }
        }
        self.state = snapshot;
        Ok(())
    }

    pub fn answer(&self, topic: TopicId, question: QuestionId) -> Option<AnswerValue> {
        self.state.answer(topic, question)
    }

    pub fn priority(&self, topic: TopicId) -> Option<TopicPriority> {
        self.state.priority(topic)
    }

    pub fn is_topic_complete(&self, topic: TopicId) -> bool {
        is_topic_complete(self.catalog, &self.state, topic)
    }

    pub fn any_topic_complete(&self) -> bool {
        TopicId::ALL.into_iter().any(|t| self.is_topic_complete(t))
    }

    pub fn all_topics_complete(&self) -> bool {
        TopicId::ALL.into_iter().all(|t| self.is_topic_complete(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_overwrite() {
        let mut store = SurveyStore::new();
        store
            .record_answer(
                TopicId::Competences,
                QuestionId::Identifier,
                AnswerValue::Bool(true),
            )
            .unwrap();
        assert_eq!(
            store.answer(TopicId::Competences, QuestionId::Identifier),
            Some(AnswerValue::Bool(true))
        );

        store
            .record_answer(
                TopicId::Competences,
                QuestionId::Identifier,
                AnswerValue::Bool(false),
            )
            .unwrap();
        assert_eq!(
            store.answer(TopicId::Competences, QuestionId::Identifier),
            Some(AnswerValue::Bool(false))
        );
    }

    #[test]
    fn test_rejects_out_of_domain_values() {
        let mut store = SurveyStore::new();
        // identifier is yes/no: "later" and scores are out of domain
        assert_eq!(
            store.record_answer(
                TopicId::Competences,
                QuestionId::Identifier,
                AnswerValue::Later,
            ),
            Err(StoreError::ValueOutOfDomain {
                kind: AnswerKind::YesNo,
                value: AnswerValue::Later,
            })
        );
        assert_eq!(
            store.answer(TopicId::Competences, QuestionId::Identifier),
            None,
            "a rejected write must keep prior state"
        );
    }

    #[test]
    fn test_rejects_unknown_pair() {
        let mut store = SurveyStore::new();
        // medecin exists, but in sante
        assert_eq!(
            store.record_answer(
                TopicId::Competences,
                QuestionId::Medecin,
                AnswerValue::Bool(true),
            ),
            Err(StoreError::UnknownQuestion {
                topic: TopicId::Competences,
                question: QuestionId::Medecin,
            })
        );
    }

    #[test]
    fn test_completion_scenario() {
        // Scenario: answer the three competences questions one by one
        let mut store = SurveyStore::new();
        store
            .record_answer(
                TopicId::Competences,
                QuestionId::Identifier,
                AnswerValue::Bool(true),
            )
            .unwrap();
        assert!(!store.is_topic_complete(TopicId::Competences));
        assert!(!store.any_topic_complete());

        store
            .record_answer(
                TopicId::Competences,
                QuestionId::Projets,
                AnswerValue::Score(1),
            )
            .unwrap();
        assert!(!store.is_topic_complete(TopicId::Competences));

        store
            .record_answer(
                TopicId::Competences,
                QuestionId::Presenter,
                AnswerValue::Score(-2),
            )
            .unwrap();
        assert!(store.is_topic_complete(TopicId::Competences));
        assert!(store.any_topic_complete());
        assert!(!store.is_topic_complete(TopicId::Sante));
    }

    #[test]
    fn test_restart_clears_everything() {
        let mut store = SurveyStore::new();
        store
            .record_answer(TopicId::Sante, QuestionId::Medecin, AnswerValue::Bool(true))
            .unwrap();
        store.set_priority(TopicId::Sante, TopicPriority::Decided(true));

        store.restart();
        assert_eq!(store.state(), &UserState::default());
        for topic in TopicId::ALL {
            assert!(!store.is_topic_complete(topic));
        }
    }

    #[test]
    fn test_load_snapshot_replaces_not_merges() {
        let mut store = SurveyStore::new();
        store
            .record_answer(
                TopicId::Competences,
                QuestionId::Identifier,
                AnswerValue::Bool(true),
            )
            .unwrap();
        store.set_priority(TopicId::Competences, TopicPriority::Later);

        let mut snapshot = UserState::default();
        snapshot
            .answers
            .entry(TopicId::Sante)
            .or_default()
            .insert(QuestionId::Medecin, AnswerValue::Bool(false));

        store.load_snapshot(snapshot.clone()).unwrap();
        assert_eq!(store.state(), &snapshot);
        assert_eq!(
            store.answer(TopicId::Competences, QuestionId::Identifier),
            None,
            "previous answers must not survive a load"
        );
        assert_eq!(store.priority(TopicId::Competences), None);
    }

    #[test]
    fn test_load_snapshot_rejects_invalid_entries() {
        let mut store = SurveyStore::new();
        store
            .record_answer(TopicId::Sante, QuestionId::Medecin, AnswerValue::Bool(true))
            .unwrap();
        let before = store.state().clone();

        let mut snapshot = UserState::default();
        snapshot
            .answers
            .entry(TopicId::Sante)
            .or_default()
            // forme is a confidence question: booleans are out of domain
            .insert(QuestionId::Forme, AnswerValue::Bool(true));

        assert!(store.load_snapshot(snapshot).is_err());
        assert_eq!(store.state(), &before, "a rejected load keeps prior state");
    }
}
