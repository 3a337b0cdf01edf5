// src/wizard.rs
//! The wizard state machine: one screen at a time, linear progression
//! through each topic, store writes on submit only.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::answer::AnswerValue;
use crate::catalog::{NextStep, QuestionCatalog, QuestionId, TopicId};
use crate::store::{StoreError, SurveyStore};

/// The screen the wizard is currently on. `Summary` is terminal: the flow
/// hands off to the bilan page from there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardScreen {
    Hub,
    Question { topic: TopicId, question: QuestionId },
    Summary,
}

#[derive(Debug, thiserror::Error)]
pub enum NavError {
    #[error("no such step: {topic}/{question}")]
    UnknownStep { topic: TopicId, question: QuestionId },

    #[error("no question is on screen")]
    NotOnQuestion,

    #[error("no answer is selected")]
    NoSelection,

    #[error("automation mode is disabled")]
    AutomationDisabled,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What a fast-forward trigger did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FastForwardOutcome {
    /// A random valid value was highlighted; nothing recorded yet.
    Highlighted(AnswerValue),
    /// The highlighted selection was submitted and the wizard advanced.
    Advanced,
    /// From the hub: jumped into a topic's first question.
    Jumped(TopicId),
    /// From the hub: moved on to the summary.
    MovedToSummary,
}

/// Probability of visiting another topic (rather than finishing) when the
/// hub's advance button is already showable.
const HUB_EXPLORE_BIAS: f64 = 0.8;

pub struct Wizard {
    catalog: &'static QuestionCatalog,
    store: SurveyStore,
    screen: WizardScreen,
    /// The highlighted-but-not-submitted choice. Changing it never touches
    /// the store; submit writes it and advances.
    selection: Option<AnswerValue>,
    automation: bool,
    notes: String,
}

impl Wizard {
    pub fn new(store: SurveyStore) -> Self {
        Self::with_automation(store, false)
    }

    pub fn with_automation(store: SurveyStore, automation: bool) -> Self {
        Self {
            catalog: store.catalog(),
            store,
            screen: WizardScreen::Hub,
            selection: None,
            automation,
            notes: String::new(),
        }
    }

    pub fn screen(&self) -> WizardScreen {
        self.screen
    }

    pub fn store(&self) -> &SurveyStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SurveyStore {
        &mut self.store
    }

    pub fn selection(&self) -> Option<AnswerValue> {
        self.selection
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn set_notes(&mut self, notes: String) {
        self.notes = notes;
    }

    /// Back to the hub, dropping any highlighted selection.
    pub fn go_home(&mut self) {
        self.screen = WizardScreen::Hub;
        self.selection = None;
    }

    /// Enter a topic at its first question. Every topic is a valid entry
    /// point from the hub.
    pub fn open_topic(&mut self, topic: TopicId) {
        let first = self.catalog.topic(topic).first_question().id;
        self.screen = WizardScreen::Question {
            topic,
            question: first,
        };
        self.selection = None;
    }

    /// Jump to a specific question, e.g. from a deep link. Unknown pairs are
    /// an error; the web layer turns that into a redirect to the hub.
    pub fn goto(&mut self, topic: TopicId, question: QuestionId) -> Result<(), NavError> {
        if self.catalog.question(topic, question).is_none() {
            return Err(NavError::UnknownStep { topic, question });
        }
        self.screen = WizardScreen::Question { topic, question };
        self.selection = None;
        Ok(())
    }

    /// Highlight a value without recording it. The value must belong to the
    /// current question's domain.
    pub fn select(&mut self, value: AnswerValue) -> Result<(), NavError> {
        let WizardScreen::Question { topic, question } = self.screen else {
            return Err(NavError::NotOnQuestion);
        };
        let entry = self
            .catalog
            .question(topic, question)
            .ok_or(NavError::UnknownStep { topic, question })?;
        if !entry.kind.accepts(&value) {
            return Err(NavError::Store(StoreError::ValueOutOfDomain {
                kind: entry.kind,
                value,
            }));
        }
        self.selection = Some(value);
        Ok(())
    }

    /// Record the highlighted selection and advance: next question in the
    /// topic, else the next topic's first question, else the summary.
    pub fn submit(&mut self) -> Result<WizardScreen, NavError> {
        let WizardScreen::Question { topic, question } = self.screen else {
            return Err(NavError::NotOnQuestion);
        };
        let value = self.selection.ok_or(NavError::NoSelection)?;

        self.store.record_answer(topic, question, value)?;
        self.selection = None;

        // the pair was just validated by record_answer
        self.screen = match self.catalog.next_after(topic, question) {
            Some(NextStep::Question(t, q)) | Some(NextStep::Topic(t, q)) => {
                WizardScreen::Question {
                    topic: t,
                    question: q,
                }
            }
            Some(NextStep::Done) | None => WizardScreen::Summary,
        };
        Ok(self.screen)
    }

    /// Select and submit in one step (the web API path).
    pub fn submit_value(&mut self, value: AnswerValue) -> Result<WizardScreen, NavError> {
        self.select(value)?;
        self.submit()
    }

    /// Progress within the current topic: (0-based step index, total steps).
    pub fn progress(&self) -> Option<(usize, usize)> {
        let WizardScreen::Question { topic, question } = self.screen else {
            return None;
        };
        let entry = self.catalog.question(topic, question)?;
        Some((entry.position - 1, entry.total))
    }

    /// Demo/automation affordance. On a question: first trigger highlights a
    /// uniformly random valid value, second trigger submits it. On the hub:
    /// jumps into a random topic, biased away from finishing until the
    /// advance button is showable.
    pub fn fast_forward<R: Rng>(&mut self, rng: &mut R) -> Result<FastForwardOutcome, NavError> {
        if !self.automation {
            return Err(NavError::AutomationDisabled);
        }
        match self.screen {
            WizardScreen::Question { topic, question } => {
                if self.selection.is_some() {
                    self.submit()?;
                    return Ok(FastForwardOutcome::Advanced);
                }
                let entry = self
                    .catalog
                    .question(topic, question)
                    .ok_or(NavError::UnknownStep { topic, question })?;
                let value = *entry
                    .kind
                    .choices()
                    .choose(rng)
                    .ok_or(NavError::NotOnQuestion)?;
                self.selection = Some(value);
                Ok(FastForwardOutcome::Highlighted(value))
            }
            WizardScreen::Hub => {
                if self.store.any_topic_complete() && !rng.gen_bool(HUB_EXPLORE_BIAS) {
                    self.screen = WizardScreen::Summary;
                    return Ok(FastForwardOutcome::MovedToSummary);
                }
                let topic = *TopicId::ALL.choose(rng).ok_or(NavError::NotOnQuestion)?;
                self.open_topic(topic);
                Ok(FastForwardOutcome::Jumped(topic))
            }
            WizardScreen::Summary => Ok(FastForwardOutcome::MovedToSummary),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn wizard() -> Wizard {
        Wizard::new(SurveyStore::new())
    }

    #[test]
    fn test_linear_walk_through_a_topic() {
        let mut w = wizard();
        w.open_topic(TopicId::Competences);
        assert_eq!(
            w.screen(),
            WizardScreen::Question {
                topic: TopicId::Competences,
                question: QuestionId::Identifier,
            }
        );
        assert_eq!(w.progress(), Some((0, 3)));

        let next = w.submit_value(AnswerValue::Bool(true)).unwrap();
        assert_eq!(
            next,
            WizardScreen::Question {
                topic: TopicId::Competences,
                question: QuestionId::Projets,
            }
        );
        assert_eq!(w.progress(), Some((1, 3)));

        w.submit_value(AnswerValue::Score(1)).unwrap();
        let after_topic = w.submit_value(AnswerValue::Score(-2)).unwrap();

        // competences is done; the wizard moves to the next topic's first question
        assert!(w.store().is_topic_complete(TopicId::Competences));
        assert_eq!(
            after_topic,
            WizardScreen::Question {
                topic: TopicId::Formations,
                question: QuestionId::Besoin,
            }
        );
    }

    #[test]
    fn test_transition_is_deterministic() {
        for _ in 0..3 {
            let mut w = wizard();
            w.open_topic(TopicId::Sante);
            let next = w.submit_value(AnswerValue::Bool(true)).unwrap();
            assert_eq!(
                next,
                WizardScreen::Question {
                    topic: TopicId::Sante,
                    question: QuestionId::Forme,
                }
            );
        }
    }

    #[test]
    fn test_last_question_of_last_topic_ends_the_flow() {
        let mut w = wizard();
        w.goto(TopicId::Administratif, QuestionId::Echeances).unwrap();
        let end = w.submit_value(AnswerValue::Score(2)).unwrap();
        assert_eq!(end, WizardScreen::Summary);
    }

    #[test]
    fn test_goto_rejects_unknown_pairs() {
        let mut w = wizard();
        // both ids exist, but medecin belongs to sante
        assert!(matches!(
            w.goto(TopicId::Competences, QuestionId::Medecin),
            Err(NavError::UnknownStep { .. })
        ));
        assert_eq!(w.screen(), WizardScreen::Hub);
    }

    #[test]
    fn test_selection_does_not_touch_the_store() {
        let mut w = wizard();
        w.open_topic(TopicId::Finances);
        w.select(AnswerValue::Bool(true)).unwrap();
        w.select(AnswerValue::Later).unwrap();
        assert_eq!(
            w.store().answer(TopicId::Finances, QuestionId::Budget),
            None
        );
        // submit writes the latest highlighted value
        w.submit().unwrap();
        assert_eq!(
            w.store().answer(TopicId::Finances, QuestionId::Budget),
            Some(AnswerValue::Later)
        );
    }

    #[test]
    fn test_submit_without_selection_is_an_error() {
        let mut w = wizard();
        w.open_topic(TopicId::Sante);
        assert!(matches!(w.submit(), Err(NavError::NoSelection)));
    }

    #[test]
    fn test_select_rejects_out_of_domain() {
        let mut w = wizard();
        w.open_topic(TopicId::Sante); // medecin is yes/no
        assert!(w.select(AnswerValue::Score(1)).is_err());
        assert_eq!(w.selection(), None);
    }

    #[test]
    fn test_fast_forward_two_phase_on_question() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut w = Wizard::with_automation(SurveyStore::new(), true);
        w.open_topic(TopicId::Competences);

        // phase one: highlights a valid value without recording it
        let outcome = w.fast_forward(&mut rng).unwrap();
        let FastForwardOutcome::Highlighted(value) = outcome else {
            panic!("expected a highlight, got {outcome:?}");
        };
        assert!(w.selection().is_some());
        assert_eq!(
            w.store().answer(TopicId::Competences, QuestionId::Identifier),
            None
        );

        // phase two: submits and advances
        assert_eq!(
            w.fast_forward(&mut rng).unwrap(),
            FastForwardOutcome::Advanced
        );
        assert_eq!(
            w.store().answer(TopicId::Competences, QuestionId::Identifier),
            Some(value)
        );
        assert_eq!(
            w.screen(),
            WizardScreen::Question {
                topic: TopicId::Competences,
                question: QuestionId::Projets,
            }
        );
    }

    #[test]
    fn test_fast_forward_from_hub_visits_a_topic() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut w = Wizard::with_automation(SurveyStore::new(), true);
        // nothing complete: a hub trigger always jumps into a topic
        match w.fast_forward(&mut rng).unwrap() {
            FastForwardOutcome::Jumped(topic) => {
                assert_eq!(
                    w.screen(),
                    WizardScreen::Question {
                        topic,
                        question: w.store().catalog().topic(topic).first_question().id,
                    }
                );
            }
            other => panic!("expected a jump, got {other:?}"),
        }
    }

    #[test]
    fn test_fast_forward_requires_automation() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut w = wizard();
        assert!(matches!(
            w.fast_forward(&mut rng),
            Err(NavError::AutomationDisabled)
        ));
    }

    #[test]
    fn test_answers_survive_navigation() {
        // completion is monotonic: navigating around never drops answers
        let mut w = wizard();
        w.open_topic(TopicId::Sante);
        w.submit_value(AnswerValue::Bool(true)).unwrap();
        w.submit_value(AnswerValue::Score(2)).unwrap();
        w.submit_value(AnswerValue::Score(1)).unwrap();
        assert!(w.store().is_topic_complete(TopicId::Sante));

        w.go_home();
        w.open_topic(TopicId::Famille);
        w.goto(TopicId::Competences, QuestionId::Projets).unwrap();
        assert!(w.store().is_topic_complete(TopicId::Sante));
    }
}
