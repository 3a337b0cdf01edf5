// src/summary.rs
//! The bilan: every topic's answers condensed into one card grid, ordered by
//! the user's priorities, plus the printable text rendering.

use std::cmp::Reverse;
use std::fmt::Write as _;

use serde::Serialize;

use crate::answer::{AnswerKind, AnswerValue, TopicPriority};
use crate::catalog::{QuestionCatalog, TopicId};
use crate::store::UserState;

/// Fixed display mapping for one discrete answer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnswerDisplay {
    pub icon: &'static str,
    pub label: &'static str,
}

/// Icon and label for a recorded value, `None` for combinations outside the
/// question's domain (the store never records those).
pub fn display_for(kind: AnswerKind, value: AnswerValue) -> Option<AnswerDisplay> {
    let display = match (kind, value) {
        (AnswerKind::YesNo | AnswerKind::YesNoLater, AnswerValue::Bool(true)) => AnswerDisplay {
            icon: "👍",
            label: "Oui",
        },
        (AnswerKind::YesNo | AnswerKind::YesNoLater, AnswerValue::Bool(false)) => AnswerDisplay {
            icon: "👎",
            label: "Non",
        },
        (AnswerKind::YesNoLater, AnswerValue::Later) => AnswerDisplay {
            icon: "⏳",
            label: "Plus tard",
        },
        (AnswerKind::Confidence, AnswerValue::Score(2)) => AnswerDisplay {
            icon: "😀",
            label: "Très confiant(e)",
        },
        (AnswerKind::Confidence, AnswerValue::Score(1)) => AnswerDisplay {
            icon: "🙂",
            label: "Plutôt confiant(e)",
        },
        (AnswerKind::Confidence, AnswerValue::Score(-1)) => AnswerDisplay {
            icon: "😕",
            label: "Peu confiant(e)",
        },
        (AnswerKind::Confidence, AnswerValue::Score(-2)) => AnswerDisplay {
            icon: "😟",
            label: "Pas du tout confiant(e)",
        },
        (AnswerKind::Levels, AnswerValue::Score(2)) => AnswerDisplay {
            icon: "🏁",
            label: "C'est déjà fait",
        },
        (AnswerKind::Levels, AnswerValue::Score(1)) => AnswerDisplay {
            icon: "👣",
            label: "J'ai commencé",
        },
        (AnswerKind::Levels, AnswerValue::Score(-1)) => AnswerDisplay {
            icon: "🌱",
            label: "J'y pense",
        },
        (AnswerKind::Levels, AnswerValue::Score(-2)) => AnswerDisplay {
            icon: "🚧",
            label: "Pas encore commencé",
        },
        _ => return None,
    };
    Some(display)
}

pub fn priority_label(priority: Option<TopicPriority>) -> &'static str {
    match priority {
        Some(TopicPriority::Decided(true)) => "oui",
        Some(TopicPriority::Decided(false)) => "non",
        Some(TopicPriority::Later) => "plus tard",
        None => "non renseigné",
    }
}

fn priority_score(priority: Option<TopicPriority>) -> i8 {
    priority.map_or(-1, TopicPriority::score)
}

/// One topic's line in the bilan grid. Unanswered slots stay `None` and
/// render as empty.
#[derive(Debug, Serialize)]
pub struct SummaryRow {
    pub topic: TopicId,
    pub title: &'static str,
    pub color: &'static str,
    pub talk_about: &'static str,
    pub priority: Option<TopicPriority>,
    pub situation: Option<AnswerDisplay>,
    pub confidence: Option<AnswerDisplay>,
    pub levels: Option<AnswerDisplay>,
}

/// All topics as summary rows, sorted by priority: address-now first, later
/// next, "not needed" and unset last. The sort is stable, so topics with the
/// same priority keep their catalog order.
pub fn summary_rows(catalog: &QuestionCatalog, state: &UserState) -> Vec<SummaryRow> {
    let mut rows: Vec<SummaryRow> = catalog
        .topics()
        .iter()
        .map(|topic| {
            let mut row = SummaryRow {
                topic: topic.id,
                title: topic.title,
                color: topic.color,
                talk_about: topic.talk_about,
                priority: state.priority(topic.id),
                situation: None,
                confidence: None,
                levels: None,
            };
            for question in &topic.questions {
                let Some(value) = state.answer(topic.id, question.id) else {
                    continue;
                };
                let display = display_for(question.kind, value);
                match question.kind {
                    AnswerKind::YesNo | AnswerKind::YesNoLater => row.situation = display,
                    AnswerKind::Confidence => row.confidence = display,
                    AnswerKind::Levels => row.levels = display,
                }
            }
            row
        })
        .collect();

    rows.sort_by_key(|row| Reverse(priority_score(row.priority)));
    rows
}

/// Plain-text rendering of the bilan for the print view and the CLI: every
/// question's full prompt with its human-readable answer, the per-topic
/// priority tri-state, and the session notes.
pub fn print_text(catalog: &QuestionCatalog, state: &UserState, notes: Option<&str>) -> String {
    let mut out = String::new();
    let date = chrono::Local::now().format("%d/%m/%Y");
    let _ = writeln!(out, "Mon bilan — établi le {date}");
    let _ = writeln!(out);

    for row in summary_rows(catalog, state) {
        let topic = catalog.topic(row.topic);
        let _ = writeln!(out, "## {}", topic.title);
        for question in &topic.questions {
            let _ = writeln!(out, "- {}", question.prompt);
            match state
                .answer(topic.id, question.id)
                .and_then(|value| display_for(question.kind, value))
            {
                Some(display) => {
                    let _ = writeln!(out, "  {} {}", display.icon, display.label);
                }
                None => {
                    let _ = writeln!(out, "  (sans réponse)");
                }
            }
        }
        let _ = writeln!(
            out,
            "En {} avec mon conseiller : {}",
            topic.talk_about,
            priority_label(row.priority)
        );
        let _ = writeln!(out);
    }

    if let Some(notes) = notes.filter(|n| !n.trim().is_empty()) {
        let _ = writeln!(out, "## Mes notes");
        let _ = writeln!(out, "{notes}");
    }

    out
}
