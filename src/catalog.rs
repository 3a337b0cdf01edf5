// src/catalog.rs
//! Static question catalog: topics and their ordered questions, with
//! navigation data (urls, next links, step counts) derived once at startup.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::answer::AnswerKind;

/// Stable topic identifiers. The serialized form is the url slug; answers
/// are keyed by it, so variants are never renamed or reordered.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TopicId {
    Competences,
    Formations,
    Experience,
    Sante,
    Finances,
    Mobilite,
    Famille,
    Administratif,
}

impl TopicId {
    pub const ALL: [TopicId; 8] = [
        TopicId::Competences,
        TopicId::Formations,
        TopicId::Experience,
        TopicId::Sante,
        TopicId::Finances,
        TopicId::Mobilite,
        TopicId::Famille,
        TopicId::Administratif,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Self::Competences => "competences",
            Self::Formations => "formations",
            Self::Experience => "experience",
            Self::Sante => "sante",
            Self::Finances => "finances",
            Self::Mobilite => "mobilite",
            Self::Famille => "famille",
            Self::Administratif => "administratif",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for TopicId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.slug() == s)
            .ok_or(())
    }
}

/// Stable question identifiers, unique across the whole catalog.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum QuestionId {
    // competences
    Identifier,
    Projets,
    Presenter,
    // formations
    Besoin,
    Trouver,
    Financer,
    // experience
    Valoriser,
    Raconter,
    References,
    // sante
    Medecin,
    Forme,
    Couverture,
    // finances
    Budget,
    Aides,
    Anticiper,
    // mobilite
    Permis,
    Deplacements,
    Demenager,
    // famille
    Garde,
    Equilibre,
    Soutien,
    // administratif
    Dossiers,
    Droits,
    Echeances,
}

impl QuestionId {
    pub fn slug(self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::Projets => "projets",
            Self::Presenter => "presenter",
            Self::Besoin => "besoin",
            Self::Trouver => "trouver",
            Self::Financer => "financer",
            Self::Valoriser => "valoriser",
            Self::Raconter => "raconter",
            Self::References => "references",
            Self::Medecin => "medecin",
            Self::Forme => "forme",
            Self::Couverture => "couverture",
            Self::Budget => "budget",
            Self::Aides => "aides",
            Self::Anticiper => "anticiper",
            Self::Permis => "permis",
            Self::Deplacements => "deplacements",
            Self::Demenager => "demenager",
            Self::Garde => "garde",
            Self::Equilibre => "equilibre",
            Self::Soutien => "soutien",
            Self::Dossiers => "dossiers",
            Self::Droits => "droits",
            Self::Echeances => "echeances",
        }
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for QuestionId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_QUESTION_IDS
            .iter()
            .copied()
            .find(|id| id.slug() == s)
            .ok_or(())
    }
}

const ALL_QUESTION_IDS: [QuestionId; 24] = [
    QuestionId::Identifier,
    QuestionId::Projets,
    QuestionId::Presenter,
    QuestionId::Besoin,
    QuestionId::Trouver,
    QuestionId::Financer,
    QuestionId::Valoriser,
    QuestionId::Raconter,
    QuestionId::References,
    QuestionId::Medecin,
    QuestionId::Forme,
    QuestionId::Couverture,
    QuestionId::Budget,
    QuestionId::Aides,
    QuestionId::Anticiper,
    QuestionId::Permis,
    QuestionId::Deplacements,
    QuestionId::Demenager,
    QuestionId::Garde,
    QuestionId::Equilibre,
    QuestionId::Soutien,
    QuestionId::Dossiers,
    QuestionId::Droits,
    QuestionId::Echeances,
];

struct RawQuestion {
    id: QuestionId,
    prompt: &'static str,
    kind: AnswerKind,
}

struct RawTopic {
    id: TopicId,
    title: &'static str,
    color: &'static str,
    talk_about: &'static str,
    questions: [RawQuestion; 3],
}

/// Declarative topic definitions. Each topic carries one situation question
/// (yes/no or yes/no/later), one confidence question and one levels question,
/// in presentation order.
fn raw_topics() -> [RawTopic; 8] {
    use AnswerKind::{Confidence, Levels, YesNo, YesNoLater};
    [
        RawTopic {
            id: TopicId::Competences,
            title: "Mes compétences",
            color: "#58bbfb",
            talk_about: "parler de mes compétences",
            questions: [
                RawQuestion {
                    id: QuestionId::Identifier,
                    prompt: "Savez-vous identifier les compétences qui vous rendent unique ?",
                    kind: YesNo,
                },
                RawQuestion {
                    id: QuestionId::Projets,
                    prompt: "Êtes-vous confiant(e) pour relier vos compétences \
                             aux métiers qui recrutent ?",
                    kind: Confidence,
                },
                RawQuestion {
                    id: QuestionId::Presenter,
                    prompt: "Où en êtes-vous pour présenter vos compétences en entretien ?",
                    kind: Levels,
                },
            ],
        },
        RawTopic {
            id: TopicId::Formations,
            title: "Me former",
            color: "#f5a623",
            talk_about: "parler de mes besoins en formation",
            questions: [
                RawQuestion {
                    id: QuestionId::Besoin,
                    prompt: "Pensez-vous avoir besoin d'une formation pour votre projet ?",
                    kind: YesNoLater,
                },
                RawQuestion {
                    id: QuestionId::Trouver,
                    prompt: "Êtes-vous confiant(e) pour trouver la formation qui vous convient ?",
                    kind: Confidence,
                },
                RawQuestion {
                    id: QuestionId::Financer,
                    prompt: "Où en êtes-vous sur le financement d'une formation ?",
                    kind: Levels,
                },
            ],
        },
        RawTopic {
            id: TopicId::Experience,
            title: "Mon expérience",
            color: "#7b68ee",
            talk_about: "parler de mon parcours",
            questions: [
                RawQuestion {
                    id: QuestionId::Valoriser,
                    prompt: "Savez-vous valoriser votre expérience dans un CV ?",
                    kind: YesNo,
                },
                RawQuestion {
                    id: QuestionId::Raconter,
                    prompt: "Êtes-vous à l'aise pour raconter votre parcours en entretien ?",
                    kind: Confidence,
                },
                RawQuestion {
                    id: QuestionId::References,
                    prompt: "Où en êtes-vous pour obtenir des références professionnelles ?",
                    kind: Levels,
                },
            ],
        },
        RawTopic {
            id: TopicId::Sante,
            title: "Ma santé",
            color: "#1bbc9b",
            talk_about: "parler de ma santé",
            questions: [
                RawQuestion {
                    id: QuestionId::Medecin,
                    prompt: "Avez-vous un médecin traitant que vous consultez régulièrement ?",
                    kind: YesNo,
                },
                RawQuestion {
                    id: QuestionId::Forme,
                    prompt: "Vous sentez-vous en forme pour mener votre recherche d'emploi ?",
                    kind: Confidence,
                },
                RawQuestion {
                    id: QuestionId::Couverture,
                    prompt: "Où en êtes-vous avec votre couverture santé ?",
                    kind: Levels,
                },
            ],
        },
        RawTopic {
            id: TopicId::Finances,
            title: "Mes finances",
            color: "#e74c3c",
            talk_about: "parler de mes finances",
            questions: [
                RawQuestion {
                    id: QuestionId::Budget,
                    prompt: "Souhaitez-vous faire le point sur votre budget ?",
                    kind: YesNoLater,
                },
                RawQuestion {
                    id: QuestionId::Aides,
                    prompt: "Êtes-vous confiant(e) pour identifier les aides \
                             auxquelles vous avez droit ?",
                    kind: Confidence,
                },
                RawQuestion {
                    id: QuestionId::Anticiper,
                    prompt: "Où en êtes-vous pour anticiper vos finances des prochains mois ?",
                    kind: Levels,
                },
            ],
        },
        RawTopic {
            id: TopicId::Mobilite,
            title: "Ma mobilité",
            color: "#3498db",
            talk_about: "parler de mes déplacements",
            questions: [
                RawQuestion {
                    id: QuestionId::Permis,
                    prompt: "Avez-vous le permis de conduire ou un moyen de transport fiable ?",
                    kind: YesNo,
                },
                RawQuestion {
                    id: QuestionId::Deplacements,
                    prompt: "Êtes-vous confiant(e) pour vous rendre facilement \
                             à un entretien ?",
                    kind: Confidence,
                },
                RawQuestion {
                    id: QuestionId::Demenager,
                    prompt: "Où en êtes-vous dans votre réflexion sur un déménagement ?",
                    kind: Levels,
                },
            ],
        },
        RawTopic {
            id: TopicId::Famille,
            title: "Ma famille",
            color: "#9b59b6",
            talk_about: "parler de mon équilibre familial",
            questions: [
                RawQuestion {
                    id: QuestionId::Garde,
                    prompt: "Avez-vous besoin d'une solution de garde pour vos proches ?",
                    kind: YesNoLater,
                },
                RawQuestion {
                    id: QuestionId::Equilibre,
                    prompt: "Êtes-vous confiant(e) pour concilier recherche \
                             d'emploi et vie de famille ?",
                    kind: Confidence,
                },
                RawQuestion {
                    id: QuestionId::Soutien,
                    prompt: "Où en êtes-vous du soutien de votre entourage dans votre projet ?",
                    kind: Levels,
                },
            ],
        },
        RawTopic {
            id: TopicId::Administratif,
            title: "Mes démarches",
            color: "#f39c12",
            talk_about: "parler de mes démarches administratives",
            questions: [
                RawQuestion {
                    id: QuestionId::Dossiers,
                    prompt: "Vos dossiers administratifs sont-ils à jour ?",
                    kind: YesNo,
                },
                RawQuestion {
                    id: QuestionId::Droits,
                    prompt: "Êtes-vous confiant(e) pour faire valoir vos droits ?",
                    kind: Confidence,
                },
                RawQuestion {
                    id: QuestionId::Echeances,
                    prompt: "Où en êtes-vous dans le suivi de vos échéances administratives ?",
                    kind: Levels,
                },
            ],
        },
    ]
}

/// A question with its derived navigation data.
#[derive(Debug)]
pub struct Question {
    pub id: QuestionId,
    pub topic: TopicId,
    pub prompt: &'static str,
    pub kind: AnswerKind,
    /// Route of this question's page, `/<topic>/<question>`.
    pub url: String,
    /// Next question within the topic, `None` on the last one.
    pub next: Option<QuestionId>,
    /// 1-based position within the topic.
    pub position: usize,
    /// Number of questions in the topic.
    pub total: usize,
}

/// A topic with its derived navigation data.
#[derive(Debug)]
pub struct Topic {
    pub id: TopicId,
    pub title: &'static str,
    pub color: &'static str,
    /// Phrase used on the summary ("en parler avec mon conseiller").
    pub talk_about: &'static str,
    pub first_question_url: String,
    pub next_topic: Option<TopicId>,
    pub questions: Vec<Question>,
}

impl Topic {
    pub fn first_question(&self) -> &Question {
        &self.questions[0]
    }

    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

/// Where the wizard goes after answering a given question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    /// Next question within the same topic.
    Question(TopicId, QuestionId),
    /// First question of the next topic.
    Topic(TopicId, QuestionId),
    /// That was the last question of the last topic.
    Done,
}

/// The fully derived, read-only catalog. Built once per process from the
/// declarative definitions; every call to [`QuestionCatalog::get`] returns
/// the same reference.
#[derive(Debug)]
pub struct QuestionCatalog {
    topics: Vec<Topic>,
}

impl QuestionCatalog {
    pub fn get() -> &'static QuestionCatalog {
        static CATALOG: OnceLock<QuestionCatalog> = OnceLock::new();
        CATALOG.get_or_init(QuestionCatalog::build)
    }

    /// Pure transform of the raw definitions into the derived structure.
    /// Malformed definitions are a programmer error and fail loudly here.
    fn build() -> Self {
        let raw = raw_topics();
        let mut topics = Vec::with_capacity(raw.len());

        for (topic_index, raw_topic) in raw.iter().enumerate() {
            assert_eq!(
                raw_topic.id.index(),
                topic_index,
                "topics must be declared in TopicId order"
            );

            let total = raw_topic.questions.len();
            let questions = raw_topic
                .questions
                .iter()
                .enumerate()
                .map(|(i, rq)| Question {
                    id: rq.id,
                    topic: raw_topic.id,
                    prompt: rq.prompt,
                    kind: rq.kind,
                    url: format!("/{}/{}", raw_topic.id.slug(), rq.id.slug()),
                    next: raw_topic.questions.get(i + 1).map(|next| next.id),
                    position: i + 1,
                    total,
                })
                .collect::<Vec<_>>();

            topics.push(Topic {
                id: raw_topic.id,
                title: raw_topic.title,
                color: raw_topic.color,
                talk_about: raw_topic.talk_about,
                first_question_url: questions[0].url.clone(),
                next_topic: raw.get(topic_index + 1).map(|next| next.id),
                questions,
            });
        }

        let mut seen = std::collections::HashSet::new();
        for topic in &topics {
            for question in &topic.questions {
                assert!(
                    seen.insert(question.id),
                    "question id {} appears in more than one topic",
                    question.id
                );
            }
        }

        Self { topics }
    }

    /// All topics, in presentation order.
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn topic(&self, id: TopicId) -> &Topic {
        &self.topics[id.index()]
    }

    pub fn question(&self, topic: TopicId, question: QuestionId) -> Option<&Question> {
        self.topic(topic).question(question)
    }

    /// Transition target after answering `question`, or `None` when the pair
    /// does not exist in the catalog.
    pub fn next_after(&self, topic: TopicId, question: QuestionId) -> Option<NextStep> {
        let current_topic = self.topic(topic);
        let current = current_topic.question(question)?;

        if let Some(next) = current.next {
            return Some(NextStep::Question(topic, next));
        }
        match current_topic.next_topic {
            Some(next_topic) => Some(NextStep::Topic(
                next_topic,
                self.topic(next_topic).first_question().id,
            )),
            None => Some(NextStep::Done),
        }
    }

    /// Resolve url slugs to a known (topic, question) pair. Stale or mistyped
    /// routes resolve to `None`; callers redirect to the hub.
    pub fn parse_route(&self, topic_slug: &str, question_slug: &str) -> Option<(TopicId, QuestionId)> {
        let topic = TopicId::from_str(topic_slug).ok()?;
        let question = QuestionId::from_str(question_slug).ok()?;
        self.question(topic, question)?;
        Some((topic, question))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_is_idempotent() {
        let a = QuestionCatalog::get();
        let b = QuestionCatalog::get();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_catalog_shape() {
        let catalog = QuestionCatalog::get();
        assert_eq!(catalog.topics().len(), TopicId::ALL.len());

        for topic in catalog.topics() {
            assert_eq!(topic.questions.len(), 3);
            assert_eq!(topic.first_question_url, topic.questions[0].url);
            for (i, question) in topic.questions.iter().enumerate() {
                assert_eq!(question.position, i + 1);
                assert_eq!(question.total, 3);
                assert_eq!(question.topic, topic.id);
                assert_eq!(
                    question.url,
                    format!("/{}/{}", topic.id.slug(), question.id.slug())
                );
            }
            // last question has no next link
            assert_eq!(topic.questions[2].next, None);
        }
    }

    #[test]
    fn test_navigation_chain_covers_everything() {
        let catalog = QuestionCatalog::get();
        let mut topic = TopicId::ALL[0];
        let mut question = catalog.topic(topic).first_question().id;
        let mut visited = 0;

        loop {
            visited += 1;
            match catalog.next_after(topic, question).unwrap() {
                NextStep::Question(t, q) => {
                    assert_eq!(t, topic);
                    (topic, question) = (t, q);
                }
                NextStep::Topic(t, q) => {
                    assert_ne!(t, topic);
                    (topic, question) = (t, q);
                }
                NextStep::Done => break,
            }
        }
        assert_eq!(visited, 24);
    }

    #[test]
    fn test_parse_route() {
        let catalog = QuestionCatalog::get();
        assert_eq!(
            catalog.parse_route("competences", "identifier"),
            Some((TopicId::Competences, QuestionId::Identifier))
        );
        // known slugs, but the question belongs to another topic
        assert_eq!(catalog.parse_route("competences", "medecin"), None);
        assert_eq!(catalog.parse_route("inconnu", "identifier"), None);
        assert_eq!(catalog.parse_route("sante", "nope"), None);
    }

    #[test]
    fn test_slug_round_trip() {
        for id in TopicId::ALL {
            assert_eq!(id.slug().parse::<TopicId>().unwrap(), id);
            assert_eq!(
                serde_json::to_string(&id).unwrap(),
                format!("\"{}\"", id.slug())
            );
        }
        for topic in QuestionCatalog::get().topics() {
            for question in &topic.questions {
                assert_eq!(question.id.slug().parse::<QuestionId>().unwrap(), question.id);
            }
        }
    }
}
