// src/web/handlers/question_handlers.rs

use rocket::http::CookieJar;
use rocket::response::Redirect;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{info, warn};

use crate::catalog::{QuestionCatalog, QuestionId, TopicId};
use crate::core::SessionRegistry;
use crate::summary::display_for;
use crate::web::handlers::{screen_view, session_id};
use crate::web::types::{
    AnswerRequest, ChoiceView, DataResponse, QuestionView, ScreenView, StandardErrorResponse,
    StandardRequest,
};
use crate::wizard::NavError;

pub(crate) fn build_question_view(
    catalog: &QuestionCatalog,
    topic: TopicId,
    question: QuestionId,
) -> Option<QuestionView> {
    let entry = catalog.question(topic, question)?;
    let topic_entry = catalog.topic(topic);

    let choices = entry
        .kind
        .choices()
        .iter()
        .map(|&value| {
            // every value of a kind's domain has a display entry
            let display = display_for(entry.kind, value)?;
            Some(ChoiceView {
                value,
                icon: display.icon,
                label: display.label,
            })
        })
        .collect::<Option<Vec<_>>>()?;

    Some(QuestionView {
        topic,
        topic_title: topic_entry.title,
        topic_color: topic_entry.color,
        question,
        prompt: entry.prompt,
        choices,
        step_index: entry.position - 1,
        step_count: entry.total,
        next_url: entry
            .next
            .and_then(|next| catalog.question(topic, next))
            .map(|next| next.url.clone()),
    })
}

/// One question page. Stale or mistyped urls go back to the hub instead of
/// rendering a broken screen.
pub async fn question_page_handler(
    topic: &str,
    question: &str,
    cookies: &CookieJar<'_>,
    registry: &State<SessionRegistry>,
) -> Result<Json<DataResponse<QuestionView>>, Redirect> {
    let catalog = QuestionCatalog::get();
    let Some((topic, question)) = catalog.parse_route(topic, question) else {
        warn!("Unknown question route /{}/{}, redirecting to hub", topic, question);
        return Err(Redirect::to("/"));
    };

    let session = session_id(cookies);
    let positioned = registry
        .with_wizard(session, |wizard| wizard.goto(topic, question))
        .await;
    if positioned.is_err() {
        return Err(Redirect::to("/"));
    }

    match build_question_view(catalog, topic, question) {
        Some(view) => Ok(Json(DataResponse::success(
            format!("Question {}/{}", view.step_index + 1, view.step_count),
            view,
        ))),
        None => Err(Redirect::to("/")),
    }
}

/// Record an answer for the session and advance the wizard.
pub async fn submit_answer_handler(
    request: Json<StandardRequest<AnswerRequest>>,
    cookies: &CookieJar<'_>,
    registry: &State<SessionRegistry>,
) -> Result<Json<DataResponse<ScreenView>>, Json<StandardErrorResponse>> {
    let session = session_id(cookies);
    let AnswerRequest {
        topic,
        question,
        value,
    } = request.into_inner().data;

    let result = registry
        .with_wizard(session, |wizard| {
            wizard.goto(topic, question)?;
            let next = wizard.submit_value(value)?;
            Ok::<_, NavError>(screen_view(wizard.store().catalog(), next))
        })
        .await;

    match result {
        Ok(screen) => {
            info!("Recorded answer {} for {}/{}", value, topic, question);
            Ok(Json(DataResponse::success(
                "Réponse enregistrée".to_string(),
                screen,
            )))
        }
        Err(NavError::UnknownStep { topic, question }) => Err(Json(StandardErrorResponse::new(
            format!("La question {topic}/{question} n'existe pas"),
            "UNKNOWN_STEP".to_string(),
            vec!["Repartez de la page d'accueil".to_string()],
        ))),
        Err(e) => Err(Json(StandardErrorResponse::new(
            e.to_string(),
            "VALUE_REJECTED".to_string(),
            vec!["Choisissez une des réponses proposées".to_string()],
        ))),
    }
}
