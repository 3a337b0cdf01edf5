// src/web/handlers/hub_handlers.rs

use rocket::http::CookieJar;
use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

use crate::core::SessionRegistry;
use crate::store::SurveyStore;
use crate::web::handlers::{screen_view, session_id};
use crate::web::types::{
    DataResponse, FastForwardView, HubView, StandardErrorResponse, TopicCardView,
};
use crate::wizard::FastForwardOutcome;

pub(crate) fn build_hub_view(store: &SurveyStore) -> HubView {
    let topics = store
        .catalog()
        .topics()
        .iter()
        .map(|topic| TopicCardView {
            topic: topic.id,
            title: topic.title,
            color: topic.color,
            url: topic.first_question_url.clone(),
            complete: store.is_topic_complete(topic.id),
        })
        .collect();

    HubView {
        topics,
        is_next_button_shown: store.any_topic_complete(),
    }
}

pub async fn hub_handler(
    cookies: &CookieJar<'_>,
    registry: &State<SessionRegistry>,
) -> Json<DataResponse<HubView>> {
    let session = session_id(cookies);
    let view = registry
        .with_wizard(session, |wizard| {
            wizard.go_home();
            build_hub_view(wizard.store())
        })
        .await;

    Json(DataResponse::success("Explorez les sujets".to_string(), view))
}

pub async fn fast_forward_handler(
    cookies: &CookieJar<'_>,
    registry: &State<SessionRegistry>,
) -> Result<Json<DataResponse<FastForwardView>>, Json<StandardErrorResponse>> {
    let session = session_id(cookies);
    let result = registry
        .with_wizard(session, |wizard| {
            let outcome = wizard.fast_forward(&mut rand::thread_rng())?;
            Ok::<_, crate::wizard::NavError>((
                outcome,
                screen_view(wizard.store().catalog(), wizard.screen()),
            ))
        })
        .await;

    match result {
        Ok((outcome, screen)) => {
            info!("Fast-forward: {:?}", outcome);
            let outcome = match outcome {
                FastForwardOutcome::Highlighted(value) => format!("highlighted {value}"),
                FastForwardOutcome::Advanced => "advanced".to_string(),
                FastForwardOutcome::Jumped(topic) => format!("jumped to {topic}"),
                FastForwardOutcome::MovedToSummary => "moved to summary".to_string(),
            };
            Ok(Json(DataResponse::success(
                "Avance rapide".to_string(),
                FastForwardView { outcome, screen },
            )))
        }
        Err(e) => Err(Json(StandardErrorResponse::new(
            e.to_string(),
            "AUTOMATION_DISABLED".to_string(),
            vec!["Enable automation_mode in config.yaml to use the demo walkthrough".to_string()],
        ))),
    }
}
