// src/web/handlers/summary_handlers.rs

use rocket::http::CookieJar;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info, warn};

use crate::core::SessionRegistry;
use crate::share;
use crate::summary::{print_text, summary_rows};
use crate::web::handlers::session_id;
use crate::web::types::{
    ActionResponse, AppConfig, DataResponse, LoadStateRequest, NotesRequest, PrintResponse,
    PriorityRequest, ResultsLinkView, StandardErrorResponse, StandardRequest, SummaryView,
};

/// The bilan. When a shared link's state blob is supplied it replaces the
/// session state, so the page shows the bilan exactly as it was shared;
/// malformed blobs are discarded and the session state stands.
pub async fn summary_page_handler(
    state: Option<String>,
    cookies: &CookieJar<'_>,
    registry: &State<SessionRegistry>,
    config: &State<AppConfig>,
) -> Json<DataResponse<SummaryView>> {
    let session = session_id(cookies);

    let decoded = state.as_deref().map(share::deserialize_state);
    let mut shared = false;
    match decoded {
        Some(Ok(snapshot)) => {
            let loaded = registry
                .with_wizard(session, |wizard| {
                    wizard.store_mut().load_snapshot(snapshot)
                })
                .await;
            match loaded {
                Ok(()) => shared = true,
                Err(e) => warn!("Discarding shared state: {}", e),
            }
        }
        Some(Err(e)) => warn!("Discarding malformed state blob: {:#}", e),
        None => {}
    }

    let base_url = config.base_url.clone();
    let view = registry
        .with_wizard(session, |wizard| {
            let store = wizard.store();
            let results_url = share::results_url(&base_url, store.state()).unwrap_or_else(|e| {
                error!("Failed to build results url: {:#}", e);
                String::new()
            });
            SummaryView {
                rows: summary_rows(store.catalog(), store.state()),
                notes: wizard.notes().to_string(),
                results_url,
                shared,
            }
        })
        .await;

    Json(DataResponse::success("Votre bilan".to_string(), view))
}

/// Printable text rendering of the bilan.
pub async fn print_page_handler(
    cookies: &CookieJar<'_>,
    registry: &State<SessionRegistry>,
) -> PrintResponse {
    let session = session_id(cookies);
    let text = registry
        .with_wizard(session, |wizard| {
            print_text(
                wizard.store().catalog(),
                wizard.store().state(),
                Some(wizard.notes()),
            )
        })
        .await;
    PrintResponse::new(text)
}

pub async fn set_priority_handler(
    request: Json<StandardRequest<PriorityRequest>>,
    cookies: &CookieJar<'_>,
    registry: &State<SessionRegistry>,
) -> Json<ActionResponse> {
    let session = session_id(cookies);
    let PriorityRequest { topic, priority } = request.into_inner().data;

    registry
        .with_wizard(session, |wizard| {
            wizard.store_mut().set_priority(topic, priority)
        })
        .await;

    info!("Priority for {} set to {:?}", topic, priority);
    Json(ActionResponse::success(
        format!("Priorité enregistrée pour {topic}"),
        "priority-set".to_string(),
    ))
}

/// Wipe the session's answers and priorities. The front-end asks the user
/// for an explicit confirmation before calling this.
pub async fn restart_handler(
    cookies: &CookieJar<'_>,
    registry: &State<SessionRegistry>,
) -> Json<ActionResponse> {
    let session = session_id(cookies);
    registry
        .with_wizard(session, |wizard| {
            wizard.store_mut().restart();
            wizard.go_home();
        })
        .await;

    info!("Session {} restarted", session);
    Json(ActionResponse::success(
        "Votre questionnaire a été remis à zéro".to_string(),
        "restarted".to_string(),
    ))
}

/// Replace the session state with a decoded share blob.
pub async fn load_state_handler(
    request: Json<StandardRequest<LoadStateRequest>>,
    cookies: &CookieJar<'_>,
    registry: &State<SessionRegistry>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    let session = session_id(cookies);

    let snapshot = match share::deserialize_state(&request.data.state) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!("Rejecting malformed state blob: {:#}", e);
            return Err(Json(StandardErrorResponse::new(
                "Ce lien de bilan est invalide".to_string(),
                "INVALID_STATE_BLOB".to_string(),
                vec!["Vérifiez que le lien a été copié en entier".to_string()],
            )));
        }
    };

    let loaded = registry
        .with_wizard(session, |wizard| wizard.store_mut().load_snapshot(snapshot))
        .await;

    match loaded {
        Ok(()) => Ok(Json(ActionResponse::success(
            "Bilan restauré".to_string(),
            "state-loaded".to_string(),
        ))),
        Err(e) => {
            warn!("Rejecting shared state: {}", e);
            Err(Json(StandardErrorResponse::new(
                "Ce lien de bilan est invalide".to_string(),
                "INVALID_STATE_BLOB".to_string(),
                vec!["Vérifiez que le lien a été copié en entier".to_string()],
            )))
        }
    }
}

pub async fn set_notes_handler(
    request: Json<StandardRequest<NotesRequest>>,
    cookies: &CookieJar<'_>,
    registry: &State<SessionRegistry>,
) -> Json<ActionResponse> {
    let session = session_id(cookies);
    registry
        .with_wizard(session, |wizard| {
            wizard.set_notes(request.into_inner().data.notes)
        })
        .await;

    Json(ActionResponse::success(
        "Notes enregistrées".to_string(),
        "notes-saved".to_string(),
    ))
}

/// The shareable link for the current session state, usable even when email
/// dispatch is unavailable.
pub async fn results_link_handler(
    cookies: &CookieJar<'_>,
    registry: &State<SessionRegistry>,
    config: &State<AppConfig>,
) -> Result<Json<DataResponse<ResultsLinkView>>, Json<StandardErrorResponse>> {
    let session = session_id(cookies);
    let base_url = config.base_url.clone();
    let results_url = registry
        .with_wizard(session, |wizard| {
            share::results_url(&base_url, wizard.store().state())
        })
        .await;

    match results_url {
        Ok(results_url) => Ok(Json(DataResponse::success(
            "Lien de partage".to_string(),
            ResultsLinkView { results_url },
        ))),
        Err(e) => {
            error!("Failed to build results url: {:#}", e);
            Err(Json(StandardErrorResponse::new(
                "Impossible de générer le lien de partage".to_string(),
                "LINK_ERROR".to_string(),
                vec!["Réessayez dans quelques instants".to_string()],
            )))
        }
    }
}
