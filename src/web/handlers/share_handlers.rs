// src/web/handlers/share_handlers.rs

use rocket::http::CookieJar;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

use crate::core::email_client::ShareRequest;
use crate::core::{EmailClient, SessionRegistry};
use crate::share;
use crate::web::handlers::session_id;
use crate::web::types::{
    AppConfig, DataResponse, ShareEmailRequest, ShareResultView, StandardErrorResponse,
    StandardRequest,
};

/// Email the results link to the user and, optionally, their counselor. The
/// two recipients succeed or fail independently; a transport failure leaves
/// the local state and the printable bilan untouched.
pub async fn share_handler(
    request: Json<StandardRequest<ShareEmailRequest>>,
    cookies: &CookieJar<'_>,
    registry: &State<SessionRegistry>,
    config: &State<AppConfig>,
    email: &State<EmailClient>,
) -> Result<Json<DataResponse<ShareResultView>>, Json<StandardErrorResponse>> {
    let session = session_id(cookies);
    let ShareEmailRequest {
        user_email,
        counselor_email,
        counselor_name,
    } = request.into_inner().data;

    let base_url = config.base_url.clone();
    let results_url = registry
        .with_wizard(session, |wizard| {
            share::results_url(&base_url, wizard.store().state())
        })
        .await;

    let results_url = match results_url {
        Ok(url) => url,
        Err(e) => {
            error!("Failed to build results url: {:#}", e);
            return Err(Json(StandardErrorResponse::new(
                "Impossible de générer le lien de partage".to_string(),
                "LINK_ERROR".to_string(),
                vec!["Réessayez dans quelques instants".to_string()],
            )));
        }
    };

    let counselor_requested = counselor_email.is_some();
    let dispatch = ShareRequest {
        user_email,
        counselor_email,
        counselor_name,
        results_url,
    };

    match email.send_results_link(&dispatch).await {
        Ok(outcome) => {
            info!(
                "Share dispatch done: user={}, counselor={}",
                outcome.has_user_email, outcome.has_counselor_email
            );
            let view = ShareResultView {
                emailed_user: outcome.has_user_email,
                emailed_counselor: counselor_requested.then_some(outcome.has_counselor_email),
                failures: outcome.failure_messages(counselor_requested),
            };
            let message = if view.failures.is_empty() {
                "Votre bilan a été envoyé".to_string()
            } else {
                view.failures.join(" ")
            };
            Ok(Json(DataResponse::success(message, view)))
        }
        Err(e) => {
            error!("Email dispatch failed: {:#}", e);
            Err(Json(StandardErrorResponse::new(
                "L'envoi du bilan par email a échoué".to_string(),
                "EMAIL_DISPATCH_ERROR".to_string(),
                vec![
                    "Réessayez dans quelques instants".to_string(),
                    "Vous pouvez toujours imprimer votre bilan depuis /summary/imprimer"
                        .to_string(),
                ],
            )))
        }
    }
}
