// src/web/handlers/mod.rs

pub mod hub_handlers;
pub mod question_handlers;
pub mod share_handlers;
pub mod summary_handlers;

pub use hub_handlers::*;
pub use question_handlers::*;
pub use share_handlers::*;
pub use summary_handlers::*;

use rocket::http::{Cookie, CookieJar};
use uuid::Uuid;

use crate::catalog::QuestionCatalog;
use crate::web::types::{ScreenKind, ScreenView};
use crate::wizard::WizardScreen;

pub(crate) const SESSION_COOKIE: &str = "minicoach_session";

/// The browser session id, minted on first contact and carried in a cookie.
pub(crate) fn session_id(cookies: &CookieJar<'_>) -> Uuid {
    if let Some(cookie) = cookies.get(SESSION_COOKIE) {
        if let Ok(id) = Uuid::parse_str(cookie.value()) {
            return id;
        }
    }
    let id = Uuid::new_v4();
    cookies.add(Cookie::new(SESSION_COOKIE, id.to_string()));
    id
}

pub(crate) fn screen_view(catalog: &QuestionCatalog, screen: WizardScreen) -> ScreenView {
    match screen {
        WizardScreen::Hub => ScreenView {
            screen: ScreenKind::Hub,
            url: "/".to_string(),
        },
        WizardScreen::Question { topic, question } => ScreenView {
            screen: ScreenKind::Question,
            url: catalog
                .question(topic, question)
                .map(|q| q.url.clone())
                .unwrap_or_else(|| "/".to_string()),
        },
        WizardScreen::Summary => ScreenView {
            screen: ScreenKind::Summary,
            url: "/summary".to_string(),
        },
    }
}
