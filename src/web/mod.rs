// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use types::*;

use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::response::Redirect;
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Request, Response, State};
use tracing::info;

use crate::core::{ConfigManager, EmailClient, SessionRegistry};

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

// Page routes

#[get("/")]
pub async fn hub(
    cookies: &rocket::http::CookieJar<'_>,
    registry: &State<SessionRegistry>,
) -> Json<DataResponse<HubView>> {
    handlers::hub_handler(cookies, registry).await
}

#[get("/<topic>/<question>")]
pub async fn question_page(
    topic: &str,
    question: &str,
    cookies: &rocket::http::CookieJar<'_>,
    registry: &State<SessionRegistry>,
) -> Result<Json<DataResponse<QuestionView>>, Redirect> {
    handlers::question_page_handler(topic, question, cookies, registry).await
}

#[get("/summary?<state>")]
pub async fn summary_page(
    state: Option<String>,
    cookies: &rocket::http::CookieJar<'_>,
    registry: &State<SessionRegistry>,
    config: &State<AppConfig>,
) -> Json<DataResponse<SummaryView>> {
    handlers::summary_page_handler(state, cookies, registry, config).await
}

#[get("/summary/imprimer")]
pub async fn print_page(
    cookies: &rocket::http::CookieJar<'_>,
    registry: &State<SessionRegistry>,
) -> PrintResponse {
    handlers::print_page_handler(cookies, registry).await
}

// API routes

#[post("/answer", data = "<request>")]
pub async fn submit_answer(
    request: Json<StandardRequest<AnswerRequest>>,
    cookies: &rocket::http::CookieJar<'_>,
    registry: &State<SessionRegistry>,
) -> Result<Json<DataResponse<ScreenView>>, Json<StandardErrorResponse>> {
    handlers::submit_answer_handler(request, cookies, registry).await
}

#[post("/priority", data = "<request>")]
pub async fn set_priority(
    request: Json<StandardRequest<PriorityRequest>>,
    cookies: &rocket::http::CookieJar<'_>,
    registry: &State<SessionRegistry>,
) -> Json<ActionResponse> {
    handlers::set_priority_handler(request, cookies, registry).await
}

#[post("/restart")]
pub async fn restart(
    cookies: &rocket::http::CookieJar<'_>,
    registry: &State<SessionRegistry>,
) -> Json<ActionResponse> {
    handlers::restart_handler(cookies, registry).await
}

#[post("/state/load", data = "<request>")]
pub async fn load_state(
    request: Json<StandardRequest<LoadStateRequest>>,
    cookies: &rocket::http::CookieJar<'_>,
    registry: &State<SessionRegistry>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    handlers::load_state_handler(request, cookies, registry).await
}

#[post("/notes", data = "<request>")]
pub async fn set_notes(
    request: Json<StandardRequest<NotesRequest>>,
    cookies: &rocket::http::CookieJar<'_>,
    registry: &State<SessionRegistry>,
) -> Json<ActionResponse> {
    handlers::set_notes_handler(request, cookies, registry).await
}

#[get("/results-link")]
pub async fn results_link(
    cookies: &rocket::http::CookieJar<'_>,
    registry: &State<SessionRegistry>,
    config: &State<AppConfig>,
) -> Result<Json<DataResponse<ResultsLinkView>>, Json<StandardErrorResponse>> {
    handlers::results_link_handler(cookies, registry, config).await
}

#[post("/share", data = "<request>")]
pub async fn share_results(
    request: Json<StandardRequest<ShareEmailRequest>>,
    cookies: &rocket::http::CookieJar<'_>,
    registry: &State<SessionRegistry>,
    config: &State<AppConfig>,
    email: &State<EmailClient>,
) -> Result<Json<DataResponse<ShareResultView>>, Json<StandardErrorResponse>> {
    handlers::share_handler(request, cookies, registry, config, email).await
}

#[post("/fast-forward")]
pub async fn fast_forward(
    cookies: &rocket::http::CookieJar<'_>,
    registry: &State<SessionRegistry>,
) -> Result<Json<DataResponse<FastForwardView>>, Json<StandardErrorResponse>> {
    handlers::fast_forward_handler(cookies, registry).await
}

#[get("/health")]
pub async fn health() -> Json<TextResponse> {
    Json(TextResponse::success("OK".to_string()))
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers

#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request JSON format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
    ))
}

// Main server start function
pub async fn start_web_server(config: ConfigManager, port: u16) -> Result<()> {
    let app_config = AppConfig {
        base_url: config.environment.base_url.clone(),
        automation_mode: config.service.automation_mode,
    };
    let registry = SessionRegistry::new(config.service.automation_mode);
    let email_client = EmailClient::new(
        config.service.email_service_url.clone(),
        config.service.timeout_seconds,
    )?;

    info!("Starting self-assessment wizard API server");
    info!("Base url for shared links: {}", app_config.base_url);
    if app_config.automation_mode {
        info!("Automation mode is ON: the fast-forward endpoint is live");
    }

    let figment = rocket::Config::figment().merge(("port", port));

    rocket::custom(figment)
        .attach(Cors)
        .manage(app_config)
        .manage(registry)
        .manage(email_client)
        .register("/api", catchers![bad_request, internal_error])
        .mount("/", routes![hub, question_page, summary_page, print_page])
        .mount(
            "/api",
            routes![
                submit_answer,
                set_priority,
                restart,
                load_state,
                set_notes,
                results_link,
                share_results,
                fast_forward,
                health,
                options,
            ],
        )
        .launch()
        .await?;

    Ok(())
}
