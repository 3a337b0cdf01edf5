// src/web/types.rs
//! Wire types of the wizard API: the standard response envelope plus the
//! view models the front-end renders.

use rocket::http::ContentType;
use rocket::response::{self, Responder};
use rocket::serde::{Deserialize, Serialize};
use rocket::{Request, Response};

use crate::answer::{AnswerValue, TopicPriority};
use crate::catalog::{QuestionId, TopicId};
use crate::summary::SummaryRow;

/// Plain-text responder for the printable bilan.
pub struct PrintResponse {
    pub text: String,
}

impl PrintResponse {
    pub fn new(text: String) -> Self {
        Self { text }
    }
}

impl<'r> Responder<'r, 'static> for PrintResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        Response::build()
            .header(ContentType::Text)
            .sized_body(self.text.len(), std::io::Cursor::new(self.text))
            .ok()
    }
}

// Standard response envelope

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Text,
    Data,
    Action,
    Error,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TextResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ActionResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub action: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
}

impl TextResponse {
    pub fn success(message: String) -> Self {
        Self {
            response_type: ResponseType::Text,
            success: true,
            message,
        }
    }
}

impl<T> DataResponse<T> {
    pub fn success(message: String, data: T) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message,
            data,
        }
    }
}

impl ActionResponse {
    pub fn success(message: String, action: String) -> Self {
        Self {
            response_type: ResponseType::Action,
            success: true,
            message,
            action,
        }
    }
}

impl StandardErrorResponse {
    pub fn new(error: String, error_code: String, suggestions: Vec<String>) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            suggestions,
        }
    }
}

// Request types

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardRequest<T> {
    #[serde(flatten)]
    pub data: T,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct AnswerRequest {
    pub topic: TopicId,
    pub question: QuestionId,
    pub value: AnswerValue,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct PriorityRequest {
    pub topic: TopicId,
    pub priority: TopicPriority,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct LoadStateRequest {
    pub state: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct NotesRequest {
    pub notes: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ShareEmailRequest {
    pub user_email: String,
    pub counselor_email: Option<String>,
    pub counselor_name: Option<String>,
}

// View models

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TopicCardView {
    pub topic: TopicId,
    pub title: &'static str,
    pub color: &'static str,
    pub url: String,
    pub complete: bool,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct HubView {
    pub topics: Vec<TopicCardView>,
    /// The "I'm done exploring" action shows once any topic is complete.
    pub is_next_button_shown: bool,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ChoiceView {
    pub value: AnswerValue,
    pub icon: &'static str,
    pub label: &'static str,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct QuestionView {
    pub topic: TopicId,
    pub topic_title: &'static str,
    pub topic_color: &'static str,
    pub question: QuestionId,
    pub prompt: &'static str,
    pub choices: Vec<ChoiceView>,
    /// 0-based step within the topic.
    pub step_index: usize,
    pub step_count: usize,
    pub next_url: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ScreenKind {
    Hub,
    Question,
    Summary,
}

/// Where the wizard landed after a transition.
#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ScreenView {
    pub screen: ScreenKind,
    pub url: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct SummaryView {
    pub rows: Vec<SummaryRow>,
    pub notes: String,
    pub results_url: String,
    /// True when this view was rendered from a shared state blob.
    pub shared: bool,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ResultsLinkView {
    pub results_url: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ShareResultView {
    pub emailed_user: bool,
    pub emailed_counselor: Option<bool>,
    /// One message per requested recipient that could not be reached.
    pub failures: Vec<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct FastForwardView {
    pub outcome: String,
    pub screen: ScreenView,
}

/// Server-wide settings shared with handlers via rocket's managed state.
pub struct AppConfig {
    pub base_url: String,
    pub automation_mode: bool,
}
