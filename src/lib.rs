//! Self-assessment wizard for a job-search coaching application: a fixed
//! catalog of topics and questions, a validating answer store, a linear
//! wizard state machine, a priority-sorted bilan, and URL-embedded state
//! sharing with email dispatch.

pub mod answer;
pub mod catalog;
pub mod core;
pub mod demo;
pub mod share;
pub mod store;
pub mod summary;
pub mod web;
pub mod wizard;

pub use crate::core::ConfigManager;
pub use crate::web::start_web_server;
