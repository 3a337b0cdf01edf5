// src/core/email_client.rs
//! Client for the email-dispatch backend: sends the results link to the user
//! and optionally to their counselor.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

const SEND_RESULTS_ENDPOINT: &str = "/send-results";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Payload accepted by the dispatch backend.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRequest {
    pub user_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counselor_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counselor_name: Option<String>,
    pub results_url: String,
}

/// Which recipients the backend actually reached. The two flags are
/// independent: one email can succeed while the other fails.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareOutcome {
    pub has_user_email: bool,
    pub has_counselor_email: bool,
}

impl ShareOutcome {
    /// One user-facing failure message per recipient that was requested but
    /// not reached. An empty list means everything requested went through.
    pub fn failure_messages(&self, counselor_requested: bool) -> Vec<String> {
        let mut messages = Vec::new();
        if !self.has_user_email {
            messages.push("Impossible d'envoyer le lien sur votre adresse email.".to_string());
        }
        if counselor_requested && !self.has_counselor_email {
            messages
                .push("Impossible d'envoyer le lien à votre conseiller.".to_string());
        }
        messages
    }
}

pub struct EmailClient {
    client: reqwest::Client,
    base_url: String,
}

impl EmailClient {
    pub fn new(base_url: String, timeout_seconds: u64) -> Result<Self> {
        let timeout = if timeout_seconds == 0 {
            DEFAULT_TIMEOUT_SECS
        } else {
            timeout_seconds
        };
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, base_url })
    }

    /// Fire the dispatch request. A transport or server failure is an error;
    /// per-recipient outcomes come back in [`ShareOutcome`].
    pub async fn send_results_link(&self, request: &ShareRequest) -> Result<ShareOutcome> {
        let url = format!("{}{}", self.base_url, SEND_RESULTS_ENDPOINT);

        info!("Calling email dispatch service: {}", url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .context("Failed to call email dispatch service")?;

        let status = response.status();
        if status.is_success() {
            let outcome: ShareOutcome = response
                .json()
                .await
                .context("Failed to parse email dispatch response")?;
            Ok(outcome)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            error!("Email dispatch error response: {}", error_text);
            anyhow::bail!("Email service returned status {}: {}", status, error_text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_wire_format() {
        let outcome: ShareOutcome =
            serde_json::from_str(r#"{"hasUserEmail":false,"hasCounselorEmail":true}"#).unwrap();
        assert!(!outcome.has_user_email);
        assert!(outcome.has_counselor_email);
    }

    #[test]
    fn test_partial_failure_messages() {
        // Scenario: email to self failed, counselor email went through —
        // one message about the user's address, nothing about the counselor
        let outcome = ShareOutcome {
            has_user_email: false,
            has_counselor_email: true,
        };
        let messages = outcome.failure_messages(true);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("votre adresse email"));

        let outcome = ShareOutcome {
            has_user_email: true,
            has_counselor_email: false,
        };
        assert_eq!(outcome.failure_messages(true).len(), 1);
        // no counselor was requested: their flag is irrelevant
        assert!(outcome.failure_messages(false).is_empty());

        let outcome = ShareOutcome {
            has_user_email: true,
            has_counselor_email: true,
        };
        assert!(outcome.failure_messages(true).is_empty());
    }

    #[test]
    fn test_request_skips_absent_counselor() {
        let request = ShareRequest {
            user_email: "moi@example.org".to_string(),
            counselor_email: None,
            counselor_name: None,
            results_url: "https://coach.example.org/summary#%7B%7D".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["userEmail"], "moi@example.org");
        assert_eq!(json["resultsUrl"], "https://coach.example.org/summary#%7B%7D");
        assert!(json.get("counselorEmail").is_none());
        assert!(json.get("counselorName").is_none());
    }
}
