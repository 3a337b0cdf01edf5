// src/core/config_manager.rs
//! Unified configuration management: one config.yaml with per-environment
//! sections, selected by environment variable.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: EnvironmentConfig,
    pub service: ServiceConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentConfig {
    /// Public base url embedded in shared results links.
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Email-dispatch backend. `EMAIL_SERVICE_URL` overrides it.
    pub email_service_url: String,
    pub timeout_seconds: u64,
    /// Enables the fast-forward demo endpoint. Off in production.
    #[serde(default)]
    pub automation_mode: bool,
}

#[derive(Debug, Deserialize)]
struct ConfigSection {
    environment: EnvironmentConfig,
    service: ServiceConfig,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: ConfigSection,
    production: ConfigSection,
}

impl ConfigManager {
    /// Load the section matching the current environment from config.yaml.
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        let config_path = PathBuf::from("config.yaml");
        if !config_path.exists() {
            anyhow::bail!(
                "config.yaml not found in current directory. Server cannot start without configuration."
            );
        }

        let config_content =
            std::fs::read_to_string(&config_path).context("Failed to read config.yaml")?;
        let config_file: ConfigFile =
            serde_yaml::from_str(&config_content).context("Failed to parse config.yaml")?;

        let section = match environment.as_str() {
            "production" => config_file.production,
            _ => config_file.local,
        };

        let service = ServiceConfig {
            email_service_url: std::env::var("EMAIL_SERVICE_URL")
                .unwrap_or(section.service.email_service_url),
            ..section.service
        };

        Ok(Self {
            environment: section.environment,
            service,
        })
    }

    fn get_environment() -> String {
        std::env::var("MINICOACH_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .or_else(|_| std::env::var("ENV"))
            .unwrap_or_else(|_| "local".to_string())
    }
}
