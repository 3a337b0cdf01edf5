// src/core/sessions.rs
//! In-memory wizard registry, one wizard per browser session. All mutations
//! for a session go through the registry lock, so store writes stay serial.

use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::store::SurveyStore;
use crate::wizard::Wizard;

pub struct SessionRegistry {
    automation: bool,
    wizards: RwLock<HashMap<Uuid, Wizard>>,
}

impl SessionRegistry {
    pub fn new(automation: bool) -> Self {
        Self {
            automation,
            wizards: RwLock::new(HashMap::new()),
        }
    }

    /// Run `f` against the session's wizard, creating a fresh one on first
    /// contact.
    pub async fn with_wizard<T>(&self, session: Uuid, f: impl FnOnce(&mut Wizard) -> T) -> T {
        let mut wizards = self.wizards.write().await;
        let wizard = wizards
            .entry(session)
            .or_insert_with(|| Wizard::with_automation(SurveyStore::new(), self.automation));
        f(wizard)
    }

    pub async fn session_count(&self) -> usize {
        self.wizards.read().await.len()
    }
}
