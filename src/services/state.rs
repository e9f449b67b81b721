use std::sync::{Arc, Mutex};

use crate::db::Database;
use crate::error::AppError;
use crate::services::gateway::{Gateway, Provider};

/// Configured gateway clients. Gemini is always present; OpenAI only when
/// its key was supplied at startup.
pub struct Gateways {
    pub gemini: Arc<dyn Gateway>,
    pub openai: Option<Arc<dyn Gateway>>,
}

impl Gateways {
    pub fn select(&self, provider: Provider) -> Result<&dyn Gateway, AppError> {
        match provider {
            Provider::Gemini => Ok(self.gemini.as_ref()),
            Provider::OpenAi => self
                .openai
                .as_deref()
                .ok_or(AppError::ProviderNotConfigured("openai")),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Database>>,
    pub gateways: Arc<Gateways>,
}

impl AppState {
    pub fn new(db: Database, gateways: Gateways) -> Self {
        AppState {
            db: Arc::new(Mutex::new(db)),
            gateways: Arc::new(gateways),
        }
    }
}
