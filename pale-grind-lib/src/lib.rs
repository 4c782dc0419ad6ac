// src/lib.rs
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

// --- Declare modules ---
mod catalog;
mod clock;
mod completion;
mod config;
pub mod gateway;
mod session;
mod stats;
mod tip;

// --- Expose public types ---
pub use catalog::{
    Catalog, Difficulty, Error as CatalogError, Exercise, ExerciseKey, Reps, Section,
};
pub use clock::{
    format_clock, Celebration, ClockStatus, RestClock, Ticker, WorkoutClock,
    DEFAULT_REST_SECONDS, TICK,
};
pub use completion::{completion_percentage, CompletionTracker, SetCursor};
pub use config::{
    get_config_dir as get_config_dir_util,
    get_config_path as get_config_path_util,
    load as load_config_util,
    parse_color,
    save as save_config_util,
    store_api_key as store_api_key_util,
    Config,
    Error as ConfigError,
    StandardColor,
    Theme,
    DEFAULT_API_BASE_URL,
    DEFAULT_MODEL,
};
pub use gateway::{Error as GatewayError, GeminiClient, TextGenerator};
pub use session::{SessionSettings, WorkoutSession};
pub use stats::{SectionProgress, SessionStats};
pub use tip::{tip_prompt, TipFailure, TipRequest, TipSession, TipState};

/// Start-up wiring: configuration, catalog and (optional) text generation gateway.
pub struct AppService {
    pub config: Config,
    pub config_path: PathBuf,
    pub catalog: Arc<Catalog>,
    gateway: Option<Arc<dyn TextGenerator>>,
}

impl AppService {
    /// Initializes the application service.
    /// # Errors
    /// Returns `anyhow::Error` if config path determination, loading, or catalog loading fails.
    pub fn initialize() -> Result<Self> {
        let config_path =
            config::get_config_path().context("Failed to determine configuration file path")?;
        let config = config::load(&config_path)
            .with_context(|| format!("Failed to load config from {config_path:?}"))?;

        let catalog = match &config.catalog_path {
            Some(path) => {
                info!("Loading exercise catalog from {:?}", path);
                Catalog::load(path)
                    .with_context(|| format!("Failed to load exercise catalog from {path:?}"))?
            }
            None => Catalog::builtin(),
        };

        let gateway = Self::build_gateway(&config)?;

        Ok(Self::from_parts(config, config_path, catalog, gateway))
    }

    /// Assembles a service from already loaded pieces.
    pub fn from_parts(
        config: Config,
        config_path: PathBuf,
        catalog: Catalog,
        gateway: Option<Arc<dyn TextGenerator>>,
    ) -> Self {
        Self {
            config,
            config_path,
            catalog: Arc::new(catalog),
            gateway,
        }
    }

    /// Builds the Gemini client if an API key resolves; `None` disables tips.
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn build_gateway(config: &Config) -> Result<Option<Arc<dyn TextGenerator>>> {
        let Some(api_key) = config.resolved_api_key() else {
            warn!("API key not set. Exercise tips feature will be disabled.");
            return Ok(None);
        };
        let client = GeminiClient::new(
            &config.api_base_url,
            &config.model,
            api_key,
            Duration::from_secs(config.request_timeout_secs),
        )
        .context("Failed to initialize text generation client")?;
        info!("Exercise tips enabled using model {}", config.model);
        let gateway: Arc<dyn TextGenerator> = Arc::new(client);
        Ok(Some(gateway))
    }

    pub fn gateway(&self) -> Option<Arc<dyn TextGenerator>> {
        self.gateway.clone()
    }

    pub fn tips_available(&self) -> bool {
        self.gateway.is_some()
    }

    /// A fresh session over this service's catalog and settings.
    /// # Errors
    /// Returns `ConfigError::InvalidRestDuration` for unusable rest settings.
    pub fn new_session(&self) -> Result<WorkoutSession, ConfigError> {
        Ok(
            WorkoutSession::new(Arc::clone(&self.catalog), self.config.session_settings()?)
                .with_tips_available(self.tips_available()),
        )
    }

    /// Runs one tip request to completion on the calling thread.
    /// Returns the request that was issued, if any.
    pub fn fetch_tip_blocking(
        &self,
        session: &mut WorkoutSession,
        exercise: &str,
    ) -> Option<TipRequest> {
        let request = session.request_tip(exercise)?;
        if let Some(gateway) = &self.gateway {
            let result = gateway.generate(&request.prompt);
            session.resolve_tip(&request, result);
        }
        Some(request)
    }
}
