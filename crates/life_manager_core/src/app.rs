//! Application bootstrap: database init plus service wiring.

use crate::ai::{AiError, OllamaClient, SuggestionService};
use crate::config::AppConfig;
use crate::db::{DbError, Database};
use crate::service::auth_service::{AuthService, Session};
use crate::service::calendar_service::CalendarService;
use crate::service::habit_service::HabitService;
use crate::service::library_service::LibraryService;
use crate::service::task_service::TaskService;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum BootstrapError {
    /// Schema creation failed; the application must not start.
    Database(DbError),
    Ai(AiError),
}

impl Display for BootstrapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Database(err) => write!(f, "database initialization failed: {err}"),
            Self::Ai(err) => write!(f, "suggestion client setup failed: {err}"),
        }
    }
}

impl Error for BootstrapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Database(err) => Some(err),
            Self::Ai(err) => Some(err),
        }
    }
}

impl From<DbError> for BootstrapError {
    fn from(value: DbError) -> Self {
        Self::Database(value)
    }
}

impl From<AiError> for BootstrapError {
    fn from(value: AiError) -> Self {
        Self::Ai(value)
    }
}

/// Wired services over one database file, plus the login session.
pub struct LifeManager {
    pub config: AppConfig,
    pub session: Session,
    pub auth: AuthService,
    pub tasks: TaskService,
    pub habits: HabitService,
    pub calendar: CalendarService,
    pub library: LibraryService,
    pub suggestions: SuggestionService<OllamaClient>,
}

impl LifeManager {
    /// Creates the schema, then builds every service against `config`.
    pub fn bootstrap(config: AppConfig) -> Result<Self, BootstrapError> {
        Database::new(&config.db_path)
            .initialize()
            .inspect_err(|err| {
                error!(
                    "event=bootstrap module=app status=error stage=db_init path={} error={}",
                    config.db_path.display(),
                    err
                )
            })?;

        let client = OllamaClient::new(config.ai.base_url(), &config.ai.model, config.ai.timeout())?;
        let db = || Database::new(&config.db_path);
        let manager = Self {
            session: Session::new(),
            auth: AuthService::new(db()),
            tasks: TaskService::new(db()),
            habits: HabitService::new(db()),
            calendar: CalendarService::new(db()),
            library: LibraryService::new(db()),
            suggestions: SuggestionService::new(client),
            config: config.clone(),
        };
        info!(
            "event=bootstrap module=app status=ok path={}",
            manager.config.db_path.display()
        );
        Ok(manager)
    }
}
