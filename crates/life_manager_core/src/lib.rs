//! Core domain logic for the life manager.
//! Tasks, habits, the PDF library and accounts over one SQLite file.

pub mod ai;
pub mod app;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod pdf;
pub mod repo;
pub mod service;

pub use app::{BootstrapError, LifeManager};
pub use config::{AiConfig, AppConfig, ConfigError};
pub use db::{Database, DbError, DbResult, ExecOutcome};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::book::{Book, Note};
pub use model::habit::{Frequency, Habit};
pub use model::task::{Task, TaskStatus};
pub use model::task_preset::{TaskPreset, UnknownTaskPreset};
pub use model::user::User;
pub use notify::{NotificationCenter, NotificationHub, Subscriber};
pub use repo::{ConstraintKind, RepoError, RepoResult};
pub use service::auth_service::{AuthError, AuthService, Session};
pub use service::calendar_service::{CalendarDay, CalendarError, CalendarService};
pub use service::habit_service::{HabitService, HabitServiceError};
pub use service::library_service::{LibraryError, LibraryService};
pub use service::task_service::{
    SortField, SortOrder, TaskQuery, TaskService, TaskServiceError, TaskStatistics,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
