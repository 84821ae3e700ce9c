//! Core use-case services.
//!
//! # Responsibility
//! - Apply business rules on top of repositories.
//! - Run every public operation inside one explicit unit of work.
//! - Keep presentation layers decoupled from storage details.

pub mod auth_service;
pub mod calendar_service;
pub mod habit_service;
pub mod library_service;
pub mod task_service;
