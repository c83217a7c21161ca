use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NotInitialized,
    NoActiveList,
    ListNotFound,
    ListNameConflict,
    TaskNotFound,
    AmbiguousRef,
    ValidationError,
    DatabaseError,
    ConfigError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::NoActiveList => "NO_ACTIVE_LIST",
            Self::ListNotFound => "LIST_NOT_FOUND",
            Self::ListNameConflict => "LIST_NAME_CONFLICT",
            Self::TaskNotFound => "TASK_NOT_FOUND",
            Self::AmbiguousRef => "AMBIGUOUS_REF",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct TodoError {
    pub code: ErrorCode,
    pub message: String,
}

impl TodoError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_initialized() -> Self {
        Self::new(
            ErrorCode::NotInitialized,
            "better-todo is not initialized. Run `better-todo init` first.",
        )
    }

    pub fn no_active_list() -> Self {
        Self::new(
            ErrorCode::NoActiveList,
            "No active list. Use `better-todo list activate <name>` or `--list <name>`.",
        )
    }

    pub fn list_not_found(reference: &str) -> Self {
        Self::new(
            ErrorCode::ListNotFound,
            format!("List not found: {reference}"),
        )
    }

    pub fn list_name_conflict(name: &str) -> Self {
        Self::new(
            ErrorCode::ListNameConflict,
            format!("List with name '{name}' already exists"),
        )
    }

    pub fn task_not_found(reference: &str) -> Self {
        Self::new(
            ErrorCode::TaskNotFound,
            format!("Task not found: {reference}"),
        )
    }

    pub fn ambiguous_ref(reference: &str, candidates: &[String]) -> Self {
        Self::new(
            ErrorCode::AmbiguousRef,
            format!(
                "Ambiguous reference '{}'. Candidates: {}",
                reference,
                candidates.join(", ")
            ),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }
}

impl From<rusqlite::Error> for TodoError {
    fn from(e: rusqlite::Error) -> Self {
        Self::database(e.to_string())
    }
}

impl From<serde_json::Error> for TodoError {
    fn from(e: serde_json::Error) -> Self {
        Self::config(e.to_string())
    }
}

impl From<std::io::Error> for TodoError {
    fn from(e: std::io::Error) -> Self {
        Self::database(e.to_string())
    }
}
