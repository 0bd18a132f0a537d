//! Mystic Luna Error Types
//!
//! 애플리케이션 전역 에러 타입 정의

use serde::Serialize;
use thiserror::Error;

/// Mystic Luna 애플리케이션 에러
#[derive(Error, Debug)]
pub enum LunaError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Lock error: {0}")]
    Lock(String),

    #[error("History record not found: {0}")]
    RecordNotFound(String),
}

impl LunaError {
    /// Mutex poison 에러를 LunaError로 변환
    pub fn lock<T>(err: std::sync::PoisonError<T>) -> Self {
        LunaError::Lock(err.to_string())
    }
}

/// Tauri 명령 응답용 직렬화 가능한 에러
#[derive(Debug, Serialize)]
pub struct CommandError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl From<LunaError> for CommandError {
    fn from(error: LunaError) -> Self {
        let code = match &error {
            LunaError::Database(_) => "DB_ERROR",
            LunaError::Serialization(_) => "SERIALIZATION_ERROR",
            LunaError::Http(_) => "HTTP_ERROR",
            LunaError::Gateway(_) => "GATEWAY_ERROR",
            LunaError::Config(_) => "CONFIG_ERROR",
            LunaError::Lock(_) => "LOCK_ERROR",
            LunaError::RecordNotFound(_) => "RECORD_NOT_FOUND",
        };

        CommandError {
            code: code.to_string(),
            message: error.to_string(),
            details: None,
        }
    }
}

/// Tauri 명령 결과 타입
pub type CommandResult<T> = Result<T, CommandError>;
