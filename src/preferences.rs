//! 사용자 설정 (표시 언어) 영속화

use crate::error::LunaError;
use crate::history::SharedStore;
use crate::models::Language;

/// 표시 언어 저장 키
pub const LANGUAGE_KEY: &str = "display-language";

/// 저장된 표시 언어. 없거나 읽기에 실패하면 기본값(중국어).
pub fn load_language(store: &SharedStore) -> Language {
    let stored = store
        .lock()
        .map_err(LunaError::lock)
        .and_then(|guard| guard.get(LANGUAGE_KEY));

    match stored {
        Ok(Some(code)) => Language::from_code(&code).unwrap_or_default(),
        Ok(None) => Language::default(),
        Err(e) => {
            log::warn!("[Preferences] Failed to read display language: {}", e);
            Language::default()
        }
    }
}

pub fn save_language(store: &SharedStore, language: Language) -> Result<(), LunaError> {
    let mut guard = store.lock().map_err(LunaError::lock)?;
    guard.set(LANGUAGE_KEY, language.code())
}
