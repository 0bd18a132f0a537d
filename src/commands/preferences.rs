//! Preference Commands

use tauri::State;

use crate::error::{CommandError, CommandResult};
use crate::models::Language;
use crate::session::ReadingSession;
use crate::view::i18n::{strings, UiStrings};
use crate::view::SessionSnapshot;

#[tauri::command]
pub fn toggle_language(session: State<'_, ReadingSession>) -> CommandResult<SessionSnapshot> {
    Ok(session.toggle_language()?)
}

/// 언어 코드("en" / "zh")로 표시 언어 지정
#[tauri::command]
pub fn set_language(language: String, session: State<'_, ReadingSession>) -> CommandResult<SessionSnapshot> {
    let language = Language::from_code(&language).ok_or_else(|| CommandError {
        code: "INVALID_LANGUAGE".to_string(),
        message: format!("Unsupported language: {}", language),
        details: None,
    })?;
    Ok(session.set_language(language)?)
}

/// 언어별 UI 문구
#[tauri::command]
pub fn get_ui_strings(language: String) -> CommandResult<&'static UiStrings> {
    let language = Language::from_code(&language).unwrap_or_default();
    Ok(strings(language))
}
