//! History Commands
//!
//! 지난 리딩 목록 오버레이

use tauri::State;

use crate::error::CommandResult;
use crate::session::ReadingSession;
use crate::view::SessionSnapshot;

#[tauri::command]
pub fn open_history(session: State<'_, ReadingSession>) -> CommandResult<SessionSnapshot> {
    Ok(session.open_history()?)
}

#[tauri::command]
pub fn close_history(session: State<'_, ReadingSession>) -> CommandResult<SessionSnapshot> {
    Ok(session.close_history()?)
}

/// 히스토리 항목을 결과 화면으로 열기
#[tauri::command]
pub fn open_history_record(id: String, session: State<'_, ReadingSession>) -> CommandResult<SessionSnapshot> {
    Ok(session.open_history_record(&id)?)
}

/// 전체 삭제 (되돌릴 수 없음)
#[tauri::command]
pub fn clear_history(session: State<'_, ReadingSession>) -> CommandResult<SessionSnapshot> {
    Ok(session.clear_history()?)
}
