//! Reading Commands
//!
//! 질문 제출부터 카드 공개까지의 리딩 흐름

use tauri::State;

use crate::error::CommandResult;
use crate::session::ReadingSession;
use crate::view::SessionSnapshot;

/// 현재 화면 상태 조회
#[tauri::command]
pub fn get_session(session: State<'_, ReadingSession>) -> CommandResult<SessionSnapshot> {
    Ok(session.snapshot()?)
}

#[tauri::command]
pub fn set_question(text: String, session: State<'_, ReadingSession>) -> CommandResult<SessionSnapshot> {
    Ok(session.set_question(&text)?)
}

/// 질문 제출 (샘플 질문은 `question`으로 전달)
///
/// 응답이 올 때까지 대기하며, 그 사이 `cancel_request`로 취소할 수 있습니다.
#[tauri::command]
pub async fn submit_question(
    question: Option<String>,
    session: State<'_, ReadingSession>,
) -> CommandResult<SessionSnapshot> {
    Ok(session.submit(question).await?)
}

#[tauri::command]
pub fn cancel_request(session: State<'_, ReadingSession>) -> CommandResult<SessionSnapshot> {
    Ok(session.cancel()?)
}

#[tauri::command]
pub fn pick_card(slot: usize, session: State<'_, ReadingSession>) -> CommandResult<SessionSnapshot> {
    Ok(session.pick(slot)?)
}

#[tauri::command]
pub fn unpick_card(slot: usize, session: State<'_, ReadingSession>) -> CommandResult<SessionSnapshot> {
    Ok(session.unpick(slot)?)
}

#[tauri::command]
pub fn clear_selection(session: State<'_, ReadingSession>) -> CommandResult<SessionSnapshot> {
    Ok(session.clear_selection()?)
}

/// 카드 공개 및 히스토리 기록
#[tauri::command]
pub fn finalize_reading(session: State<'_, ReadingSession>) -> CommandResult<SessionSnapshot> {
    Ok(session.finalize()?)
}

#[tauri::command]
pub fn go_back(session: State<'_, ReadingSession>) -> CommandResult<SessionSnapshot> {
    Ok(session.back()?)
}

#[tauri::command]
pub fn ask_new(session: State<'_, ReadingSession>) -> CommandResult<SessionSnapshot> {
    Ok(session.ask_new()?)
}

#[tauri::command]
pub fn deepen_query(session: State<'_, ReadingSession>) -> CommandResult<SessionSnapshot> {
    Ok(session.deepen()?)
}

#[tauri::command]
pub fn open_rules(session: State<'_, ReadingSession>) -> CommandResult<SessionSnapshot> {
    Ok(session.open_rules()?)
}

#[tauri::command]
pub fn close_rules(session: State<'_, ReadingSession>) -> CommandResult<SessionSnapshot> {
    Ok(session.close_rules()?)
}
