//! Reading Session Controller
//!
//! 상태 머신, 히스토리, 설정, Gateway를 묶어 사용자 동작을 처리하고
//! 매 동작 후 화면 스냅샷을 돌려줍니다.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::LunaError;
use crate::gateway::ReadingGateway;
use crate::history::{HistoryStore, SharedStore};
use crate::models::Language;
use crate::preferences::{load_language, save_language};
use crate::session::state::{Resolution, SessionState};
use crate::view::SessionSnapshot;

pub struct ReadingSession {
    gateway: Arc<dyn ReadingGateway>,
    state: Mutex<SessionState>,
    history: Mutex<HistoryStore>,
    store: SharedStore,
}

impl ReadingSession {
    /// 저장된 히스토리와 표시 언어를 불러와 세션 생성
    pub fn new(gateway: Arc<dyn ReadingGateway>, store: SharedStore) -> Result<Self, LunaError> {
        let language = load_language(&store);
        let history = HistoryStore::load(store.clone())?;
        log::info!("[Session] Ready (language: {})", language.code());

        Ok(Self {
            gateway,
            state: Mutex::new(SessionState::new(language)),
            history: Mutex::new(history),
            store,
        })
    }

    fn state(&self) -> Result<MutexGuard<'_, SessionState>, LunaError> {
        self.state.lock().map_err(LunaError::lock)
    }

    fn history(&self) -> Result<MutexGuard<'_, HistoryStore>, LunaError> {
        self.history.lock().map_err(LunaError::lock)
    }

    fn snapshot_of(&self, state: &SessionState) -> Result<SessionSnapshot, LunaError> {
        let summaries = self.history()?.summaries();
        Ok(SessionSnapshot::build(state, summaries))
    }

    /// 상태를 변경하는 동기 동작 공통 처리
    fn apply<F>(&self, f: F) -> Result<SessionSnapshot, LunaError>
    where
        F: FnOnce(&mut SessionState),
    {
        let mut state = self.state()?;
        f(&mut state);
        self.snapshot_of(&state)
    }

    pub fn snapshot(&self) -> Result<SessionSnapshot, LunaError> {
        let state = self.state()?;
        self.snapshot_of(&state)
    }

    // ------------------------------------------------------------------
    // Question / request
    // ------------------------------------------------------------------

    pub fn set_question(&self, text: &str) -> Result<SessionSnapshot, LunaError> {
        self.apply(|state| {
            state.set_question_input(text);
        })
    }

    /// 질문 제출 후 Gateway 응답까지 대기
    ///
    /// 이미 요청 중이거나 질문이 비어있으면 아무것도 하지 않습니다.
    /// 대기 중에는 상태 잠금을 잡지 않으므로 취소가 가능합니다.
    pub async fn submit(&self, question: Option<String>) -> Result<SessionSnapshot, LunaError> {
        let pending = {
            let mut state = self.state()?;
            match state.begin_request(question.as_deref()) {
                Some(pending) => pending,
                None => return self.snapshot_of(&state),
            }
        };

        log::info!("[Session] Requesting reading ({})", pending.language.code());
        let reading = self.gateway.request_reading(&pending.question, pending.language).await;

        let mut state = self.state()?;
        match state.resolve(pending.ticket, reading) {
            Resolution::Ignored => log::info!("[Session] Discarded stale reading"),
            Resolution::Refused(reason) => log::info!("[Session] Reading refused: {}", reason),
            Resolution::Picking { card_count } => log::info!("[Session] Spread ready: {} cards", card_count),
        }
        self.snapshot_of(&state)
    }

    pub fn cancel(&self) -> Result<SessionSnapshot, LunaError> {
        self.apply(|state| {
            if state.cancel() {
                log::info!("[Session] Request cancelled");
            }
        })
    }

    // ------------------------------------------------------------------
    // Picking
    // ------------------------------------------------------------------

    pub fn pick(&self, slot: usize) -> Result<SessionSnapshot, LunaError> {
        self.apply(|state| {
            state.pick(slot);
        })
    }

    pub fn unpick(&self, slot: usize) -> Result<SessionSnapshot, LunaError> {
        self.apply(|state| {
            state.unpick(slot);
        })
    }

    pub fn clear_selection(&self) -> Result<SessionSnapshot, LunaError> {
        self.apply(|state| {
            state.clear_selection();
        })
    }

    /// 카드 공개. 레코드를 히스토리 맨 앞에 추가합니다.
    ///
    /// 저장 실패는 로그만 남기고 화면 흐름은 계속됩니다.
    pub fn finalize(&self) -> Result<SessionSnapshot, LunaError> {
        let mut state = self.state()?;
        // 상태 전이 전에 히스토리 잠금을 먼저 확보 (전이 후 실패하면 레코드가 유실됨)
        let mut history = self.history()?;
        let id = uuid::Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().timestamp_millis();

        if let Some(record) = state.finalize(id, created_at) {
            log::info!("[Session] Finalized reading {}", record.id);
            if let Err(e) = history.append(record) {
                log::warn!("[Session] Reading kept in memory only: {}", e);
            }
        }
        let summaries = history.summaries();
        drop(history);
        Ok(SessionSnapshot::build(&state, summaries))
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn back(&self) -> Result<SessionSnapshot, LunaError> {
        self.apply(|state| {
            state.back();
        })
    }

    pub fn ask_new(&self) -> Result<SessionSnapshot, LunaError> {
        self.apply(|state| {
            state.ask_new();
        })
    }

    pub fn deepen(&self) -> Result<SessionSnapshot, LunaError> {
        self.apply(|state| {
            state.deepen();
        })
    }

    // ------------------------------------------------------------------
    // Language
    // ------------------------------------------------------------------

    pub fn set_language(&self, language: Language) -> Result<SessionSnapshot, LunaError> {
        let mut state = self.state()?;
        state.set_language(language);
        self.persist_language(language);
        self.snapshot_of(&state)
    }

    pub fn toggle_language(&self) -> Result<SessionSnapshot, LunaError> {
        let mut state = self.state()?;
        let language = state.toggle_language();
        self.persist_language(language);
        self.snapshot_of(&state)
    }

    fn persist_language(&self, language: Language) {
        if let Err(e) = save_language(&self.store, language) {
            log::warn!("[Session] Failed to save display language: {}", e);
        }
    }

    // ------------------------------------------------------------------
    // Overlays / history
    // ------------------------------------------------------------------

    pub fn open_history(&self) -> Result<SessionSnapshot, LunaError> {
        self.apply(SessionState::open_history)
    }

    pub fn close_history(&self) -> Result<SessionSnapshot, LunaError> {
        self.apply(SessionState::close_history)
    }

    pub fn open_rules(&self) -> Result<SessionSnapshot, LunaError> {
        self.apply(SessionState::open_rules)
    }

    pub fn close_rules(&self) -> Result<SessionSnapshot, LunaError> {
        self.apply(SessionState::close_rules)
    }

    /// 히스토리 항목을 결과 화면으로 표시. 없는 id는 무시합니다.
    pub fn open_history_record(&self, id: &str) -> Result<SessionSnapshot, LunaError> {
        let mut state = self.state()?;
        let record = self.history()?.get(id).cloned();
        match record {
            Some(record) => {
                if !state.show_record(record) {
                    log::info!("[Session] Ignored history record {} during an active reading", id);
                }
            }
            None => log::warn!("[Session] {}", LunaError::RecordNotFound(id.to_string())),
        }
        self.snapshot_of(&state)
    }

    pub fn clear_history(&self) -> Result<SessionSnapshot, LunaError> {
        let state = self.state()?;
        if let Err(e) = self.history()?.clear() {
            log::warn!("[Session] History cleared in memory only: {}", e);
        }
        self.snapshot_of(&state)
    }
}
