//! History Store
//!
//! 확정된 리딩을 최신순으로 보관하는 append-only 로그.
//! 모든 변경(append, clear)은 `history-log` 키에 JSON 전체를 다시 씁니다.

use std::sync::{Arc, Mutex};

use crate::db::KeyValueStore;
use crate::error::LunaError;
use crate::models::{HistoryRecord, HistorySummary};

/// 히스토리 로그 저장 키
pub const HISTORY_KEY: &str = "history-log";

/// 히스토리/설정이 함께 쓰는 영속화 경계
pub type SharedStore = Arc<Mutex<dyn KeyValueStore>>;

/// 저장소에서 히스토리를 읽습니다. 없거나 파싱에 실패하면 빈 목록.
pub fn load_records(backend: &dyn KeyValueStore) -> Vec<HistoryRecord> {
    let raw = match backend.get(HISTORY_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            log::warn!("[History] Failed to read history log: {}", e);
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<HistoryRecord>>(&raw) {
        Ok(records) => records,
        Err(e) => {
            log::warn!("[History] Stored history log is corrupt, starting empty: {}", e);
            Vec::new()
        }
    }
}

/// 히스토리 저장소
pub struct HistoryStore {
    records: Vec<HistoryRecord>,
    backend: SharedStore,
}

impl HistoryStore {
    /// 영속화된 히스토리를 로드하여 저장소 생성
    pub fn load(backend: SharedStore) -> Result<Self, LunaError> {
        let records = {
            let guard = backend.lock().map_err(LunaError::lock)?;
            load_records(&*guard)
        };
        log::info!("[History] Loaded {} records", records.len());
        Ok(Self { records, backend })
    }

    /// 최신순 레코드
    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&HistoryRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn summaries(&self) -> Vec<HistorySummary> {
        self.records.iter().map(HistorySummary::from).collect()
    }

    /// 맨 앞(최신)에 추가. 중복 제거는 하지 않습니다.
    ///
    /// 저장 실패 시에도 메모리 상태는 유지되며, 에러를 반환합니다.
    pub fn append(&mut self, record: HistoryRecord) -> Result<(), LunaError> {
        self.records.insert(0, record);
        self.persist()
    }

    /// 전체 삭제 (되돌릴 수 없음)
    pub fn clear(&mut self) -> Result<(), LunaError> {
        self.records.clear();
        self.persist()
    }

    fn persist(&self) -> Result<(), LunaError> {
        let json = serde_json::to_string(&self.records)?;
        let mut guard = self.backend.lock().map_err(LunaError::lock)?;
        guard.set(HISTORY_KEY, &json).map_err(|e| {
            log::error!("[History] Failed to persist history log: {}", e);
            e
        })
    }
}
