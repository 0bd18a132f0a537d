//! Database Module
//!
//! SQLite 기반 Key-Value 저장소 (히스토리/설정 영속화 경계)

mod schema;

use std::collections::HashMap;
use std::path::Path;

use rusqlite::{Connection, OptionalExtension};

use crate::error::LunaError;

/// 문자열 키 기반 영속화 경계
///
/// 히스토리 로그는 키 하나에 JSON 전체를 덮어쓰는 방식으로 저장합니다.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, LunaError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), LunaError>;
}

/// 데이터베이스 래퍼
pub struct Database {
    conn: Connection,
}

impl Database {
    /// 새 데이터베이스 연결 생성
    pub fn new(path: &Path) -> Result<Self, LunaError> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// 메모리 DB (테스트/임시 세션용)
    pub fn open_in_memory() -> Result<Self, LunaError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// 데이터베이스 스키마 초기화
    pub fn initialize(&self) -> Result<(), LunaError> {
        self.conn.execute_batch(schema::CREATE_SCHEMA)?;
        Ok(())
    }

    /// 값 조회
    pub fn get_value(&self, key: &str) -> Result<Option<String>, LunaError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv_store WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    /// 값 저장 (INSERT OR REPLACE는 원자적이므로 실패 시 기존 값이 유지됨)
    pub fn set_value(&self, key: &str, value: &str) -> Result<(), LunaError> {
        let now = chrono::Utc::now().timestamp_millis();
        self.conn.execute(
            "INSERT OR REPLACE INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)",
            (key, value, now),
        )?;
        Ok(())
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>, LunaError> {
        self.get_value(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), LunaError> {
        self.set_value(key, value)
    }
}

/// 메모리 Key-Value 저장소
#[derive(Debug, Default, Clone)]
pub struct MemoryKeyValueStore {
    entries: HashMap<String, String>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.to_string(), value.to_string());
        Self { entries }
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, LunaError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), LunaError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_kv_roundtrip_on_disk() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("luna.db");

        {
            let mut db = Database::new(&db_path).unwrap();
            db.initialize().unwrap();
            db.set("history-log", "[]").unwrap();
            db.set("history-log", "[1]").unwrap();
            db.set("display-language", "en").unwrap();
        }

        // 재오픈 후에도 마지막 값이 남아있어야 함
        let db = Database::new(&db_path).unwrap();
        db.initialize().unwrap();
        assert_eq!(db.get("history-log").unwrap().as_deref(), Some("[1]"));
        assert_eq!(db.get("display-language").unwrap().as_deref(), Some("en"));
    }

    #[test]
    fn test_missing_key_reads_as_none() {
        let mut db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        assert_eq!(db.get("nope").unwrap(), None);

        db.set("k", "v").unwrap();
        assert_eq!(db.get("k").unwrap().as_deref(), Some("v"));
    }
}
