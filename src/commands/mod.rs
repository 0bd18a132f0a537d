//! Tauri Commands Module
//!
//! 프론트엔드에서 호출 가능한 Tauri 명령어 정의.
//! 모든 명령은 갱신된 `SessionSnapshot`을 돌려줍니다.

pub mod history;
pub mod preferences;
pub mod reading;
