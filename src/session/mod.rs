//! Reading Session
//!
//! 한 번의 리딩 흐름(질문 → 요청 → 카드 선택 → 공개)을 관리합니다.

pub mod controller;
pub mod state;

pub use controller::ReadingSession;
pub use state::{Phase, PhaseKind, SessionState, DECK_SLOTS};
