use serde::Serialize;

use crate::gateway::default_refusal;
use crate::models::{HistoryRecord, Language, Reading, Spread};

/// 카드 선택 캐러셀에 놓이는 뒷면 카드 수
pub const DECK_SLOTS: usize = 22;

/// 진행 중인 Gateway 요청 식별자. 오래된 티켓의 결과는 무시됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PhaseKind {
    Idle,
    Requesting,
    Picking,
    Finalized,
}

/// 리딩 한 번의 진행 단계 (단일 진실 공급원)
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    Requesting {
        question: String,
        ticket: RequestTicket,
    },
    Picking {
        question: String,
        spread: Spread,
        picked_slots: Vec<usize>,
    },
    Finalized {
        record: HistoryRecord,
    },
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Idle => PhaseKind::Idle,
            Phase::Requesting { .. } => PhaseKind::Requesting,
            Phase::Picking { .. } => PhaseKind::Picking,
            Phase::Finalized { .. } => PhaseKind::Finalized,
        }
    }
}

/// 오버레이 토글 (단계와 무관)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Overlays {
    pub history: bool,
    pub rules: bool,
}

/// `begin_request`가 돌려주는 요청 정보
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub ticket: RequestTicket,
    pub question: String,
    pub language: Language,
}

/// Gateway 결과 반영 결과
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// 오래된 티켓 (취소되었거나 이미 처리됨)
    Ignored,
    Refused(String),
    Picking { card_count: usize },
}

/// "더 깊이 묻기" 질문 템플릿
pub fn deepen_question(topic: &str, language: Language) -> String {
    match language {
        Language::En => format!("Please provide a deeper reading regarding \"{}\":", topic),
        Language::Zh => format!("针对“{}”请给我更深入的解析：", topic),
    }
}

/// 리딩 세션 상태 머신
///
/// Idle → Requesting → Picking → Finalized 순서로만 진행하며,
/// 잘못된 입력(빈 질문, 중복 선택, 이른 확정 등)은 조용히 무시합니다.
#[derive(Debug, Clone)]
pub struct SessionState {
    phase: Phase,
    question_input: String,
    language: Language,
    error: Option<String>,
    overlays: Overlays,
    next_ticket: u64,
}

impl SessionState {
    pub fn new(language: Language) -> Self {
        Self {
            phase: Phase::Idle,
            question_input: String::new(),
            language,
            error: None,
            overlays: Overlays::default(),
            next_ticket: 0,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    pub fn question_input(&self) -> &str {
        &self.question_input
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn overlays(&self) -> Overlays {
        self.overlays
    }

    pub fn picked_slots(&self) -> &[usize] {
        match &self.phase {
            Phase::Picking { picked_slots, .. } => picked_slots,
            _ => &[],
        }
    }

    /// 입력창 텍스트 (Idle에서만 편집 가능)
    pub fn set_question_input(&mut self, text: &str) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        self.question_input = text.to_string();
        true
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn toggle_language(&mut self) -> Language {
        self.language = self.language.toggle();
        self.language
    }

    pub fn open_history(&mut self) {
        self.overlays.history = true;
    }

    pub fn close_history(&mut self) {
        self.overlays.history = false;
    }

    pub fn open_rules(&mut self) {
        self.overlays.rules = true;
    }

    pub fn close_rules(&mut self) {
        self.overlays.rules = false;
    }

    // ------------------------------------------------------------------
    // Idle → Requesting → {Idle, Picking}
    // ------------------------------------------------------------------

    /// 질문 제출. `question`이 주어지면 입력창을 그 값으로 바꾼 뒤 제출합니다 (샘플 질문).
    ///
    /// Idle이 아니거나 공백뿐인 질문이면 `None`.
    pub fn begin_request(&mut self, question: Option<&str>) -> Option<PendingRequest> {
        if self.phase != Phase::Idle {
            return None;
        }
        if let Some(q) = question {
            self.question_input = q.to_string();
        }
        let trimmed = self.question_input.trim();
        if trimmed.is_empty() {
            return None;
        }

        let question = trimmed.to_string();
        self.next_ticket += 1;
        let ticket = RequestTicket(self.next_ticket);
        self.error = None;
        self.phase = Phase::Requesting {
            question: question.clone(),
            ticket,
        };

        Some(PendingRequest {
            ticket,
            question,
            language: self.language,
        })
    }

    /// Gateway 결과 반영
    pub fn resolve(&mut self, ticket: RequestTicket, reading: Reading) -> Resolution {
        let question = match &self.phase {
            Phase::Requesting { ticket: current, question } if *current == ticket => question.clone(),
            _ => return Resolution::Ignored,
        };

        match reading {
            Reading::Refused { refusal_reason } => {
                let reason = if refusal_reason.trim().is_empty() {
                    default_refusal(self.language).to_string()
                } else {
                    refusal_reason
                };
                self.phase = Phase::Idle;
                self.error = Some(reason.clone());
                Resolution::Refused(reason)
            }
            Reading::Success(spread) => {
                let card_count = spread.card_count();
                self.error = None;
                self.phase = Phase::Picking {
                    question,
                    spread,
                    picked_slots: Vec::with_capacity(card_count),
                };
                Resolution::Picking { card_count }
            }
        }
    }

    /// 진행 중인 요청 취소. 늦게 도착한 결과는 버려집니다.
    pub fn cancel(&mut self) -> bool {
        if !matches!(self.phase, Phase::Requesting { .. }) {
            return false;
        }
        self.phase = Phase::Idle;
        true
    }

    // ------------------------------------------------------------------
    // Picking
    // ------------------------------------------------------------------

    pub fn pick(&mut self, slot: usize) -> bool {
        let Phase::Picking { spread, picked_slots, .. } = &mut self.phase else {
            return false;
        };
        if slot >= DECK_SLOTS || picked_slots.contains(&slot) || picked_slots.len() >= spread.card_count() {
            return false;
        }
        picked_slots.push(slot);
        true
    }

    pub fn unpick(&mut self, slot: usize) -> bool {
        let Phase::Picking { picked_slots, .. } = &mut self.phase else {
            return false;
        };
        let before = picked_slots.len();
        picked_slots.retain(|s| *s != slot);
        picked_slots.len() != before
    }

    pub fn clear_selection(&mut self) -> bool {
        let Phase::Picking { picked_slots, .. } = &mut self.phase else {
            return false;
        };
        let changed = !picked_slots.is_empty();
        picked_slots.clear();
        changed
    }

    /// 선택이 모두 끝났을 때만 확정. 생성된 레코드를 돌려주며 호출자가 히스토리에 추가합니다.
    pub fn finalize(&mut self, id: String, created_at: i64) -> Option<HistoryRecord> {
        let ready = matches!(
            &self.phase,
            Phase::Picking { spread, picked_slots, .. } if picked_slots.len() == spread.card_count()
        );
        if !ready {
            return None;
        }

        let Phase::Picking { question, spread, .. } = std::mem::replace(&mut self.phase, Phase::Idle) else {
            return None;
        };
        let record = HistoryRecord {
            id,
            created_at,
            original_question: question,
            spread,
        };
        self.phase = Phase::Finalized { record: record.clone() };
        self.question_input.clear();
        Some(record)
    }

    // ------------------------------------------------------------------
    // Finalized / navigation
    // ------------------------------------------------------------------

    /// 뒤로 가기: Finalized는 표시 중인 리딩과 입력을 비우고, Picking은 대기 리딩을 버립니다.
    pub fn back(&mut self) -> bool {
        match self.phase {
            Phase::Finalized { .. } => {
                self.phase = Phase::Idle;
                self.question_input.clear();
                true
            }
            Phase::Picking { .. } => {
                self.phase = Phase::Idle;
                true
            }
            Phase::Idle | Phase::Requesting { .. } => false,
        }
    }

    pub fn ask_new(&mut self) -> bool {
        if !matches!(self.phase, Phase::Finalized { .. }) {
            return false;
        }
        self.phase = Phase::Idle;
        self.question_input.clear();
        true
    }

    /// 이전 리딩의 주제로 다음 질문을 미리 채우고 Idle로
    pub fn deepen(&mut self) -> bool {
        let Phase::Finalized { record } = &self.phase else {
            return false;
        };
        self.question_input = deepen_question(&record.spread.question_topic, self.language);
        self.phase = Phase::Idle;
        true
    }

    /// 히스토리 항목 표시. 진행 중인 리딩(Requesting/Picking)은 덮어쓰지 않습니다.
    pub fn show_record(&mut self, record: HistoryRecord) -> bool {
        if !matches!(self.phase, Phase::Idle | Phase::Finalized { .. }) {
            return false;
        }
        self.phase = Phase::Finalized { record };
        self.overlays.history = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::spread;

    fn picking(card_count: usize) -> SessionState {
        let mut state = SessionState::new(Language::En);
        let pending = state.begin_request(Some("Should I accept this job offer?")).unwrap();
        assert_eq!(
            state.resolve(pending.ticket, Reading::Success(spread(card_count))),
            Resolution::Picking { card_count }
        );
        state
    }

    #[test]
    fn test_blank_question_is_ignored() {
        let mut state = SessionState::new(Language::En);
        assert!(state.begin_request(None).is_none());
        assert!(state.begin_request(Some("   \n\t")).is_none());
        assert_eq!(state.kind(), PhaseKind::Idle);
    }

    #[test]
    fn test_duplicate_submit_while_requesting_is_noop() {
        let mut state = SessionState::new(Language::En);
        state.set_question_input("  What lesson am I learning?  ");
        let pending = state.begin_request(None).unwrap();
        assert_eq!(pending.question, "What lesson am I learning?");
        assert_eq!(state.kind(), PhaseKind::Requesting);

        assert!(state.begin_request(Some("Another question")).is_none());
        assert!(!state.set_question_input("typing"));
        assert_eq!(state.kind(), PhaseKind::Requesting);
    }

    #[test]
    fn test_refusal_returns_to_idle_with_error() {
        let mut state = SessionState::new(Language::Zh);
        let pending = state.begin_request(Some("Will I win the lottery?")).unwrap();
        let res = state.resolve(pending.ticket, Reading::refused("灵月不预测博彩结果。"));

        assert_eq!(res, Resolution::Refused("灵月不预测博彩结果。".to_string()));
        assert_eq!(state.kind(), PhaseKind::Idle);
        assert_eq!(state.error(), Some("灵月不预测博彩结果。"));
        // 입력은 남아 있어 수정 후 재시도 가능
        assert_eq!(state.question_input(), "Will I win the lottery?");

        let pending = state.begin_request(None).unwrap();
        assert!(state.error().is_none());
        state.resolve(pending.ticket, Reading::refused(" "));
        assert_eq!(state.error(), Some(default_refusal(Language::Zh)));
    }

    #[test]
    fn test_cancel_drops_late_result() {
        let mut state = SessionState::new(Language::En);
        let pending = state.begin_request(Some("Q")).unwrap();
        assert!(state.cancel());
        assert_eq!(state.kind(), PhaseKind::Idle);

        assert_eq!(state.resolve(pending.ticket, Reading::Success(spread(1))), Resolution::Ignored);
        assert_eq!(state.kind(), PhaseKind::Idle);

        // 새 요청의 티켓은 이전 것과 다름
        let next = state.begin_request(None).unwrap();
        assert_ne!(next.ticket, pending.ticket);
        assert_eq!(state.resolve(pending.ticket, Reading::Success(spread(1))), Resolution::Ignored);
        assert_eq!(state.kind(), PhaseKind::Requesting);
    }

    #[test]
    fn test_pick_limits_and_distinctness() {
        let mut state = picking(3);
        assert!(state.pick(3));
        assert!(!state.pick(3));
        assert!(state.pick(7));
        assert!(!state.pick(DECK_SLOTS));
        assert!(state.pick(12));
        assert_eq!(state.picked_slots(), &[3, 7, 12]);

        // 가득 찬 뒤의 pick은 no-op
        assert!(!state.pick(0));
        assert_eq!(state.picked_slots().len(), 3);
    }

    #[test]
    fn test_unpick_then_pick_restores_membership() {
        let mut state = picking(3);
        state.pick(1);
        state.pick(2);
        assert!(state.unpick(1));
        assert!(!state.unpick(1));
        assert!(state.pick(1));
        assert_eq!(state.picked_slots(), &[2, 1]);

        assert!(state.clear_selection());
        assert!(state.picked_slots().is_empty());
    }

    #[test]
    fn test_finalize_requires_full_selection() {
        let mut state = picking(2);
        state.pick(5);
        assert!(state.finalize("id-1".to_string(), 1).is_none());
        assert_eq!(state.kind(), PhaseKind::Picking);

        state.pick(6);
        let record = state.finalize("id-1".to_string(), 42).unwrap();
        assert_eq!(record.original_question, "Should I accept this job offer?");
        assert_eq!(record.created_at, 42);
        assert_eq!(record.spread.card_count(), 2);
        assert_eq!(state.kind(), PhaseKind::Finalized);
        assert_eq!(state.question_input(), "");
        assert!(state.picked_slots().is_empty());

        // 두 번째 finalize는 no-op
        assert!(state.finalize("id-2".to_string(), 43).is_none());
    }

    #[test]
    fn test_deepen_prefills_localized_question() {
        let mut state = picking(1);
        state.pick(0);
        state.finalize("id".to_string(), 0).unwrap();
        assert!(state.deepen());
        assert_eq!(state.kind(), PhaseKind::Idle);
        assert_eq!(state.question_input(), "Please provide a deeper reading regarding \"Career crossroads\":");

        assert_eq!(deepen_question("事业", Language::Zh), "针对“事业”请给我更深入的解析：");
    }

    #[test]
    fn test_back_and_ask_new() {
        let mut state = picking(1);
        assert!(!state.ask_new());
        assert!(state.back());
        assert_eq!(state.kind(), PhaseKind::Idle);
        assert_eq!(state.question_input(), "Should I accept this job offer?");

        let mut state = picking(1);
        state.pick(0);
        state.finalize("id".to_string(), 0).unwrap();
        assert!(state.ask_new());
        assert_eq!(state.kind(), PhaseKind::Idle);
        assert!(!state.back());
    }

    #[test]
    fn test_show_record_respects_active_reading() {
        let record = HistoryRecord {
            id: "old".to_string(),
            created_at: 0,
            original_question: "Q".to_string(),
            spread: spread(1),
        };

        let mut state = picking(1);
        state.open_history();
        assert!(!state.show_record(record.clone()));
        assert_eq!(state.kind(), PhaseKind::Picking);

        let mut state = SessionState::new(Language::En);
        state.open_history();
        assert!(state.show_record(record));
        assert_eq!(state.kind(), PhaseKind::Finalized);
        assert!(!state.overlays().history);
    }
}
