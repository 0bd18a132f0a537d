//! Presentation Layer
//!
//! 세션 상태에서 파생되는 화면 모델. WebView는 이 값을 그대로 렌더링합니다.

pub mod i18n;
pub mod layout;

use serde::Serialize;

use crate::models::{Card, HistoryRecord, HistorySummary, Language, Spread};
use crate::session::state::{Overlays, Phase, PhaseKind, SessionState, DECK_SLOTS};
use i18n::{strings, UiStrings};
use layout::{spread_layout, LayoutMode, SlotPosition, SpreadLayout};

pub fn card_image_url(card: &Card) -> String {
    format!("https://picsum.photos/seed/{}/300/500", card.name_en.replace(' ', "%20"))
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub index: usize,
    pub name: String,
    pub position: String,
    pub position_meaning: String,
    pub orientation_label: &'static str,
    pub reversed: bool,
    pub image_url: String,
    pub meaning: String,
    pub slot: Option<SlotPosition>,
}

impl CardView {
    fn build(index: usize, card: &Card, language: Language, layout: &SpreadLayout) -> Self {
        Self {
            index,
            name: card.display_name(language).to_string(),
            position: card.position.clone(),
            position_meaning: card.position_meaning.clone(),
            orientation_label: strings(language).orientation(card.orientation),
            reversed: card.orientation == crate::models::Orientation::Reversed,
            image_url: card_image_url(card),
            meaning: card.meaning.clone(),
            slot: layout.position(index),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdleView {
    pub question_input: String,
    pub error: Option<String>,
    pub can_submit: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestingView {
    pub question: String,
}

/// 스프레드 자리 하나 (선택된 덱 슬롯이 채워졌는지)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PickSlotView {
    pub index: usize,
    pub deck_slot: Option<usize>,
    pub position: Option<SlotPosition>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PickingView {
    pub spread_type: String,
    pub prompt: String,
    pub card_count: usize,
    pub deck_slots: usize,
    pub picked_deck_slots: Vec<usize>,
    pub slots: Vec<PickSlotView>,
    pub arched: bool,
    pub can_finalize: bool,
}

impl PickingView {
    fn build(spread: &Spread, picked: &[usize], language: Language) -> Self {
        let count = spread.card_count();
        let layout = if count <= 5 {
            spread_layout(&spread.spread_type, count, LayoutMode::Preview)
        } else {
            SpreadLayout::Flow
        };

        Self {
            spread_type: spread.spread_type.clone(),
            prompt: strings(language).pick_cards(count),
            card_count: count,
            deck_slots: DECK_SLOTS,
            picked_deck_slots: picked.to_vec(),
            slots: (0..count)
                .map(|i| PickSlotView {
                    index: i,
                    deck_slot: picked.get(i).copied(),
                    position: layout.position(i),
                })
                .collect(),
            arched: count > 5,
            can_finalize: picked.len() == count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizedView {
    pub record_id: String,
    pub created_at: i64,
    pub original_question: String,
    pub spread_type: String,
    pub question_topic: String,
    pub custom_layout: bool,
    pub cards: Vec<CardView>,
    pub summary: String,
    pub advice: String,
    pub lucky_element: Option<String>,
}

impl FinalizedView {
    fn build(record: &HistoryRecord, language: Language) -> Self {
        let spread = &record.spread;
        let count = spread.card_count();
        let layout = spread_layout(&spread.spread_type, count, LayoutMode::Reveal);

        Self {
            record_id: record.id.clone(),
            created_at: record.created_at,
            original_question: record.original_question.clone(),
            spread_type: spread.spread_type.clone(),
            question_topic: spread.question_topic.clone(),
            custom_layout: count > 1 && count <= 5,
            cards: spread
                .cards
                .iter()
                .enumerate()
                .map(|(i, card)| CardView::build(i, card, language, &layout))
                .collect(),
            summary: spread.synthesis.summary.clone(),
            advice: spread.synthesis.advice.clone(),
            lucky_element: spread.synthesis.lucky_element.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum SessionView {
    Idle(IdleView),
    Requesting(RequestingView),
    Picking(PickingView),
    Finalized(FinalizedView),
}

impl SessionView {
    pub fn from_state(state: &SessionState) -> Self {
        let language = state.language();
        match state.phase() {
            Phase::Idle => SessionView::Idle(IdleView {
                question_input: state.question_input().to_string(),
                error: state.error().map(str::to_string),
                can_submit: !state.question_input().trim().is_empty(),
            }),
            Phase::Requesting { question, .. } => SessionView::Requesting(RequestingView {
                question: question.clone(),
            }),
            Phase::Picking { spread, picked_slots, .. } => {
                SessionView::Picking(PickingView::build(spread, picked_slots, language))
            }
            Phase::Finalized { record } => SessionView::Finalized(FinalizedView::build(record, language)),
        }
    }
}

/// 프론트엔드에 전달되는 전체 화면 상태
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub phase: PhaseKind,
    pub language: Language,
    pub overlays: Overlays,
    pub view: SessionView,
    pub history: Vec<HistorySummary>,
    pub strings: &'static UiStrings,
}

impl SessionSnapshot {
    pub fn build(state: &SessionState, history: Vec<HistorySummary>) -> Self {
        Self {
            phase: state.kind(),
            language: state.language(),
            overlays: state.overlays(),
            view: SessionView::from_state(state),
            history,
            strings: strings(state.language()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::spread;
    use crate::models::Reading;

    fn picking_state(count: usize) -> SessionState {
        let mut state = SessionState::new(Language::En);
        let pending = state.begin_request(Some("Should I accept this job offer?")).unwrap();
        state.resolve(pending.ticket, Reading::Success(spread(count)));
        state
    }

    #[test]
    fn test_idle_view_reflects_input_and_error() {
        let mut state = SessionState::new(Language::Zh);
        let snapshot = SessionSnapshot::build(&state, Vec::new());
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["phase"], "idle");
        assert_eq!(json["view"]["phase"], "idle");
        assert_eq!(json["view"]["canSubmit"], false);
        assert_eq!(json["strings"]["title"], "灵月");

        state.set_question_input("我下周的运势如何？");
        let SessionView::Idle(idle) = SessionView::from_state(&state) else {
            panic!("expected idle view");
        };
        assert!(idle.can_submit);
    }

    #[test]
    fn test_picking_view_tracks_slots() {
        let mut state = picking_state(3);
        state.pick(7);

        let SessionView::Picking(view) = SessionView::from_state(&state) else {
            panic!("expected picking view");
        };
        assert_eq!(view.prompt, "Focus your intent and draw 3 cards from the deck.");
        assert_eq!(view.slots[0].deck_slot, Some(7));
        assert_eq!(view.slots[1].deck_slot, None);
        assert!(view.slots[0].position.is_some());
        assert!(!view.can_finalize);
        assert!(!view.arched);
    }

    #[test]
    fn test_finalized_view_localizes_cards() {
        let mut state = picking_state(3);
        for slot in [3, 7, 12] {
            state.pick(slot);
        }
        state.finalize("rec-1".to_string(), 99).unwrap();
        state.set_language(Language::Zh);

        let SessionView::Finalized(view) = SessionView::from_state(&state) else {
            panic!("expected finalized view");
        };
        assert_eq!(view.record_id, "rec-1");
        assert_eq!(view.cards.len(), 3);
        assert_eq!(view.cards[0].name, "The Fool(中)");
        assert_eq!(view.cards[1].orientation_label, "逆位");
        assert!(view.cards[1].reversed);
        assert_eq!(view.cards[0].image_url, "https://picsum.photos/seed/The%20Fool/300/500");
        assert!(view.custom_layout);
        assert_eq!(view.lucky_element.as_deref(), Some("Moonstone"));
    }
}
