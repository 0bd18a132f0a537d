//! 스프레드 배치 계산
//!
//! 카드 수와 스프레드 이름에 따라 슬롯의 절대 위치(% 단위)를 정합니다.
//! 정해진 배치가 없으면 flow 레이아웃(가로 나열)을 씁니다.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlotPosition {
    pub top: f32,
    pub left: f32,
}

const fn at(top: f32, left: f32) -> SlotPosition {
    SlotPosition { top, left }
}

/// 카드 선택 단계 미리보기 / 결과 공개 화면
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    Preview,
    Reveal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "positions", rename_all = "camelCase")]
pub enum SpreadLayout {
    Absolute(Vec<SlotPosition>),
    Flow,
}

impl SpreadLayout {
    pub fn position(&self, index: usize) -> Option<SlotPosition> {
        match self {
            SpreadLayout::Absolute(positions) => positions.get(index).copied(),
            SpreadLayout::Flow => None,
        }
    }
}

const THREE_IN_A_ROW: [SlotPosition; 3] = [at(50.0, 25.0), at(50.0, 50.0), at(50.0, 75.0)];

fn cross(side: f32) -> Vec<SlotPosition> {
    vec![
        at(50.0, 50.0),
        at(20.0, side),
        at(20.0, 100.0 - side),
        at(80.0, side),
        at(80.0, 100.0 - side),
    ]
}

fn relationship(side: f32) -> Vec<SlotPosition> {
    vec![
        at(50.0, side),
        at(50.0, 100.0 - side),
        at(50.0, 50.0),
        at(20.0, 50.0),
        at(80.0, 50.0),
    ]
}

pub fn spread_layout(spread_type: &str, total: usize, mode: LayoutMode) -> SpreadLayout {
    let spread = spread_type.to_lowercase();

    if total == 5 && (spread.contains("x-spread") || spread.contains("action")) {
        let side = match mode {
            LayoutMode::Preview => 30.0,
            LayoutMode::Reveal => 25.0,
        };
        return SpreadLayout::Absolute(cross(side));
    }
    if total == 5 && spread.contains("relationship") {
        let side = match mode {
            LayoutMode::Preview => 15.0,
            LayoutMode::Reveal => 20.0,
        };
        return SpreadLayout::Absolute(relationship(side));
    }
    if total == 3 {
        return SpreadLayout::Absolute(THREE_IN_A_ROW.to_vec());
    }

    SpreadLayout::Flow
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_card_row() {
        let layout = spread_layout("3-Card Spread", 3, LayoutMode::Reveal);
        assert_eq!(layout.position(0), Some(at(50.0, 25.0)));
        assert_eq!(layout.position(2), Some(at(50.0, 75.0)));
        assert_eq!(layout.position(3), None);
    }

    #[test]
    fn test_five_card_variants_differ_by_mode() {
        let preview = spread_layout("X-Spread (5 Cards)", 5, LayoutMode::Preview);
        let reveal = spread_layout("X-Spread (5 Cards)", 5, LayoutMode::Reveal);
        assert_eq!(preview.position(1), Some(at(20.0, 30.0)));
        assert_eq!(reveal.position(1), Some(at(20.0, 25.0)));
        assert_eq!(reveal.position(4), Some(at(80.0, 75.0)));

        let rel = spread_layout("Relationship Spread (5 Cards)", 5, LayoutMode::Reveal);
        assert_eq!(rel.position(0), Some(at(50.0, 20.0)));
        assert_eq!(rel.position(1), Some(at(50.0, 80.0)));
    }

    #[test]
    fn test_other_spreads_flow() {
        assert_eq!(spread_layout("Celtic Cross (10 Cards)", 10, LayoutMode::Reveal), SpreadLayout::Flow);
        assert_eq!(spread_layout("5-Card Mystery", 5, LayoutMode::Preview), SpreadLayout::Flow);
        assert_eq!(spread_layout("1-Card Spread", 1, LayoutMode::Preview), SpreadLayout::Flow);
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(spread_layout("3-Card Spread", 3, LayoutMode::Preview)).unwrap();
        assert_eq!(json["kind"], "absolute");
        assert_eq!(json["positions"][1]["left"], 50.0);
        assert_eq!(serde_json::to_value(SpreadLayout::Flow).unwrap()["kind"], "flow");
    }
}
