//! Mystic Luna Data Models
//!
//! 프론트엔드(TypeScript) 타입과 매핑되는 Rust 데이터 모델

use serde::{Deserialize, Serialize};

/// 표시 언어 (UI 문구 및 리딩 요청 언어)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    #[serde(alias = "cn")]
    Zh,
}

impl Default for Language {
    fn default() -> Self {
        Language::Zh
    }
}

impl Language {
    /// EN ↔ ZH 전환
    pub fn toggle(self) -> Self {
        match self {
            Language::En => Language::Zh,
            Language::Zh => Language::En,
        }
    }

    /// 프롬프트에 넣는 언어 이름
    pub fn prompt_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Zh => "Chinese Simplified",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zh => "zh",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Language::En),
            "zh" | "cn" => Some(Language::Zh),
            _ => None,
        }
    }
}

/// 카드 방향 (정위/역위)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Upright,
    Reversed,
}

/// 스프레드의 개별 카드
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub position: String,
    #[serde(rename = "positionMeaning")]
    pub position_meaning: String,
    #[serde(rename = "nameEn")]
    pub name_en: String,
    #[serde(rename = "nameZh")]
    pub name_zh: String,
    pub orientation: Orientation,
    #[serde(rename = "imageId")]
    pub image_id: String,
    pub meaning: String,
}

impl Card {
    pub fn display_name(&self, language: Language) -> &str {
        match language {
            Language::En => &self.name_en,
            Language::Zh => &self.name_zh,
        }
    }
}

/// 스프레드 전체를 잇는 종합 해석
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Synthesis {
    pub summary: String,
    pub advice: String,
    #[serde(rename = "luckyElement", default, skip_serializing_if = "Option::is_none")]
    pub lucky_element: Option<String>,
}

/// 성공한 리딩의 본문 (카드 1장 이상 + 종합 해석)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spread {
    #[serde(rename = "spreadType")]
    pub spread_type: String,
    #[serde(rename = "questionTopic")]
    pub question_topic: String,
    pub cards: Vec<Card>,
    pub synthesis: Synthesis,
}

impl Spread {
    pub fn card_count(&self) -> usize {
        self.cards.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingStatus {
    Success,
    Refused,
}

/// Gateway가 만들어내는 리딩 결과
///
/// 성공(카드 + 종합 해석) 또는 거절(사유) 둘 중 하나이며, 부분적으로 채워진 상태는 없습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Reading {
    Success(Spread),
    Refused {
        #[serde(rename = "refusalReason")]
        refusal_reason: String,
    },
}

impl Reading {
    pub fn refused(reason: impl Into<String>) -> Self {
        Reading::Refused {
            refusal_reason: reason.into(),
        }
    }

    pub fn status(&self) -> ReadingStatus {
        match self {
            Reading::Success(_) => ReadingStatus::Success,
            Reading::Refused { .. } => ReadingStatus::Refused,
        }
    }

    /// 거절된 리딩은 항상 빈 카드 목록
    pub fn cards(&self) -> &[Card] {
        match self {
            Reading::Success(spread) => &spread.cards,
            Reading::Refused { .. } => &[],
        }
    }

    pub fn refusal_reason(&self) -> Option<&str> {
        match self {
            Reading::Success(_) => None,
            Reading::Refused { refusal_reason } => Some(refusal_reason),
        }
    }

    pub fn spread(&self) -> Option<&Spread> {
        match self {
            Reading::Success(spread) => Some(spread),
            Reading::Refused { .. } => None,
        }
    }
}

/// 히스토리 레코드 (확정된 리딩)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: String,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
    #[serde(rename = "originalQuestion")]
    pub original_question: String,
    #[serde(flatten)]
    pub spread: Spread,
}

/// 히스토리 오버레이 목록용 요약
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    pub id: String,
    pub created_at: i64,
    pub original_question: String,
    pub spread_type: String,
    pub card_count: usize,
}

impl From<&HistoryRecord> for HistorySummary {
    fn from(record: &HistoryRecord) -> Self {
        Self {
            id: record.id.clone(),
            created_at: record.created_at,
            original_question: record.original_question.clone(),
            spread_type: record.spread.spread_type.clone(),
            card_count: record.spread.card_count(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::spread;
    use super::*;

    #[test]
    fn test_language_accepts_legacy_cn() {
        let lang: Language = serde_json::from_str("\"cn\"").unwrap();
        assert_eq!(lang, Language::Zh);
        assert_eq!(serde_json::to_string(&Language::Zh).unwrap(), "\"zh\"");
        assert_eq!(Language::En.toggle(), Language::Zh);
        assert_eq!(Language::from_code(" EN "), Some(Language::En));
        assert_eq!(Language::from_code("fr"), None);
    }

    #[test]
    fn test_reading_status_tag() {
        let refused = Reading::refused("no");
        let json = serde_json::to_value(&refused).unwrap();
        assert_eq!(json["status"], "refused");
        assert_eq!(json["refusalReason"], "no");
        assert!(refused.cards().is_empty());
        assert_eq!(refused.status(), ReadingStatus::Refused);

        let success = Reading::Success(spread(3));
        let json = serde_json::to_value(&success).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["cards"].as_array().unwrap().len(), 3);
        assert_eq!(success.refusal_reason(), None);
    }

    #[test]
    fn test_history_record_flattens_spread() {
        let record = HistoryRecord {
            id: "r1".to_string(),
            created_at: 1_700_000_000_000,
            original_question: "Should I move?".to_string(),
            spread: spread(1),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["originalQuestion"], "Should I move?");
        assert_eq!(json["spreadType"], "1-Card Spread");

        let back: HistoryRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
