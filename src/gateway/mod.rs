//! Reading Request Gateway
//!
//! 질문 + 언어를 외부 생성형 리딩 서비스 요청으로 만들고,
//! 응답을 검증하여 항상 유효한 `Reading` 값으로 정규화합니다.

pub mod client;
pub mod prompt;
pub mod types;

use async_trait::async_trait;

use crate::error::LunaError;
use crate::models::{Card, Language, Orientation, Reading, Spread, Synthesis};
use crate::session::state::DECK_SLOTS;
use crate::view::i18n::strings;
use types::{RawCard, RawReading};

pub use client::GeminiGateway;

/// 리딩 요청 경계
///
/// 구현체는 어떤 실패도 호출자에게 전파하지 않고 `Reading::Refused`로 변환해야 합니다.
#[async_trait]
pub trait ReadingGateway: Send + Sync {
    async fn request_reading(&self, question: &str, language: Language) -> Reading;
}

/// 거절 사유가 비어있을 때의 기본 문구
pub fn default_refusal(language: Language) -> &'static str {
    strings(language).btn_refusal
}

/// 전송/파싱 실패 시 문구
pub fn connection_lost(language: Language) -> &'static str {
    match language {
        Language::En => "Cosmic connection lost, please try again later.",
        Language::Zh => "宇宙连结中断，请稍后再试。",
    }
}

/// 모델 텍스트에서 JSON 본문 추출 (```json 코드펜스 제거)
pub fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// 모델 텍스트를 파싱하고 검증
pub fn parse_reading(text: &str, language: Language) -> Result<Reading, LunaError> {
    let raw: RawReading = serde_json::from_str(extract_json(text))?;
    validate(raw, language)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_orientation(value: &str) -> Option<Orientation> {
    match value.trim().to_ascii_lowercase().as_str() {
        "upright" | "正位" => Some(Orientation::Upright),
        "reversed" | "逆位" => Some(Orientation::Reversed),
        _ => None,
    }
}

fn validate_card(raw: RawCard, index: usize) -> Result<Card, LunaError> {
    let name_en = non_empty(raw.card_name_en)
        .ok_or_else(|| LunaError::Gateway(format!("card {} has no name", index)))?;
    let orientation = raw
        .orientation
        .as_deref()
        .and_then(parse_orientation)
        .ok_or_else(|| LunaError::Gateway(format!("card {} has invalid orientation", index)))?;

    Ok(Card {
        position: non_empty(raw.position).unwrap_or_default(),
        position_meaning: non_empty(raw.position_meaning).unwrap_or_default(),
        name_zh: non_empty(raw.card_name_cn).unwrap_or_else(|| name_en.clone()),
        name_en,
        orientation,
        image_id: non_empty(raw.image_id).unwrap_or_default(),
        meaning: non_empty(raw.single_meaning).unwrap_or_default(),
    })
}

/// 느슨한 모델 출력을 성공/거절 tagged union으로 검증
///
/// - success: 카드 1장 이상 `DECK_SLOTS`장 이하, synthesis.summary 필수
/// - refused: 사유가 비어있으면 언어별 기본 문구로 대체
/// - 그 외: 에러 (호출자가 fallback 거절로 변환)
pub fn validate(raw: RawReading, language: Language) -> Result<Reading, LunaError> {
    let status = raw.status.as_deref().map(|s| s.trim().to_ascii_lowercase()).unwrap_or_default();

    match status.as_str() {
        "refused" => {
            let reason = non_empty(raw.refusal_reason).unwrap_or_else(|| default_refusal(language).to_string());
            Ok(Reading::refused(reason))
        }
        "success" => {
            let raw_cards = raw.cards.unwrap_or_default();
            if raw_cards.is_empty() {
                return Err(LunaError::Gateway("success reading without cards".to_string()));
            }
            // 덱 슬롯보다 많으면 카드 선택을 끝낼 수 없음
            if raw_cards.len() > DECK_SLOTS {
                return Err(LunaError::Gateway(format!(
                    "success reading with {} cards exceeds {} deck slots",
                    raw_cards.len(),
                    DECK_SLOTS
                )));
            }
            let cards = raw_cards
                .into_iter()
                .enumerate()
                .map(|(i, card)| validate_card(card, i))
                .collect::<Result<Vec<_>, _>>()?;

            let raw_synthesis = raw.synthesis.unwrap_or_default();
            let summary = non_empty(raw_synthesis.summary)
                .ok_or_else(|| LunaError::Gateway("success reading without summary".to_string()))?;

            Ok(Reading::Success(Spread {
                spread_type: non_empty(raw.spread_type).unwrap_or_default(),
                question_topic: non_empty(raw.question_topic).unwrap_or_default(),
                cards,
                synthesis: Synthesis {
                    summary,
                    advice: non_empty(raw_synthesis.advice).unwrap_or_default(),
                    lucky_element: non_empty(raw_synthesis.lucky_element),
                },
            }))
        }
        other => Err(LunaError::Gateway(format!("unknown reading status: {:?}", other))),
    }
}
