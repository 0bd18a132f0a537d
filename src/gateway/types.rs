//! Gemini generateContent API 타입 정의
//!
//! 요청/응답 envelope와, 모델이 반환하는 리딩 JSON의 느슨한(검증 전) 형태

use serde::{Deserialize, Serialize};

// ============================================================================
// Request
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub system_instruction: Content,
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn text(role: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part { text: Some(text.into()) }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: serde_json::Value,
}

// ============================================================================
// Response
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// 첫 번째 후보의 텍스트 파트를 이어붙인 결과
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback.as_ref()?.block_reason.as_deref()
    }
}

// ============================================================================
// Reading payload (모델 출력, 검증 전)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct RawReading {
    pub status: Option<String>,
    pub refusal_reason: Option<String>,
    pub spread_type: Option<String>,
    pub question_topic: Option<String>,
    pub cards: Option<Vec<RawCard>>,
    pub synthesis: Option<RawSynthesis>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawCard {
    pub position: Option<String>,
    pub position_meaning: Option<String>,
    pub card_name_en: Option<String>,
    #[serde(alias = "card_name_zh")]
    pub card_name_cn: Option<String>,
    pub orientation: Option<String>,
    pub image_id: Option<String>,
    pub single_meaning: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawSynthesis {
    pub summary: Option<String>,
    pub advice: Option<String>,
    pub lucky_element: Option<String>,
}
