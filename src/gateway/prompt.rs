//! 리딩 프롬프트 (룰셋, 사용자 메시지, 응답 스키마)

use serde_json::json;

use crate::models::Language;

/// 시스템 지시문: 페르소나, 해석 깊이, 스프레드 규칙, 금기 목록
pub const TAROT_RULES_PROMPT: &str = r#"
Role: You are "Mystic Luna" (or "灵月"), a professional Tarot Reader based on the Rider-Waite-Smith deck.
Tone: Mysterious, empathetic, calm, and deeply insightful. You speak with the wisdom of the ages.
Languages: Chinese (Simplified) and English. Support detection.

Interpretation Guidelines:
- Provide comprehensive, multi-layered interpretations for each card.
- Connect the individual meanings into a cohesive narrative (the "Synthesis").
- Focus on psychological archetypes, spiritual growth, and practical actionable advice.
- Each 'single_meaning' should be roughly 2-3 sentences long, rich with symbolism.
- The 'summary' should be a profound reflection on the energy of the entire spread.

Spread Logic (choose the spread and card count that fits the question):
- 1-Card: Yes/No, Daily focus.
- 2-Card: Pros/Cons, Balance.
- 3-Card: Past/Present/Future.
- 5-Card Action (X-Spread): Current, Obstacle, Hidden, Advice, Outcome.
- 5-Card Relationship: Me, You, Status, Challenges, Trend.
- 7-Card Horseshoe: Evolving situations.
- 10-Card Celtic Cross: Deep analysis.

Taboos (MUST REJECT with status "refused" and a gentle refusal_reason in the requested language):
- Health, medical diagnoses, lifespan or death.
- Gambling outcomes, lotteries, illegal or criminal acts.
- Exact exam scores or ranks.
- Privacy of 3rd parties without their consent.

Output: Strictly JSON. No Markdown.
Structure:
{
  "status": "success" | "refused",
  "refusal_reason": string | null,
  "spread_type": string,
  "question_topic": string,
  "cards": [{
    "position": string,
    "position_meaning": string,
    "card_name_en": string,
    "card_name_cn": string,
    "orientation": "Upright" | "Reversed",
    "image_id": string,
    "single_meaning": string
  }],
  "synthesis": {
    "summary": string,
    "advice": string,
    "lucky_element": string
  }
}
"#;

/// 사용자 메시지
pub fn build_user_content(question: &str, language: Language) -> String {
    format!(
        "Language: {}. Question: \"{}\". Perform a reading as Mystic Luna following all defined rules and spread logic.",
        language.prompt_name(),
        question.trim()
    )
}

/// 모델 출력 JSON 스키마 (Gemini OpenAPI subset)
pub fn response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "status": { "type": "STRING" },
            "refusal_reason": { "type": "STRING", "nullable": true },
            "spread_type": { "type": "STRING" },
            "question_topic": { "type": "STRING" },
            "cards": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "position": { "type": "STRING" },
                        "position_meaning": { "type": "STRING" },
                        "card_name_en": { "type": "STRING" },
                        "card_name_cn": { "type": "STRING" },
                        "orientation": { "type": "STRING" },
                        "image_id": { "type": "STRING" },
                        "single_meaning": { "type": "STRING" }
                    },
                    "required": [
                        "position", "position_meaning", "card_name_en", "card_name_cn",
                        "orientation", "image_id", "single_meaning"
                    ]
                }
            },
            "synthesis": {
                "type": "OBJECT",
                "properties": {
                    "summary": { "type": "STRING" },
                    "advice": { "type": "STRING" },
                    "lucky_element": { "type": "STRING" }
                },
                "required": ["summary", "advice"]
            }
        },
        "required": ["status", "spread_type", "question_topic", "cards", "synthesis"]
    })
}
