//! UI 문구 (영어 / 중국어 간체)

use serde::Serialize;

use crate::models::{Language, Orientation};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiStrings {
    #[serde(skip)]
    pub language: Language,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub ask_prompt: &'static str,
    pub btn_ask: &'static str,
    pub btn_refusal: &'static str,
    pub history: &'static str,
    pub taboos: &'static str,
    pub loading: &'static str,
    pub reading_title: &'static str,
    pub summary: &'static str,
    pub advice: &'static str,
    pub lucky: &'static str,
    pub no_history: &'static str,
    pub clear_history: &'static str,
    pub deepen: &'static str,
    pub ask_new: &'static str,
    pub confirm_selection: &'static str,
    pub back: &'static str,
    pub cancel: &'static str,
    pub upright: &'static str,
    pub reversed: &'static str,
    pub sample_questions: &'static [&'static str],
    pub rules: &'static [&'static str],
}

pub static EN: UiStrings = UiStrings {
    language: Language::En,
    title: "Mystic Luna",
    subtitle: "Inner Voice & Cosmic Guidance",
    ask_prompt: "Whisper your question to the universe...",
    btn_ask: "Seek Guidance",
    btn_refusal: "The stars are silent on this...",
    history: "Past Reflections",
    taboos: "Rules of the Deck",
    loading: "Shuffling the astral deck...",
    reading_title: "The Cosmic Mirror",
    summary: "The Essence",
    advice: "Divine Advice",
    lucky: "Amulets",
    no_history: "Your spiritual journey is just beginning.",
    clear_history: "Clear Reflection",
    deepen: "Deepen the Query",
    ask_new: "Ask Anew",
    confirm_selection: "Reveal the Cards",
    back: "Back",
    cancel: "Let the cards rest",
    upright: "Upright",
    reversed: "Reversed",
    sample_questions: &[
        "What is my fortune next week?",
        "Should I accept this job offer?",
        "What is the hidden truth in this situation?",
        "How can I attract more abundance?",
        "Is it time to start a new chapter?",
        "What lesson am I currently learning?",
        "Where should I focus my energy?",
    ],
    rules: &[
        "Health & Death: Luna does not answer questions regarding medical treatments, diagnoses, or lifespan.",
        "Gambling/Illegal: Luna refuses any queries regarding gambling outcomes or illegal/criminal acts.",
        "Exam Scores: Focusing on guidance and preparation rather than specific numerical scores or ranks.",
        "Privacy: Luna will not intrude on 3rd parties without authorization or perform purely voyeuristic readings.",
    ],
};

pub static ZH: UiStrings = UiStrings {
    language: Language::Zh,
    title: "灵月",
    subtitle: "内在声音与宇宙指引",
    ask_prompt: "向宇宙倾诉你的疑惑...",
    btn_ask: "寻求指引",
    btn_refusal: "星象不宜对此占卜...",
    history: "往昔回响",
    taboos: "读牌规则",
    loading: "正在洗涤灵性卡组...",
    reading_title: "宇宙明镜",
    summary: "灵性核心",
    advice: "行动启示",
    lucky: "护身灵物",
    no_history: "你的灵性之旅刚刚开始。",
    clear_history: "清除回响",
    deepen: "追问细节",
    ask_new: "询问新问题",
    confirm_selection: "解开封印",
    back: "返回",
    cancel: "暂停占卜",
    upright: "正位",
    reversed: "逆位",
    sample_questions: &[
        "我下周的运势如何？",
        "我要不要接下这个offer？",
        "这段关系的真相是什么？",
        "如何吸引更多财富？",
        "现在是开启新篇章的时机吗？",
        "我目前正在学习什么功课？",
        "我应该把能量聚焦在哪里？",
    ],
    rules: &[
        "健康与死亡：灵月不回答涉及疾病治疗、医疗诊断或寿命长短的问题。",
        "赌博与非法：灵月拒绝任何关于赌博博彩结果或涉及非法犯罪行为的询问。",
        "考试具体分数：灵月会侧重于建议努力方向，而不预测具体的百分制分数或排名。",
        "他人私隐：灵月不会在未获授权的情况下，窥探第三方的个人隐私或单纯的情感窥探。",
    ],
};

pub fn strings(language: Language) -> &'static UiStrings {
    match language {
        Language::En => &EN,
        Language::Zh => &ZH,
    }
}

impl UiStrings {
    pub fn pick_cards(&self, count: usize) -> String {
        match self.language {
            Language::En => format!("Focus your intent and draw {} cards from the deck.", count),
            Language::Zh => format!("冥想你的问题，并从卡组中抽取 {} 张牌。", count),
        }
    }

    pub fn orientation(&self, orientation: Orientation) -> &'static str {
        match orientation {
            Orientation::Upright => self.upright,
            Orientation::Reversed => self.reversed,
        }
    }
}
