//! Gemini 리딩 클라이언트
//!
//! generateContent REST API를 호출합니다. 자동 재시도는 하지 않습니다.

use async_trait::async_trait;

use super::prompt::{build_user_content, response_schema, TAROT_RULES_PROMPT};
use super::types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig};
use super::{connection_lost, parse_reading, ReadingGateway};
use crate::config::GatewayConfig;
use crate::error::LunaError;
use crate::models::{Language, Reading};

/// Gemini 기반 Reading Gateway
pub struct GeminiGateway {
    config: GatewayConfig,
    http: reqwest::Client,
}

impl GeminiGateway {
    pub fn new(config: GatewayConfig) -> Result<Self, LunaError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(config, http))
    }

    /// 미리 구성한 HTTP 클라이언트 사용 (프록시/TLS 설정 등)
    pub fn with_client(config: GatewayConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.config.api_base, self.config.model)
    }

    fn build_request(question: &str, language: Language) -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: Content::text(None, TAROT_RULES_PROMPT),
            contents: vec![Content::text(Some("user"), build_user_content(question, language))],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: response_schema(),
            },
        }
    }

    async fn fetch(&self, question: &str, language: Language) -> Result<Reading, LunaError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| LunaError::Config("GEMINI_API_KEY is not set".to_string()))?;

        let resp = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&Self::build_request(question, language))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(LunaError::Gateway(format!(
                "API error: {} {}",
                status.as_u16(),
                body.chars().take(200).collect::<String>()
            )));
        }

        let data: GenerateContentResponse = resp.json().await?;
        if let Some(reason) = data.block_reason() {
            return Err(LunaError::Gateway(format!("prompt blocked: {}", reason)));
        }
        let text = data
            .text()
            .ok_or_else(|| LunaError::Gateway("empty model response".to_string()))?;

        parse_reading(&text, language)
    }
}

#[async_trait]
impl ReadingGateway for GeminiGateway {
    async fn request_reading(&self, question: &str, language: Language) -> Reading {
        log::info!("[Gateway] Requesting reading ({}, model={})", language.code(), self.config.model);

        match self.fetch(question, language).await {
            Ok(reading) => {
                log::info!(
                    "[Gateway] Reading resolved: {:?}, {} cards",
                    reading.status(),
                    reading.cards().len()
                );
                reading
            }
            Err(e) => {
                log::error!("[Gateway] Reading failed, returning fallback refusal: {}", e);
                Reading::refused(connection_lost(language))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn config(api_base: &str, api_key: Option<&str>) -> GatewayConfig {
        GatewayConfig {
            api_key: api_key.map(str::to_string),
            api_base: api_base.to_string(),
            timeout: Duration::from_secs(5),
            ..GatewayConfig::default()
        }
    }

    fn gateway(config: GatewayConfig) -> GeminiGateway {
        // 로컬 서버 테스트가 시스템 프록시를 타지 않도록
        let http = reqwest::Client::builder().no_proxy().timeout(config.timeout).build().unwrap();
        GeminiGateway::with_client(config, http)
    }

    /// 요청 하나를 받아 본문을 돌려주고, 고정 응답을 보내는 1회용 HTTP 서버
    async fn serve_once(status_line: &'static str, body: String) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&buf).to_string();
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|l| {
                            let (k, v) = l.split_once(':')?;
                            k.eq_ignore_ascii_case("content-length").then(|| v.trim().parse::<usize>().ok())?
                        })
                        .unwrap_or(0);
                    if buf.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&buf).to_string()
        });

        (format!("http://{}", addr), handle)
    }

    fn envelope(reading_json: &str) -> String {
        serde_json::json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": reading_json }] } }]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_success_roundtrip_against_local_server() {
        let reading = r#"{"status":"success","refusal_reason":null,"spread_type":"3-Card Spread","question_topic":"Job",
            "cards":[
              {"position":"Past","position_meaning":"a","card_name_en":"The Fool","card_name_cn":"愚者","orientation":"Upright","image_id":"0","single_meaning":"x"},
              {"position":"Present","position_meaning":"b","card_name_en":"The Star","card_name_cn":"星星","orientation":"Reversed","image_id":"17","single_meaning":"y"},
              {"position":"Future","position_meaning":"c","card_name_en":"The World","card_name_cn":"世界","orientation":"Upright","image_id":"21","single_meaning":"z"}],
            "synthesis":{"summary":"Yes.","advice":"Go.","lucky_element":"Silver"}}"#;
        let (base, server) = serve_once("200 OK", envelope(reading)).await;

        let gateway = gateway(config(&base, Some("test-key")));
        let result = gateway.request_reading("Should I accept this job offer?", Language::En).await;
        assert_eq!(result.cards().len(), 3);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /models/gemini-3-flash-preview:generateContent"));
        assert!(request.to_ascii_lowercase().contains("x-goog-api-key: test-key"));
        assert!(request.contains("Should I accept this job offer?"));
        assert!(request.contains("systemInstruction"));
    }

    #[tokio::test]
    async fn test_http_error_maps_to_fallback() {
        let (base, server) = serve_once("500 Internal Server Error", "{\"error\":\"boom\"}".to_string()).await;
        let gateway = gateway(config(&base, Some("k")));

        let result = gateway.request_reading("Q", Language::Zh).await;
        assert_eq!(result.refusal_reason(), Some(connection_lost(Language::Zh)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_model_text_maps_to_fallback() {
        let (base, server) = serve_once("200 OK", envelope("the cards are cloudy")).await;
        let gateway = gateway(config(&base, Some("k")));

        let result = gateway.request_reading("Q", Language::En).await;
        assert_eq!(result.refusal_reason(), Some(connection_lost(Language::En)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_transport_failure_maps_to_localized_fallback() {
        // 바인딩 후 즉시 닫아서 접속 거부되는 포트 확보
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let gateway = gateway(config(&format!("http://{}", addr), Some("k")));

        let en = gateway.request_reading("Will it rain?", Language::En).await;
        assert_eq!(en.refusal_reason(), Some("Cosmic connection lost, please try again later."));
        assert!(en.cards().is_empty());

        let zh = gateway.request_reading("会下雨吗？", Language::Zh).await;
        assert_eq!(zh.refusal_reason(), Some("宇宙连结中断，请稍后再试。"));
    }

    #[tokio::test]
    async fn test_missing_api_key_never_hits_network() {
        let gateway = gateway(config("http://127.0.0.1:1", None));
        let result = gateway.request_reading("Q", Language::En).await;
        assert_eq!(result.refusal_reason(), Some(connection_lost(Language::En)));
    }
}
