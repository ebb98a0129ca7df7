use std::time::Duration;

use futures_util::StreamExt;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{Config, ANALYSIS_TIMEOUT_SECS};
use crate::error::{AppError, Result};
use crate::extractor::split_player_names;
use crate::genai::prompts::{player_names_prompt, translation_prompt, VIDEO_ANALYSIS_PROMPT};
use crate::genai::stream::{GenerateContentResponse, SseTextAccumulator};
use crate::types::Language;

/// Request URLs end up in error text, so the key goes in this header.
const API_KEY_HEADER: &str = "x-goog-api-key";
const VIDEO_MIME_TYPE: &str = "video/mp4";
const MAX_OUTPUT_TOKENS: u32 = 8192;
const TEMPERATURE: f64 = 1.0;
const TOP_P: f64 = 0.95;

/// Harm categories whose blocking threshold is set to OFF.
const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_HARASSMENT",
];

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    File {
        #[serde(rename = "fileData")]
        file_data: FileData<'a>,
    },
    Text {
        text: &'a str,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileData<'a> {
    mime_type: &'static str,
    file_uri: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f64,
    top_p: f64,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

impl<'a> GenerateContentRequest<'a> {
    fn new(parts: Vec<RequestPart<'a>>) -> Self {
        Self {
            contents: vec![RequestContent { role: "user", parts }],
            generation_config: GenerationConfig {
                max_output_tokens: MAX_OUTPUT_TOKENS,
                temperature: TEMPERATURE,
                top_p: TOP_P,
            },
            safety_settings: SAFETY_CATEGORIES
                .iter()
                .map(|&category| SafetySetting {
                    category,
                    threshold: "OFF",
                })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Gemini REST client. Each method is a single attempt; callers decide
/// whether to retry.
#[derive(Clone)]
pub struct GenAiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GenAiClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(ANALYSIS_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            base_url: cfg.genai_api_url.trim_end_matches('/').to_string(),
            model: cfg.genai_model.clone(),
            api_key: cfg.genai_api_key.clone(),
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/v1beta/models/{}:{}", self.base_url, self.model, method)
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AppError::Config("GENAI_API_KEY is not set".to_string()))
    }

    /// Stream the metric analysis of a video and return the concatenated text.
    pub async fn analyze_video(&self, video_url: &str) -> Result<String> {
        let body = GenerateContentRequest::new(vec![
            RequestPart::File {
                file_data: FileData {
                    mime_type: VIDEO_MIME_TYPE,
                    file_uri: video_url,
                },
            },
            RequestPart::Text {
                text: VIDEO_ANALYSIS_PROMPT,
            },
        ]);

        let resp = self
            .http
            .post(self.endpoint("streamGenerateContent"))
            .query(&[("alt", "sse")])
            .header(API_KEY_HEADER, self.api_key()?)
            .json(&body)
            .send()
            .await?;
        let resp = check_status(resp).await?;

        let mut acc = SseTextAccumulator::new();
        let mut stream = resp.bytes_stream();
        while let Some(bytes) = stream.next().await {
            acc.feed(&bytes?)?;
        }
        let chunks = acc.chunks();
        let text = acc.finish()?;

        info!(
            chunks,
            chars = text.len(),
            "video analysis stream complete"
        );
        Ok(text)
    }

    /// One-shot text generation.
    pub async fn generate_text(&self, prompt: &str) -> Result<String> {
        let body = GenerateContentRequest::new(vec![RequestPart::Text { text: prompt }]);
        let resp = self
            .http
            .post(self.endpoint("generateContent"))
            .header(API_KEY_HEADER, self.api_key()?)
            .json(&body)
            .send()
            .await?;
        let resp: GenerateContentResponse = check_status(resp).await?.json().await?;
        Ok(resp.text())
    }

    /// Ask the model which players the analysis mentions.
    pub async fn extract_player_names(&self, analysis: &str) -> Result<Vec<String>> {
        let reply = self.generate_text(&player_names_prompt(analysis)).await?;
        let names = split_player_names(&reply);
        debug!(count = names.len(), "player names extracted: {names:?}");
        Ok(names)
    }

    pub async fn translate(&self, text: &str, language: Language) -> Result<String> {
        if language == Language::English {
            return Ok(text.to_string());
        }
        self.generate_text(&translation_prompt(text, language)).await
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let body_short: String = body.chars().take(300).collect();
    Err(AppError::Upstream(format!("Gemini returned {status}: {body_short}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_request_matches_gemini_schema() {
        let body = GenerateContentRequest::new(vec![
            RequestPart::File {
                file_data: FileData {
                    mime_type: VIDEO_MIME_TYPE,
                    file_uri: "https://www.youtube.com/watch?v=1nvQJLfrvck",
                },
            },
            RequestPart::Text { text: "prompt" },
        ]);
        let v = serde_json::to_value(&body).unwrap();

        let parts = &v["contents"][0]["parts"];
        assert_eq!(v["contents"][0]["role"], "user");
        assert_eq!(parts[0]["fileData"]["mimeType"], "video/mp4");
        assert_eq!(
            parts[0]["fileData"]["fileUri"],
            "https://www.youtube.com/watch?v=1nvQJLfrvck"
        );
        assert_eq!(parts[1]["text"], "prompt");

        assert_eq!(v["generationConfig"]["maxOutputTokens"], 8192);
        assert_eq!(v["generationConfig"]["topP"], 0.95);

        let safety = v["safetySettings"].as_array().unwrap();
        assert_eq!(safety.len(), 4);
        assert!(safety.iter().all(|s| s["threshold"] == "OFF"));
    }

    #[test]
    fn endpoint_includes_model_and_method() {
        let cfg = Config {
            genai_api_url: "https://example.test/".to_string(),
            ..Config::default()
        };
        let client = GenAiClient::new(&cfg).unwrap();
        assert_eq!(
            client.endpoint("generateContent"),
            "https://example.test/v1beta/models/gemini-1.5-pro-002:generateContent"
        );
    }

    #[tokio::test]
    async fn missing_key_is_a_config_error() {
        let client = GenAiClient::new(&Config::default()).unwrap();
        let err = client.generate_text("hi").await.unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[tokio::test]
    async fn transport_errors_do_not_carry_the_key() {
        let cfg = Config {
            genai_api_url: "http://127.0.0.1:1".to_string(),
            genai_api_key: Some("SUPERSECRETKEY".to_string()),
            ..Config::default()
        };
        let client = GenAiClient::new(&cfg).unwrap();

        let err = client.generate_text("hi").await.unwrap_err();
        assert!(matches!(err, AppError::Http(_)), "{err:?}");
        assert!(!err.to_string().contains("SUPERSECRETKEY"), "{err}");

        let err = client
            .analyze_video("https://www.youtube.com/watch?v=1nvQJLfrvck")
            .await
            .unwrap_err();
        assert!(!err.to_string().contains("SUPERSECRETKEY"), "{err}");
        assert!(!format!("{err:?}").contains("SUPERSECRETKEY"));
    }

    #[tokio::test]
    async fn english_translation_skips_the_call() {
        // No key configured: any network attempt would fail.
        let client = GenAiClient::new(&Config::default()).unwrap();
        let out = client.translate("as is", Language::English).await.unwrap();
        assert_eq!(out, "as is");
    }
}
