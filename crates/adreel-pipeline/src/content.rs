//! AI content generation: product identification, scene prompts, and
//! voiceover scripts.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use adreel_models::VideoTheme;
use adreel_synthesis::{image_data_url, SynthesisConfig};

use crate::config::BrandProfile;

pub type ContentResult<T> = Result<T, ContentError>;

/// Errors from the vision/text generation collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// The vision/text generation boundary.
///
/// Two call shapes are used: "identify the product" against the image,
/// and instruction-driven text generation for the scene prompt and the
/// voiceover script.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Name the product shown in the image.
    async fn identify_product(&self, image: &[u8]) -> ContentResult<String>;

    /// Write a cinematic scene prompt for the selected video model.
    async fn scene_prompt(
        &self,
        image: &[u8],
        duration: u32,
        aspect_ratio: &str,
        model_name: &str,
    ) -> ContentResult<String>;

    /// Write a voiceover script under the duration's strict word cap,
    /// in the theme's tone.
    async fn voiceover_script(
        &self,
        product: &str,
        duration: u32,
        theme: VideoTheme,
    ) -> ContentResult<String>;
}

/// Hard word caps per video duration, from a TTS rate of roughly
/// 150 words/min. Exceeding the cap cuts the audio off mid-sentence.
fn word_limit(duration: u32) -> &'static str {
    match duration {
        2 => "5 words maximum",
        4 => "10 words maximum",
        6 => "15 words maximum",
        8 => "20 words maximum",
        10 => "25 words maximum",
        12 => "30 words maximum",
        _ => "15 words maximum",
    }
}

/// Chat-completions implementation of the content boundary.
pub struct OpenAiContent {
    http: Client,
    api_key: String,
    base_url: String,
    brand: BrandProfile,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl OpenAiContent {
    pub fn new(config: &SynthesisConfig, brand: BrandProfile) -> ContentResult<Self> {
        if config.openai_api_key.is_empty() {
            return Err(ContentError::MissingCredentials(
                "OPENAI_API_KEY not set".to_string(),
            ));
        }

        Ok(Self {
            http: Client::new(),
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            brand,
        })
    }

    /// Issue one chat completion and return the message text.
    async fn chat(&self, content: Value, max_tokens: u32) -> ContentResult<String> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": "gpt-4o",
                "messages": [{ "role": "user", "content": content }],
                "max_tokens": max_tokens,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ContentError::RequestFailed(format!(
                "Chat completion returned {status}: {body}"
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| ContentError::UnexpectedResponse(e.to_string()))?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                ContentError::UnexpectedResponse("No content in completion".to_string())
            })
    }

    /// Text instruction paired with the image.
    fn vision_content(instruction: &str, image: &[u8]) -> Value {
        json!([
            { "type": "text", "text": instruction },
            { "type": "image_url", "image_url": { "url": image_data_url(image) } },
        ])
    }
}

#[async_trait]
impl ContentGenerator for OpenAiContent {
    async fn identify_product(&self, image: &[u8]) -> ContentResult<String> {
        debug!("Identifying product from image");

        let instruction = r#"Identify the product in this image. Be specific and concise.

Output format: Just the product name/type (e.g., "Olive Oil Mister", "Copper Tea Kettle", "Stainless Steel Colander")

Focus on:
- Product category and type
- Material if visible
- Primary function

Output ONLY the product name, nothing else."#;

        self.chat(Self::vision_content(instruction, image), 500).await
    }

    async fn scene_prompt(
        &self,
        image: &[u8],
        duration: u32,
        aspect_ratio: &str,
        model_name: &str,
    ) -> ContentResult<String> {
        info!(model_name, duration, "Generating scene prompt from image");

        let instruction = format!(
            r#"Analyze this product image and create a cinematic video prompt optimized for {model_name}.

Product: (identify from image)
Brand: {brand} ({tagline})
Video Duration: {duration}s
Aspect Ratio: {aspect_ratio}
Video Model: {model_name}

Requirements:
- Describe camera movements (slow pan, dolly, zoom, rotate)
- Specify lighting (warm, natural, cinematic)
- Include setting/environment (modern kitchen, elegant dining)
- Consider aspect ratio framing
- Emphasize: premium, classy, excellent value, quality, curation
- Overall aesthetic: cinematic product commercial with 4K quality look
- Visual style: rich, modern, contemporary
- DO NOT include any text overlays or captions in the video

Output ONLY the prompt text, no explanations."#,
            brand = self.brand.name,
            tagline = self.brand.tagline,
        );

        self.chat(Self::vision_content(&instruction, image), 500).await
    }

    async fn voiceover_script(
        &self,
        product: &str,
        duration: u32,
        theme: VideoTheme,
    ) -> ContentResult<String> {
        info!(product, duration, theme = %theme, "Generating voiceover script");

        let config = theme.config();
        let instruction = format!(
            r#"Create a voiceover script for a {duration}s product video.

Product: {product}
Brand: {brand} - {tagline}
Tone: {tone}
Keywords: {keywords}

CRITICAL LENGTH REQUIREMENT: {limit}
IMPORTANT: If you exceed this word count, the audio will be CUT OFF mid-sentence. Stay UNDER the limit.

Style:
- {style}
- Conversational yet elegant
- Focus on emotional benefit, quality, and product appeal
- Optional tagline format: "{brand} - [quality descriptor]"
- Prioritize brevity - every word counts!

Output ONLY the script text for voiceover, no explanations."#,
            brand = self.brand.name,
            tagline = self.brand.tagline,
            tone = config.script_tone,
            keywords = config.script_keywords.join(", "),
            limit = word_limit(duration),
            style = config.script_style,
        );

        self.chat(json!(instruction), 150).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base_url: String) -> OpenAiContent {
        OpenAiContent::new(
            &SynthesisConfig {
                openai_api_key: "sk-test".to_string(),
                openai_base_url: base_url,
                ..SynthesisConfig::default()
            },
            BrandProfile::default(),
        )
        .unwrap()
    }

    fn completion(text: &str) -> serde_json::Value {
        json!({ "choices": [{ "message": { "role": "assistant", "content": text } }] })
    }

    #[test]
    fn test_word_limits() {
        assert_eq!(word_limit(2), "5 words maximum");
        assert_eq!(word_limit(12), "30 words maximum");
        // Durations outside the table fall back to the 6s cap
        assert_eq!(word_limit(7), "15 words maximum");
    }

    #[test]
    fn test_missing_key_rejected() {
        let result = OpenAiContent::new(&SynthesisConfig::default(), BrandProfile::default());
        assert!(matches!(result, Err(ContentError::MissingCredentials(_))));
    }

    #[tokio::test]
    async fn test_identify_product_returns_trimmed_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(completion("  Copper Tea Kettle\n")),
            )
            .mount(&server)
            .await;

        let product = client(server.uri())
            .identify_product(&[0xFF, 0xD8])
            .await
            .unwrap();
        assert_eq!(product, "Copper Tea Kettle");
    }

    #[tokio::test]
    async fn test_empty_completion_is_unexpected_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("")))
            .mount(&server)
            .await;

        let result = client(server.uri())
            .voiceover_script("Kettle", 6, VideoTheme::Informational)
            .await;
        assert!(matches!(result, Err(ContentError::UnexpectedResponse(_))));
    }

    #[tokio::test]
    async fn test_non_2xx_surfaces_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let result = client(server.uri())
            .scene_prompt(&[0xFF, 0xD8], 6, "9:16", "Google Veo 3 Fast")
            .await;
        match result {
            Err(ContentError::RequestFailed(message)) => {
                assert!(message.contains("429"));
                assert!(message.contains("rate limited"));
            }
            other => panic!("expected RequestFailed, got {other:?}"),
        }
    }
}
