use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{NexusError, Result};
use crate::llm::types::{
    GeminiContent, GeminiGenerationConfig, GeminiInlineData, GeminiPart, GeminiRequest,
    GeminiResponse, GeminiThinkingConfig, GeminiTool,
};
use crate::llm::{GeneratedText, GenerationRequest, GroundingSource, ModelTier, TextGenerator};

pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    analysis_model: String,
    fast_model: String,
    thinking_budget: u32,
}

impl GeminiClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: cfg.gemini_api_key.clone(),
            base_url: cfg.gemini_base_url.trim_end_matches('/').to_string(),
            analysis_model: cfg.analysis_model.clone(),
            fast_model: cfg.fast_model.clone(),
            thinking_budget: cfg.thinking_budget,
        })
    }

    fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Deep => &self.analysis_model,
            ModelTier::Fast => &self.fast_model,
        }
    }

    pub fn build_request(&self, request: &GenerationRequest) -> GeminiRequest {
        let mut contents: Vec<GeminiContent> = request
            .history
            .iter()
            .map(|turn| GeminiContent {
                parts: vec![GeminiPart::text(turn.text.clone())],
                role: Some(turn.role.to_string()),
            })
            .collect();

        let mut parts = Vec::new();
        if let Some(image) = &request.image {
            parts.push(GeminiPart {
                inline_data: Some(GeminiInlineData {
                    mime_type: image.mime_type.clone(),
                    data: image.data_base64.clone(),
                }),
                ..Default::default()
            });
        }
        parts.push(GeminiPart::text(request.prompt.clone()));
        contents.push(GeminiContent {
            parts,
            role: Some("user".to_string()),
        });

        let generation_config = if request.json_output || request.thinking {
            Some(GeminiGenerationConfig {
                response_mime_type: request
                    .json_output
                    .then(|| "application/json".to_string()),
                thinking_config: request.thinking.then(|| GeminiThinkingConfig {
                    thinking_budget: self.thinking_budget,
                }),
            })
        } else {
            None
        };

        let tools = if request.search_grounding {
            vec![GeminiTool {
                google_search: serde_json::json!({}),
            }]
        } else {
            Vec::new()
        };

        GeminiRequest {
            contents,
            system_instruction: request.system_instruction.as_ref().map(|s| GeminiContent {
                parts: vec![GeminiPart::text(s.clone())],
                role: None,
            }),
            generation_config,
            tools,
        }
    }
}

pub fn into_generated(response: GeminiResponse) -> GeneratedText {
    let sources: Vec<GroundingSource> = response
        .candidates
        .first()
        .and_then(|c| c.grounding_metadata.as_ref())
        .map(|meta| {
            meta.grounding_chunks
                .iter()
                .filter_map(|chunk| chunk.web.as_ref())
                .map(|web| GroundingSource {
                    uri: web.uri.clone(),
                    title: web.title.clone(),
                })
                .collect()
        })
        .unwrap_or_default();

    GeneratedText {
        text: response.first_text(),
        sources,
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<GeneratedText> {
        if self.api_key.is_empty() {
            return Err(NexusError::MissingApiKey);
        }

        let model = self.model_for(request.tier);
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let body = self.build_request(&request);

        debug!(
            "generateContent model={} history={} image={} json={} grounded={}",
            model,
            request.history.len(),
            request.image.is_some(),
            request.json_output,
            request.search_grounding
        );

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!("Model API error {}: {}", status, body);
            return Err(NexusError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GeminiResponse = resp.json().await?;
        if let Some(reason) = parsed
            .candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
        {
            debug!("finishReason={}", reason);
        }

        Ok(into_generated(parsed))
    }
}
