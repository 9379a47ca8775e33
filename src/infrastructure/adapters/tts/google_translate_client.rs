//! Google Translate TTS Client - simple 模式 provider
//!
//! 外部 API:
//! GET {base_url}?ie=UTF-8&client=tw-ob&tl={lang}&q={text}
//! Response: audio/mpeg binary
//!
//! 单次请求的文本长度有上限，超长文本先按句/分句边界分块，每块一次请求

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::{SimpleTtsOutput, SimpleTtsProvider};
use crate::application::ports::SynthesisError;
use crate::domain::speech::{AudioFormat, SynthesisRequest};
use crate::domain::{chunk_text, ChunkConfig, DEFAULT_MAX_CHARS};

/// Google Translate TTS 配置
#[derive(Debug, Clone)]
pub struct GoogleTranslateTtsConfig {
    /// TTS 端点
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 单次请求最大字符数
    pub chunk_chars: usize,
}

impl Default for GoogleTranslateTtsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://translate.google.com/translate_tts".to_string(),
            timeout_secs: 10,
            chunk_chars: DEFAULT_MAX_CHARS,
        }
    }
}

impl GoogleTranslateTtsConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_chunk_chars(mut self, chars: usize) -> Self {
        self.chunk_chars = chars;
        self
    }
}

/// Google Translate TTS 客户端
pub struct GoogleTranslateTtsClient {
    client: Client,
    config: GoogleTranslateTtsConfig,
}

impl GoogleTranslateTtsClient {
    pub fn new(config: GoogleTranslateTtsConfig) -> Result<Self, SynthesisError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SynthesisError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    async fn fetch_chunk(
        &self,
        text: &str,
        language: &str,
        index: usize,
        total: usize,
    ) -> Result<Vec<u8>, SynthesisError> {
        let textlen = text.chars().count().to_string();
        let (idx, total) = (index.to_string(), total.to_string());

        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", language),
                ("q", text),
                ("idx", idx.as_str()),
                ("total", total.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SynthesisError::Timeout
                } else {
                    SynthesisError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SynthesisError::Rejected(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::InvalidResponse(format!("Failed to read audio: {}", e)))?;

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SimpleTtsProvider for GoogleTranslateTtsClient {
    fn name(&self) -> &'static str {
        "google"
    }

    fn format(&self) -> AudioFormat {
        AudioFormat::Mp3
    }

    async fn fetch(&self, request: &SynthesisRequest) -> Result<SimpleTtsOutput, SynthesisError> {
        let chunks = chunk_text(
            &request.text,
            &ChunkConfig {
                max_chars: self.config.chunk_chars,
            },
        );
        if chunks.is_empty() {
            return Err(SynthesisError::Rejected("empty text".to_string()));
        }

        tracing::debug!(
            url = %self.config.base_url,
            language = %request.language,
            text_len = request.text.chars().count(),
            chunks = chunks.len(),
            "Sending Google TTS request"
        );

        let total = chunks.len();
        let mut buffers = Vec::with_capacity(total);
        for (index, chunk) in chunks.iter().enumerate() {
            buffers.push(self.fetch_chunk(chunk, &request.language, index, total).await?);
        }

        Ok(if total == 1 {
            SimpleTtsOutput::Single(buffers.remove(0))
        } else {
            SimpleTtsOutput::Chunked(buffers)
        })
    }
}
