//! Fake TTS Client - 用于本地开发的 TTS provider
//!
//! 始终返回固定的音频文件，不调用任何外部服务

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

use super::{SimpleTtsOutput, SimpleTtsProvider};
use crate::application::ports::SynthesisError;
use crate::domain::speech::{AudioFormat, SynthesisRequest};

/// Fake TTS Client 配置
#[derive(Debug, Clone)]
pub struct FakeTtsClientConfig {
    /// 固定返回的音频文件路径
    pub audio_file_path: PathBuf,
    /// 音频格式（决定缓存扩展名）
    pub format: AudioFormat,
    /// 模拟合成延迟
    pub latency: Duration,
}

impl FakeTtsClientConfig {
    pub fn new(audio_file_path: impl Into<PathBuf>, format: AudioFormat) -> Self {
        Self {
            audio_file_path: audio_file_path.into(),
            format,
            latency: Duration::from_millis(200),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

/// Fake TTS Client
pub struct FakeTtsClient {
    config: FakeTtsClientConfig,
    /// 缓存的音频数据
    audio_data: Vec<u8>,
}

impl FakeTtsClient {
    /// 创建新的 FakeTtsClient，启动时读入音频文件
    pub fn new(config: FakeTtsClientConfig) -> Result<Self, std::io::Error> {
        let audio_data = std::fs::read(&config.audio_file_path)?;
        tracing::info!(
            path = %config.audio_file_path.display(),
            format = %config.format,
            size = audio_data.len(),
            "FakeTtsClient initialized"
        );
        Ok(Self { config, audio_data })
    }
}

#[async_trait]
impl SimpleTtsProvider for FakeTtsClient {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn format(&self) -> AudioFormat {
        self.config.format
    }

    async fn fetch(&self, request: &SynthesisRequest) -> Result<SimpleTtsOutput, SynthesisError> {
        tracing::debug!(
            text_len = request.text.chars().count(),
            language = %request.language,
            "FakeTtsClient: returning fixed audio"
        );

        tokio::time::sleep(self.config.latency).await;

        Ok(SimpleTtsOutput::Single(self.audio_data.clone()))
    }
}
