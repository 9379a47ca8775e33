//! Speech Synthesizer Port - 语音合成抽象
//!
//! 单一的 `synthesize` 契约；provider 的形态差异（直接返回缓冲区 / 回调完成）
//! 全部封装在 infrastructure/adapters/tts 内

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

use crate::domain::speech::{AudioArtifact, AudioFormat, SynthesisRequest};

/// 合成错误
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// provider 拒绝请求（凭据无效、配额、音色/语言不支持）
    #[error("Provider rejected request: {0}")]
    Rejected(String),

    /// 回调以非 Completed 原因结束
    #[error("Synthesis canceled ({reason}): {detail}")]
    Canceled { reason: String, detail: String },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Provider returned empty audio")]
    EmptyAudio,

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for SynthesisError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

/// Speech Synthesizer Port
#[async_trait]
pub trait SpeechSynthesizerPort: Send + Sync {
    /// provider 名称（日志用）
    fn provider(&self) -> &'static str;

    /// 产出的音频格式，决定缓存文件扩展名
    fn format(&self) -> AudioFormat;

    /// 合成音频并写入 `output`
    async fn synthesize(
        &self,
        request: &SynthesisRequest,
        output: &Path,
    ) -> Result<AudioArtifact, SynthesisError>;
}
