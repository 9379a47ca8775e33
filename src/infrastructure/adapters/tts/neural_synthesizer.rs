//! Neural Synthesizer - 回调形态的 provider
//!
//! provider 的一次合成通过回调报告结果原因：`Completed` 携带音频，
//! 其余原因携带错误详情。这里把回调转换成一个 await 结果，
//! 并由 guard 保证合成器在所有路径上都被 close

use async_trait::async_trait;
use std::path::Path;
use tokio::sync::oneshot;

use super::persist_artifact;
use crate::application::ports::{SpeechSynthesizerPort, SynthesisError};
use crate::domain::speech::{AudioArtifact, AudioFormat, SynthesisRequest};

/// 合成结束原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultReason {
    Completed,
    Canceled,
}

impl std::fmt::Display for ResultReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed => f.write_str("Completed"),
            Self::Canceled => f.write_str("Canceled"),
        }
    }
}

/// 回调携带的结果
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    pub reason: ResultReason,
    pub audio: Vec<u8>,
    pub error_details: String,
}

impl SynthesisResult {
    pub fn completed(audio: Vec<u8>) -> Self {
        Self {
            reason: ResultReason::Completed,
            audio,
            error_details: String::new(),
        }
    }

    pub fn canceled(details: impl Into<String>) -> Self {
        Self {
            reason: ResultReason::Canceled,
            audio: Vec::new(),
            error_details: details.into(),
        }
    }
}

pub type SynthesisCallback = Box<dyn FnOnce(SynthesisResult) + Send + 'static>;

/// 一次性的回调式合成器资源
pub trait CallbackSynthesizer: Send {
    /// 发起合成，立即返回；完成时调用 `on_result` 恰好一次
    fn speak_text_async(&mut self, text: &str, on_result: SynthesisCallback);

    /// 释放资源；可重复调用
    fn close(&mut self);
}

/// 参数化神经语音 provider
pub trait NeuralTtsProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn format(&self) -> AudioFormat;

    /// 按请求的语言/音色创建合成器
    fn create_synthesizer(
        &self,
        request: &SynthesisRequest,
    ) -> Result<Box<dyn CallbackSynthesizer>, SynthesisError>;
}

/// drop 时 close 合成器
struct ClosingSynthesizer(Box<dyn CallbackSynthesizer>);

impl Drop for ClosingSynthesizer {
    fn drop(&mut self) {
        self.0.close();
    }
}

/// neural 模式合成器
pub struct NeuralSynthesizer<P> {
    provider: P,
}

impl<P: NeuralTtsProvider> NeuralSynthesizer<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    async fn speak(&self, request: &SynthesisRequest) -> Result<SynthesisResult, SynthesisError> {
        let mut synthesizer = ClosingSynthesizer(self.provider.create_synthesizer(request)?);

        let (tx, rx) = oneshot::channel();
        synthesizer.0.speak_text_async(
            &request.text,
            Box::new(move |result| {
                let _ = tx.send(result);
            }),
        );

        rx.await.map_err(|_| SynthesisError::Canceled {
            reason: "Dropped".to_string(),
            detail: "synthesizer closed without reporting a result".to_string(),
        })
    }
}

#[async_trait]
impl<P: NeuralTtsProvider> SpeechSynthesizerPort for NeuralSynthesizer<P> {
    fn provider(&self) -> &'static str {
        self.provider.name()
    }

    fn format(&self) -> AudioFormat {
        self.provider.format()
    }

    async fn synthesize(
        &self,
        request: &SynthesisRequest,
        output: &Path,
    ) -> Result<AudioArtifact, SynthesisError> {
        let result = self.speak(request).await?;

        match result.reason {
            ResultReason::Completed => {
                persist_artifact(output, &result.audio, self.provider.format()).await
            }
            reason => {
                tracing::warn!(
                    provider = self.provider.name(),
                    reason = %reason,
                    details = %result.error_details,
                    "Neural synthesis canceled"
                );
                Err(SynthesisError::Canceled {
                    reason: reason.to_string(),
                    detail: result.error_details,
                })
            }
        }
    }
}
