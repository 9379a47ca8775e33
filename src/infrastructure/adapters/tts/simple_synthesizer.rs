//! Simple Synthesizer - 缓冲区形态的 provider
//!
//! provider 对短文本返回单个缓冲区，对超长文本返回分块序列；
//! 这里统一拼接后写入产物路径，上层看不到两种形态的差异

use async_trait::async_trait;
use std::path::Path;

use super::persist_artifact;
use crate::application::ports::{SpeechSynthesizerPort, SynthesisError};
use crate::domain::speech::{AudioArtifact, AudioFormat, SynthesisRequest};

/// provider 的原始输出
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleTtsOutput {
    Single(Vec<u8>),
    Chunked(Vec<Vec<u8>>),
}

impl SimpleTtsOutput {
    /// 按顺序拼接
    pub fn concat(self) -> Vec<u8> {
        match self {
            Self::Single(bytes) => bytes,
            Self::Chunked(chunks) => chunks.concat(),
        }
    }
}

/// 返回音频缓冲区的 TTS provider
#[async_trait]
pub trait SimpleTtsProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn format(&self) -> AudioFormat;

    async fn fetch(&self, request: &SynthesisRequest) -> Result<SimpleTtsOutput, SynthesisError>;
}

/// simple 模式合成器
pub struct SimpleSynthesizer<P> {
    provider: P,
}

impl<P: SimpleTtsProvider> SimpleSynthesizer<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P: SimpleTtsProvider> SpeechSynthesizerPort for SimpleSynthesizer<P> {
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
        let raw = self.provider.fetch(request).await?;
        if let SimpleTtsOutput::Chunked(chunks) = &raw {
            tracing::debug!(
                provider = self.provider.name(),
                chunks = chunks.len(),
                "Concatenating chunked audio"
            );
        }

        persist_artifact(output, &raw.concat(), self.provider.format()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    struct StubProvider(SimpleTtsOutput);

    #[async_trait]
    impl SimpleTtsProvider for StubProvider {
        fn name(&self) -> &'static str {
            "stub"
        }

        fn format(&self) -> AudioFormat {
            AudioFormat::Mp3
        }

        async fn fetch(
            &self,
            _request: &SynthesisRequest,
        ) -> Result<SimpleTtsOutput, SynthesisError> {
            Ok(self.0.clone())
        }
    }

    fn request() -> SynthesisRequest {
        SynthesisRequest::new("Gott ist Liebe.", "de", "")
    }

    #[tokio::test]
    async fn test_single_buffer_written() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("a.mp3");
        let synth = SimpleSynthesizer::new(StubProvider(SimpleTtsOutput::Single(b"abc".to_vec())));

        let artifact = synth.synthesize(&request(), &output).await.unwrap();
        assert_eq!(artifact.format(), AudioFormat::Mp3);
        assert_eq!(tokio::fs::read(&output).await.unwrap(), b"abc");
    }

    #[tokio::test]
    async fn test_chunks_concatenated_in_order() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("a.mp3");
        let synth = SimpleSynthesizer::new(StubProvider(SimpleTtsOutput::Chunked(vec![
            b"one-".to_vec(),
            b"two-".to_vec(),
            b"three".to_vec(),
        ])));

        let artifact = synth.synthesize(&request(), &output).await.unwrap();
        assert_eq!(artifact.size_bytes(), 13);
        assert_eq!(tokio::fs::read(&output).await.unwrap(), b"one-two-three");
    }

    #[tokio::test]
    async fn test_empty_output_is_error() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("a.mp3");
        let synth = SimpleSynthesizer::new(StubProvider(SimpleTtsOutput::Chunked(vec![])));

        let result = synth.synthesize(&request(), &output).await;
        assert!(matches!(result, Err(SynthesisError::EmptyAudio)));
        assert!(!output.exists());
    }
}
