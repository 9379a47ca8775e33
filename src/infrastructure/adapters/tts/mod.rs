//! TTS Adapter - 语音合成 provider 实现
//!
//! 两种 provider 形态统一到 SpeechSynthesizerPort：
//! - simple：直接返回音频缓冲区（或分块序列），由 `SimpleSynthesizer` 拼接
//! - neural：回调报告完成原因，由 `NeuralSynthesizer` 转成单一 await 结果

mod azure_speech_client;
mod fake_tts_client;
mod google_translate_client;
mod neural_synthesizer;
mod simple_synthesizer;

pub use azure_speech_client::{AzureSpeechClient, AzureSpeechConfig};
pub use fake_tts_client::{FakeTtsClient, FakeTtsClientConfig};
pub use google_translate_client::{GoogleTranslateTtsClient, GoogleTranslateTtsConfig};
pub use neural_synthesizer::{
    CallbackSynthesizer, NeuralSynthesizer, NeuralTtsProvider, ResultReason, SynthesisCallback,
    SynthesisResult,
};
pub use simple_synthesizer::{SimpleSynthesizer, SimpleTtsOutput, SimpleTtsProvider};

use std::path::Path;
use tokio::fs;
use uuid::Uuid;

use crate::application::ports::SynthesisError;
use crate::domain::speech::{AudioArtifact, AudioFormat};

/// 把合成结果写到 `output`
///
/// 先写同目录下的临时文件再 rename，读者不会看到写了一半的产物
pub async fn persist_artifact(
    output: &Path,
    bytes: &[u8],
    format: AudioFormat,
) -> Result<AudioArtifact, SynthesisError> {
    if bytes.is_empty() {
        return Err(SynthesisError::EmptyAudio);
    }

    let file_name = output
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            SynthesisError::IoError(format!("invalid output path: {}", output.display()))
        })?;
    let temp = output.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()));

    fs::write(&temp, bytes).await?;
    if let Err(e) = fs::rename(&temp, output).await {
        let _ = fs::remove_file(&temp).await;
        return Err(e.into());
    }

    tracing::debug!(path = %output.display(), size = bytes.len(), "Artifact written");
    Ok(AudioArtifact::new(
        output.to_path_buf(),
        format,
        bytes.len() as u64,
    ))
}
