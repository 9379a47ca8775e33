//! Speech Pipeline - 指纹缓存 + 按需合成
//!
//! resolve → (缺失时) synthesize → 返回可播放的音频产物。
//! 配置了 in-flight 登记时，同一指纹的并发请求串行化，后到者重新 resolve 并复用产物；
//! 未配置时保留原始的非原子 check-then-write 行为

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{ArtifactCachePort, InFlightPort, SpeechSynthesizerPort};
use crate::domain::speech::{AudioArtifact, Fingerprint, SynthesisRequest};

/// 一次朗读准备的结果
#[derive(Debug, Clone)]
pub struct PreparedSpeech {
    pub artifact: AudioArtifact,
    pub fingerprint: Fingerprint,
    /// 是否直接复用了缓存
    pub cache_hit: bool,
}

/// 语音准备流水线
pub struct SpeechPipeline {
    cache: Arc<dyn ArtifactCachePort>,
    synthesizer: Arc<dyn SpeechSynthesizerPort>,
    inflight: Option<Arc<dyn InFlightPort>>,
}

impl SpeechPipeline {
    pub fn new(
        cache: Arc<dyn ArtifactCachePort>,
        synthesizer: Arc<dyn SpeechSynthesizerPort>,
    ) -> Self {
        Self {
            cache,
            synthesizer,
            inflight: None,
        }
    }

    /// 启用按指纹的合成互斥
    pub fn with_inflight(mut self, inflight: Arc<dyn InFlightPort>) -> Self {
        self.inflight = Some(inflight);
        self
    }

    /// 准备 `request` 对应的音频产物
    pub async fn prepare(
        &self,
        request: &SynthesisRequest,
    ) -> Result<PreparedSpeech, ApplicationError> {
        let resolution = self.cache.resolve(request).await?;
        if let Some(artifact) = resolution.cached_artifact() {
            tracing::debug!(fingerprint = %resolution.fingerprint.short(), "Artifact cache hit");
            return Ok(PreparedSpeech {
                artifact,
                fingerprint: resolution.fingerprint,
                cache_hit: true,
            });
        }

        let _guard = match &self.inflight {
            Some(inflight) => Some(inflight.enter(&resolution.fingerprint).await),
            None => None,
        };

        // 等待期间可能已有其他请求完成了同一指纹的合成
        let resolution = if self.inflight.is_some() {
            let again = self.cache.resolve(request).await?;
            if let Some(artifact) = again.cached_artifact() {
                tracing::debug!(
                    fingerprint = %again.fingerprint.short(),
                    "Artifact produced by concurrent request, reusing"
                );
                return Ok(PreparedSpeech {
                    artifact,
                    fingerprint: again.fingerprint,
                    cache_hit: true,
                });
            }
            again
        } else {
            resolution
        };

        tracing::info!(
            fingerprint = %resolution.fingerprint.short(),
            provider = self.synthesizer.provider(),
            text_len = request.text.chars().count(),
            "Artifact cache miss, synthesizing"
        );

        let artifact = self
            .synthesizer
            .synthesize(request, &resolution.path)
            .await
            .map_err(|e| {
                tracing::error!(
                    fingerprint = %resolution.fingerprint.short(),
                    provider = self.synthesizer.provider(),
                    error = %e,
                    "Speech synthesis failed"
                );
                ApplicationError::from(e)
            })?;

        Ok(PreparedSpeech {
            artifact,
            fingerprint: resolution.fingerprint,
            cache_hit: false,
        })
    }
}
