//! Verse Command Handlers

use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::application::error::ApplicationError;
use crate::application::ports::VoiceChannelRef;
use crate::application::services::{
    PlaybackOrchestrator, PlaybackReport, PreparedSpeech, SpeechPipeline, VerseSampler,
};
use crate::domain::speech::SynthesisRequest;

/// RandomVerse Handler - 文字回复随机经文
pub struct RandomVerseHandler {
    sampler: Arc<VerseSampler>,
    with_citation: bool,
}

impl RandomVerseHandler {
    pub fn new(sampler: Arc<VerseSampler>, with_citation: bool) -> Self {
        Self {
            sampler,
            with_citation,
        }
    }

    pub async fn handle(&self) -> Result<String, ApplicationError> {
        let verse = self.sampler.sample().await?;
        Ok(if self.with_citation {
            verse.with_citation()
        } else {
            verse.text
        })
    }
}

/// 朗读使用的语言与音色
#[derive(Debug, Clone)]
pub struct VoiceProfile {
    pub language: String,
    pub voice: String,
}

/// JoinAndSpeak 响应：播放已开始，结束与拆除在后台任务中完成
#[derive(Debug)]
pub struct JoinAndSpeakResponse {
    pub channel: VoiceChannelRef,
    pub speech: PreparedSpeech,
    pub playback: JoinHandle<Result<PlaybackReport, ApplicationError>>,
}

/// JoinAndSpeak Handler - 抽样 → 指纹/合成 → 开始播放，严格顺序执行
pub struct JoinAndSpeakHandler {
    sampler: Arc<VerseSampler>,
    pipeline: Arc<SpeechPipeline>,
    orchestrator: Arc<PlaybackOrchestrator>,
    profile: VoiceProfile,
}

impl JoinAndSpeakHandler {
    pub fn new(
        sampler: Arc<VerseSampler>,
        pipeline: Arc<SpeechPipeline>,
        orchestrator: Arc<PlaybackOrchestrator>,
        profile: VoiceProfile,
    ) -> Self {
        Self {
            sampler,
            pipeline,
            orchestrator,
            profile,
        }
    }

    pub async fn handle(
        &self,
        channel: Option<&VoiceChannelRef>,
    ) -> Result<JoinAndSpeakResponse, ApplicationError> {
        // 先检查频道，避免无谓的合成
        let channel = channel.ok_or(ApplicationError::NoChannel)?;

        let verse = self.sampler.sample().await?;
        let request = SynthesisRequest::new(
            verse.text.clone(),
            self.profile.language.clone(),
            self.profile.voice.clone(),
        );
        let speech = self.pipeline.prepare(&request).await?;
        let playback = self.orchestrator.start(channel, &speech.artifact).await?;

        tracing::info!(
            channel = %channel,
            verse_id = %verse.verse_id,
            fingerprint = %speech.fingerprint.short(),
            "Playback started"
        );

        Ok(JoinAndSpeakResponse {
            channel: channel.clone(),
            speech,
            playback: playback.detach(),
        })
    }
}
